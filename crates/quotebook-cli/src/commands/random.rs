use std::path::Path;

use quotebook_core::Quote;

use crate::commands::common::{open_store, render_quote, NO_QUOTES_MESSAGE};
use crate::error::CliError;

/// Show a new random quote from the active category
pub fn run_random(db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    print_quote(store.show_random().as_ref());
    Ok(())
}

/// Show the last viewed quote again, or a random one when there is none
pub fn run_show(db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    print_quote(store.current_or_random().as_ref());
    Ok(())
}

fn print_quote(quote: Option<&Quote>) {
    match quote {
        Some(quote) => println!("{}", render_quote(quote)),
        None => println!("{NO_QUOTES_MESSAGE}"),
    }
}
