use std::path::Path;

use crate::commands::common::{open_store, render_quote, NO_QUOTES_MESSAGE};
use crate::error::CliError;

pub fn run_filter(category: &str, db_path: &Path) -> Result<(), CliError> {
    let mut store = open_store(db_path)?;
    let view = store.set_filter(category)?;
    println!("Filter set to {} ({} quotes)", store.filter(), view.len());

    match store.show_random() {
        Some(quote) => println!("{}", render_quote(&quote)),
        None => println!("{NO_QUOTES_MESSAGE}"),
    }

    Ok(())
}
