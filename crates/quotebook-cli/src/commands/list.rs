use std::path::Path;

use quotebook_core::CategoryFilter;

use crate::commands::common::{format_quote_lines, open_store, NO_QUOTES_MESSAGE};
use crate::error::CliError;

pub fn run_list(category: Option<&str>, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let quotes = match category {
        Some(category) => CategoryFilter::parse(category).apply(store.quotes()),
        None => store.current_view(),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    } else if quotes.is_empty() {
        println!("{NO_QUOTES_MESSAGE}");
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }

    Ok(())
}
