use std::path::Path;

use crate::commands::common::{format_category_lines, open_store};
use crate::error::CliError;

pub fn run_categories(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let categories = store.categories();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        for line in format_category_lines(&categories, store.filter()) {
            println!("{line}");
        }
    }

    Ok(())
}
