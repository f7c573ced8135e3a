use std::path::Path;

use quotebook_core::export::parse_import;

use crate::commands::common::open_store;
use crate::error::CliError;

pub fn run_import(path: &Path, db_path: &Path) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(path).map_err(|source| CliError::ImportRead {
        path: path.display().to_string(),
        source,
    })?;
    let records = parse_import(&payload)?;

    let mut store = open_store(db_path)?;
    let imported = store.import_many(records)?;
    println!("Quotes imported successfully! ({imported})");

    Ok(())
}
