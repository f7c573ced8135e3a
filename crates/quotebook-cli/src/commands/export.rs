use std::path::{Path, PathBuf};

use chrono::Utc;
use quotebook_core::export::{render_quotes_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::open_store;
use crate::error::CliError;

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let rendered = render_quotes_export(store.quotes(), format.into())?;

    if let Some(path) = output_path {
        let path = resolve_export_path(path, format);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// A directory target gets a timestamped file name inside it.
pub fn resolve_export_path(path: &Path, format: ExportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(
            format.into(),
            Utc::now().timestamp_millis(),
        ))
    } else {
        path.to_path_buf()
    }
}
