//! Import and export of the quote collection as files.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ImportRecord, Quote};

/// File name offered when no output path is given
pub const DEFAULT_EXPORT_FILE_NAME: &str = "quotes.json";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Render quotes as a pretty-printed JSON array in the stored shape.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Render quotes as Markdown blockquotes.
#[must_use]
pub fn render_markdown_export(quotes: &[Quote]) -> String {
    let mut output = String::new();

    for (index, quote) in quotes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        for line in quote.text.lines() {
            let _ = writeln!(output, "> {line}");
        }
        let _ = writeln!(output, ">");
        let _ = writeln!(output, "> - {} `{}`", quote.category, quote.id);
    }

    output
}

/// Render quotes based on selected export format.
pub fn render_quotes_export(quotes: &[Quote], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(quotes),
        ExportFormat::Markdown => Ok(render_markdown_export(quotes)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("quotes-{timestamp_ms}.{}", format.extension())
}

/// Parse an import file.
///
/// The top level must be an array of objects; text and category are
/// checked later, when the batch is applied to the store.
pub fn parse_import(payload: &str) -> Result<Vec<ImportRecord>> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|error| Error::Parse(format!("Error parsing JSON file: {error}")))?;

    if !value.is_array() {
        return Err(Error::Parse(
            "Invalid JSON file format. Expected an array of quote objects with \"text\" and \"category\" properties.".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|error| {
        Error::Parse(format!(
            "Invalid JSON file format. Every element must be a quote object: {error}"
        ))
    })
}
