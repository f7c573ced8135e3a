use std::path::Path;
use std::sync::Arc;

use quotebook_core::config::SyncSettings;
use quotebook_core::db::Database;
use quotebook_core::models::ALL_CATEGORIES;
use quotebook_core::sync::{HttpRemoteGateway, SyncService};
use quotebook_core::{CategoryFilter, Quote, QuoteStore};

use crate::error::CliError;

pub const NO_QUOTES_MESSAGE: &str =
    "No quotes available for the selected category. Add some or change filter!";

/// Open the quote store backed by the database at `db_path`.
///
/// The last viewed quote is kept in the same database, so a later
/// invocation can show it again.
pub fn open_store(db_path: &Path) -> Result<QuoteStore, CliError> {
    let storage = Database::open(db_path)?;
    let session = Database::open(db_path)?;
    Ok(QuoteStore::load(storage, session)?)
}

pub fn open_sync_service(
    db_path: &Path,
    settings: &SyncSettings,
) -> Result<Arc<SyncService<HttpRemoteGateway>>, CliError> {
    let gateway = HttpRemoteGateway::new(settings)?;
    let store = open_store(db_path)?;
    tracing::debug!("Syncing with {}", gateway.endpoint());
    Ok(Arc::new(SyncService::new(store.into_shared(), gateway)))
}

pub fn render_quote(quote: &Quote) -> String {
    format!("\"{}\"\n  - {}", quote.text, quote.category)
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    quotes
        .iter()
        .map(|quote| {
            let id = quote.id.to_string();
            let preview = quote_preview(quote, 50);
            format!("{id:<14}  {preview:<50}  [{}]", quote.category)
        })
        .collect()
}

pub fn quote_preview(quote: &Quote, max_chars: usize) -> String {
    let collapsed = quote.text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// One line per category, the active one marked with `*`.
pub fn format_category_lines(categories: &[String], active: &CategoryFilter) -> Vec<String> {
    categories
        .iter()
        .map(|category| {
            let marker = if category == active.as_str() { '*' } else { ' ' };
            if category == ALL_CATEGORIES {
                format!("{marker} {category} (All Categories)")
            } else {
                format!("{marker} {category}")
            }
        })
        .collect()
}
