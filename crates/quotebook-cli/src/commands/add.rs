use std::path::Path;

use quotebook_core::config::SyncSettings;
use quotebook_core::sync::{HttpRemoteGateway, SyncService};
use quotebook_core::{QuoteId, QuoteStore};

use crate::commands::common::open_store;
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    category: &str,
    push: bool,
    db_path: &Path,
    settings: &SyncSettings,
) -> Result<(), CliError> {
    let text = text_parts.join(" ");

    let mut store = open_store(db_path)?;
    let quote = store.add(&text, category)?;
    println!("Quote added successfully locally!");
    println!("{}", quote.id);
    tracing::debug!("Added quote {} in {}", quote.id, quote.category);

    if push {
        match push_added(store, &quote.id, settings).await {
            Some(synced) => println!("Synced as {synced}"),
            None => println!("Not synced yet; it will be pushed on the next sync."),
        }
    }
    Ok(())
}

/// Push a freshly added quote; failures are logged, never returned.
async fn push_added(store: QuoteStore, id: &QuoteId, settings: &SyncSettings) -> Option<QuoteId> {
    let gateway = match HttpRemoteGateway::new(settings) {
        Ok(gateway) => gateway,
        Err(error) => {
            tracing::warn!("Skipping push of {id}: {error}");
            return None;
        }
    };

    SyncService::new(store.into_shared(), gateway)
        .push_quote(id)
        .await
}
