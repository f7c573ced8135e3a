use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use quotebook_core::config::SyncSettings;
use quotebook_core::sync::SyncScheduler;

use crate::commands::common::{open_sync_service, render_quote};
use crate::error::CliError;

pub async fn run_sync(db_path: &Path, settings: &SyncSettings) -> Result<(), CliError> {
    let service = open_sync_service(db_path, settings)?;
    let report = service.sync_now().await.ok_or(CliError::SyncBusy)?;

    match report.summary() {
        Some(summary) => println!("{summary}"),
        None => println!("No changes during sync."),
    }
    println!("Sync status: {}", service.state());

    Ok(())
}

pub async fn run_watch(
    db_path: &Path,
    settings: &SyncSettings,
    interval_secs: Option<u64>,
) -> Result<(), CliError> {
    let interval = interval_secs.map_or_else(|| settings.sync_interval(), Duration::from_secs);
    if interval.is_zero() {
        return Err(CliError::Config(
            "sync interval must be greater than zero".to_string(),
        ));
    }

    let service = open_sync_service(db_path, settings)?;
    if let Some(quote) = service.store().lock().await.current_or_random() {
        println!("{}", render_quote(&quote));
    }

    println!(
        "Syncing every {}s. Press Ctrl-C to stop.",
        interval.as_secs()
    );
    let handle = SyncScheduler::start(Arc::clone(&service), interval, |report| {
        if let Some(summary) = report.summary() {
            println!("{summary}");
        }
    });

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;
    println!("Stopped syncing.");

    Ok(())
}
