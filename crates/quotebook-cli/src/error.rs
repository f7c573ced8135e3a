use std::io;

use quotebook_core::sync::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotebook_core::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to read import file {path}: {source}")]
    ImportRead { path: String, source: io::Error },
    #[error("A sync cycle is already running")]
    SyncBusy,
}
