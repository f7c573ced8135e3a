//! Remote collection gateway

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Quote;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {0}")]
    Status(String),
    #[error("Invalid remote payload: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Translates between local quotes and the remote collection resource
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch the full remote snapshot, every quote carrying a synced id
    async fn fetch_all(&self) -> GatewayResult<Vec<Quote>>;

    /// Create `quote` remotely, returning the remote id it was assigned
    async fn create(&self, quote: &Quote) -> GatewayResult<String>;
}
