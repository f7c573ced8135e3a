//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Serialized prefix of ids that have not been confirmed by the remote yet
pub const PENDING_PREFIX: &str = "local-";
/// Serialized prefix of ids assigned by the remote collection
pub const SYNCED_PREFIX: &str = "server-";

/// Identifier of a quote.
///
/// Serialized as `local-<token>` or `server-<remote id>` so stored
/// collections and export files keep the flat string shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuoteId {
    /// Created locally, not yet pushed
    Pending(String),
    /// Confirmed by the remote collection
    Synced(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized quote id '{0}' (expected local-<token> or server-<id>)")]
pub struct ParseQuoteIdError(pub String);

impl QuoteId {
    /// Create a fresh pending ID using a UUID v7 token (time-sortable)
    #[must_use]
    pub fn new_pending() -> Self {
        Self::Pending(Uuid::now_v7().simple().to_string())
    }

    /// Create a synced ID for the given remote identifier
    #[must_use]
    pub fn synced(remote_id: impl Into<String>) -> Self {
        Self::Synced(remote_id.into())
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The part after the prefix
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Pending(token) | Self::Synced(token) => token,
        }
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(token) => write!(f, "{PENDING_PREFIX}{token}"),
            Self::Synced(remote_id) => write!(f, "{SYNCED_PREFIX}{remote_id}"),
        }
    }
}

impl FromStr for QuoteId {
    type Err = ParseQuoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = if let Some(token) = s.strip_prefix(PENDING_PREFIX) {
            Self::Pending(token.to_string())
        } else if let Some(remote_id) = s.strip_prefix(SYNCED_PREFIX) {
            Self::Synced(remote_id.to_string())
        } else {
            return Err(ParseQuoteIdError(s.to_string()));
        };

        if id.token().is_empty() {
            return Err(ParseQuoteIdError(s.to_string()));
        }
        Ok(id)
    }
}

impl TryFrom<String> for QuoteId {
    type Error = ParseQuoteIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuoteId> for String {
    fn from(value: QuoteId) -> Self {
        value.to_string()
    }
}

/// A quote in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier
    pub id: QuoteId,
    /// Quote text
    pub text: String,
    /// Free-form category label
    pub category: String,
}

impl Quote {
    /// Create a new pending quote
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self::with_id(QuoteId::new_pending(), text, category)
    }

    #[must_use]
    pub fn with_id(id: QuoteId, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
        }
    }

    /// Whether both quotes carry the same text and category (ids ignored)
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.text == other.text && self.category == other.category
    }
}
