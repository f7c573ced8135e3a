//! Shared sync state types.

use std::fmt;

use serde::Serialize;

/// Outcome of the most recent sync cycle, as shown to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// No cycle has completed, or the remote could not be reached
    #[default]
    Offline,
    Syncing,
    Synced,
    /// The merged collection could not be persisted
    Error,
}

impl SyncState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
