//! Sync report model

use serde::Serialize;

/// Counts produced by one sync cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Remote quotes that were not held locally
    pub new_from_server: usize,
    /// Local quotes replaced by a differing remote version
    pub conflicts_resolved: usize,
    /// Pending quotes promoted after a successful push
    pub pushed_to_server: usize,
}

impl SyncReport {
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.new_from_server > 0 || self.conflicts_resolved > 0 || self.pushed_to_server > 0
    }

    /// User-facing notification text, `None` when nothing changed
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if !self.has_changes() {
            return None;
        }

        let mut message = String::from("Sync complete!");
        if self.new_from_server > 0 {
            message.push_str(&format!(
                " {} new quotes from server.",
                self.new_from_server
            ));
        }
        if self.conflicts_resolved > 0 {
            message.push_str(&format!(
                " {} conflicts resolved (server data took precedence).",
                self.conflicts_resolved
            ));
        }
        if self.pushed_to_server > 0 {
            message.push_str(&format!(
                " {} local quotes pushed to server.",
                self.pushed_to_server
            ));
        }
        Some(message)
    }
}
