//! Server-precedence merge of a remote snapshot into the local collection

use std::collections::{HashMap, HashSet};

use crate::models::{Quote, QuoteId};
use crate::store::dedupe_by_id;

/// Result of merging one remote snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Remote quotes in snapshot order, then local-only quotes in local order
    pub merged: Vec<Quote>,
    pub new_from_server: usize,
    pub conflicts_resolved: usize,
}

/// Merge `remote` into `local`, the remote version winning on id collision.
///
/// Quotes are matched by id only. A collision with identical text and
/// category is not a conflict. Local quotes without a remote counterpart,
/// synced or not, are carried forward unchanged.
pub fn merge_snapshot(local: &[Quote], remote: Vec<Quote>) -> MergeOutcome {
    let remote = dedupe_by_id(remote);
    let local_by_id: HashMap<&QuoteId, &Quote> =
        local.iter().map(|quote| (&quote.id, quote)).collect();

    let mut new_from_server = 0;
    let mut conflicts_resolved = 0;
    for remote_quote in &remote {
        match local_by_id.get(&remote_quote.id) {
            Some(local_quote) if !local_quote.same_content(remote_quote) => {
                conflicts_resolved += 1;
            }
            Some(_) => {}
            None => new_from_server += 1,
        }
    }

    let local_only = {
        let remote_ids: HashSet<&QuoteId> = remote.iter().map(|quote| &quote.id).collect();
        local
            .iter()
            .filter(|quote| !remote_ids.contains(&quote.id))
            .cloned()
            .collect::<Vec<_>>()
    };

    let mut merged = remote;
    merged.extend(local_only);

    MergeOutcome {
        merged,
        new_from_server,
        conflicts_resolved,
    }
}
