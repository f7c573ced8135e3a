//! Reconciliation between the local quote store and the remote collection.
//!
//! One sync cycle fetches the remote snapshot, merges it with server
//! precedence, stores the result, and then pushes every quote that still has
//! a pending id. Failures inside a cycle are logged and never returned; the
//! next cycle retries.

mod gateway;
mod http;
mod merge;
mod scheduler;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

pub use gateway::{GatewayError, GatewayResult, RemoteGateway};
pub use http::{
    parse_created_id, parse_remote_posts, HttpRemoteGateway, DEFAULT_REMOTE_CATEGORY,
    MAX_REMOTE_CATEGORY_CHARS,
};
pub use merge::{merge_snapshot, MergeOutcome};
pub use scheduler::{SyncHandle, SyncScheduler};

use crate::models::{Quote, QuoteId, SyncReport};
use crate::state::SyncState;
use crate::store::{QuoteStore, SharedQuoteStore};

/// Runs sync cycles against one gateway; at most one cycle at a time.
pub struct SyncService<G> {
    store: SharedQuoteStore,
    gateway: G,
    running: AtomicBool,
    state: Mutex<SyncState>,
}

impl<G: RemoteGateway> SyncService<G> {
    pub fn new(store: SharedQuoteStore, gateway: G) -> Self {
        Self {
            store,
            gateway,
            running: AtomicBool::new(false),
            state: Mutex::new(SyncState::default()),
        }
    }

    pub const fn store(&self) -> &SharedQuoteStore {
        &self.store
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> SyncState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one sync cycle.
    ///
    /// Returns `None` without doing anything when another cycle (or a
    /// trailing push) is still in flight.
    pub async fn sync_now(&self) -> Option<SyncReport> {
        let Some(_guard) = RunningGuard::acquire(&self.running) else {
            tracing::debug!("Sync already in progress, skipping cycle");
            return None;
        };
        self.set_state(SyncState::Syncing);
        tracing::debug!("Syncing quotes with server...");

        let mut report = SyncReport::default();
        let mut final_state = SyncState::Synced;

        let fetched = self.gateway.fetch_all().await;
        {
            let mut store = self.store.lock().await;
            reload_store(&mut store);

            match fetched {
                Ok(remote) => {
                    let outcome = merge_snapshot(store.quotes(), remote);
                    match store.replace_all(outcome.merged) {
                        Ok(()) => {
                            report.new_from_server = outcome.new_from_server;
                            report.conflicts_resolved = outcome.conflicts_resolved;
                        }
                        Err(error) => {
                            tracing::error!("Failed to store merged quotes: {error}");
                            final_state = SyncState::Error;
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!("Failed to fetch quotes from server: {error}");
                    final_state = SyncState::Offline;
                }
            }
        }

        report.pushed_to_server = self.push_pending().await;
        self.set_state(final_state);

        if let Some(summary) = report.summary() {
            tracing::info!("{summary}");
        } else {
            tracing::debug!("No changes during sync");
        }
        Some(report)
    }

    /// Push a single pending quote right after it was added.
    ///
    /// Returns the synced id on success. Skipped while a cycle is running,
    /// since that cycle pushes the quote anyway.
    pub async fn push_quote(&self, id: &QuoteId) -> Option<QuoteId> {
        let Some(_guard) = RunningGuard::acquire(&self.running) else {
            tracing::debug!("Sync in progress, leaving {id} for the running cycle");
            return None;
        };

        let quote = {
            let store = self.store.lock().await;
            store.get(id).filter(|quote| quote.id.is_pending()).cloned()
        }?;
        self.push_one(&quote).await
    }

    async fn push_pending(&self) -> usize {
        let pending = {
            let store = self.store.lock().await;
            store
                .quotes()
                .iter()
                .filter(|quote| quote.id.is_pending())
                .cloned()
                .collect::<Vec<Quote>>()
        };

        let mut pushed = 0;
        for quote in &pending {
            if self.push_one(quote).await.is_some() {
                pushed += 1;
            }
        }
        pushed
    }

    async fn push_one(&self, quote: &Quote) -> Option<QuoteId> {
        let remote_id = match self.gateway.create(quote).await {
            Ok(remote_id) => remote_id,
            Err(GatewayError::Decode(error)) => {
                // The remote may hold the quote already; a retry can duplicate it.
                tracing::warn!(
                    "Quote {} posted but the response was unreadable, keeping pending id: {error}",
                    quote.id
                );
                return None;
            }
            Err(error) => {
                tracing::warn!("Failed to post quote {} to server: {error}", quote.id);
                return None;
            }
        };

        let mut store = self.store.lock().await;
        reload_store(&mut store);
        match store.promote(&quote.id, &remote_id) {
            Ok(Some(synced)) => {
                tracing::info!("Local quote ID updated to server ID: {synced}");
                Some(synced)
            }
            Ok(None) => {
                tracing::debug!("Quote {} is no longer pending, ignoring remote id", quote.id);
                None
            }
            Err(error) => {
                tracing::warn!("Failed to store promoted id for {}: {error}", quote.id);
                None
            }
        }
    }

    fn set_state(&self, state: SyncState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Pick up writes made by other processes sharing the same storage
fn reload_store(store: &mut QuoteStore) {
    if let Err(error) = store.reload() {
        tracing::warn!("Failed to reload stored quotes, using the loaded copy: {error}");
    }
}

/// Holds the running flag for the lifetime of one cycle
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
