//! quotebook-core - Core library for Quotebook
//!
//! This crate contains the quote models, key-value persistence, the
//! in-memory quote store, and the remote sync logic used by the CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{CategoryFilter, ImportRecord, Quote, QuoteId, SyncReport};
pub use state::SyncState;
pub use store::{QuoteStore, SharedQuoteStore};
