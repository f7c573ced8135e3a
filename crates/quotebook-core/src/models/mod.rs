//! Data models for Quotebook

mod filter;
mod import_record;
mod quote;
mod sync_report;

pub use filter::{CategoryFilter, ALL_CATEGORIES};
pub use import_record::ImportRecord;
pub use quote::{ParseQuoteIdError, Quote, QuoteId, PENDING_PREFIX, SYNCED_PREFIX};
pub use sync_report::SyncReport;
