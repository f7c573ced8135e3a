//! Key-value persistence for Quotebook

mod connection;
mod memory;
mod migrations;

pub use connection::Database;
pub use memory::MemoryKeyValueStore;

use crate::error::Result;

/// Key holding the JSON-encoded quote collection
pub const QUOTES_KEY: &str = "quotes";
/// Key holding the last selected category filter
pub const CATEGORY_FILTER_KEY: &str = "lastCategoryFilter";
/// Session key holding the last displayed quote
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

/// Trait for string key-value storage
pub trait KeyValueStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
