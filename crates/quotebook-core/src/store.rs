//! In-memory quote collection with persistence
//!
//! `QuoteStore` is the only mutable state in the system. Every mutation
//! serializes the candidate collection and writes it to persistent storage
//! before swapping it in, so a failed write leaves memory untouched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::db::{KeyValueStore, CATEGORY_FILTER_KEY, LAST_VIEWED_KEY, QUOTES_KEY};
use crate::error::{Error, Result};
use crate::models::{CategoryFilter, ImportRecord, Quote, QuoteId, ALL_CATEGORIES};
use crate::util::normalize_text_option;

/// Store handle shared between the CLI and the sync service
pub type SharedQuoteStore = Arc<Mutex<QuoteStore>>;

/// Seeded on first run, when storage holds no collection at all
const DEFAULT_QUOTES: [(&str, &str, &str); 5] = [
    (
        "1",
        "The only way to do great work is to love what you do.",
        "Inspiration",
    ),
    (
        "2",
        "Innovation distinguishes between a leader and a follower.",
        "Innovation",
    ),
    (
        "3",
        "Strive not to be a success, but rather to be of value.",
        "Inspiration",
    ),
    (
        "4",
        "Life is what happens when you're busy making other plans.",
        "Life",
    ),
    (
        "5",
        "The future belongs to those who believe in the beauty of their dreams.",
        "Dreams",
    ),
];

/// Canonical quote list plus the active category filter
pub struct QuoteStore {
    quotes: Vec<Quote>,
    filter: CategoryFilter,
    storage: Box<dyn KeyValueStore + Send>,
    session: Box<dyn KeyValueStore + Send>,
}

impl QuoteStore {
    /// Load the persisted collection and filter.
    ///
    /// `storage` survives restarts; `session` only lives as long as the
    /// current session and holds the last displayed quote.
    pub fn load(
        storage: impl KeyValueStore + Send + 'static,
        session: impl KeyValueStore + Send + 'static,
    ) -> Result<Self> {
        let storage: Box<dyn KeyValueStore + Send> = Box::new(storage);
        let filter = storage
            .get(CATEGORY_FILTER_KEY)?
            .map_or_else(CategoryFilter::default, |value| {
                CategoryFilter::parse(&value)
            });

        let mut store = Self {
            quotes: Vec::new(),
            filter,
            storage,
            session: Box::new(session),
        };

        if let Some(raw) = store.storage.get(QUOTES_KEY)? {
            store.quotes = decode_collection(&raw)?;
        } else {
            store.commit(default_quotes())?;
            tracing::info!("Seeded {} default quotes", store.quotes.len());
        }

        Ok(store)
    }

    /// Re-read the collection and filter another process may have written.
    ///
    /// Memory is left as is when storage holds no collection.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(raw) = self.storage.get(QUOTES_KEY)? {
            self.quotes = decode_collection(&raw)?;
        }
        if let Some(value) = self.storage.get(CATEGORY_FILTER_KEY)? {
            self.filter = CategoryFilter::parse(&value);
        }
        Ok(())
    }

    /// Wrap the store for sharing with a `SyncService`
    pub fn into_shared(self) -> SharedQuoteStore {
        Arc::new(Mutex::new(self))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, id: &QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|quote| quote.id == *id)
    }

    pub const fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Add a quote with a fresh pending id
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let text = required_field(text, "Please enter both a quote and a category")?;
        let category = required_field(category, "Please enter both a quote and a category")?;

        let quote = Quote::with_id(fresh_pending_id(&self.quotes), text, category);
        let mut next = self.quotes.clone();
        next.push(quote.clone());
        self.commit(next)?;

        tracing::debug!("Added quote {}", quote.id);
        Ok(quote)
    }

    /// Merge a batch of imported records into the collection.
    ///
    /// The batch is validated as a whole before anything changes. A record
    /// whose id already exists replaces the stored record.
    pub fn import_many(&mut self, records: Vec<ImportRecord>) -> Result<usize> {
        let mut incoming = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let position = index + 1;
            let text = required_field(
                &record.text,
                &format!("record #{position} is missing a non-empty \"text\""),
            )?;
            let category = required_field(
                &record.category,
                &format!("record #{position} is missing a non-empty \"category\""),
            )?;
            let id = normalize_text_option(record.id)
                .map(|raw| raw.parse::<QuoteId>())
                .transpose()
                .map_err(|error| {
                    Error::Validation(format!("record #{position} has an unusable \"id\": {error}"))
                })?;
            incoming.push((id, text, category));
        }

        let count = incoming.len();
        let mut next = self.quotes.clone();
        for (id, text, category) in incoming {
            let id = id.unwrap_or_else(|| fresh_pending_id(&next));
            let quote = Quote::with_id(id, text, category);
            if let Some(existing) = next.iter_mut().find(|existing| existing.id == quote.id) {
                *existing = quote;
            } else {
                next.push(quote);
            }
        }
        self.commit(next)?;

        tracing::debug!("Imported {count} quotes");
        Ok(count)
    }

    /// Set and persist the category filter, returning the filtered view
    pub fn set_filter(&mut self, category: &str) -> Result<Vec<Quote>> {
        let filter = CategoryFilter::parse(category);
        self.storage.set(CATEGORY_FILTER_KEY, filter.as_str())?;
        self.filter = filter;
        Ok(self.current_view())
    }

    /// Quotes matching the active filter
    pub fn current_view(&self) -> Vec<Quote> {
        self.filter.apply(&self.quotes)
    }

    /// `all` followed by each distinct category in first-occurrence order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::from([ALL_CATEGORIES]);
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for quote in &self.quotes {
            let category = quote.category.as_str();
            if !category.trim().is_empty() && seen.insert(category) {
                categories.push(category.to_string());
            }
        }
        categories
    }

    /// Uniformly pick one quote from `view`
    pub fn pick_random(view: &[Quote]) -> Option<&Quote> {
        view.choose(&mut rand::thread_rng())
    }

    /// Pick from the current view and remember it for this session
    pub fn show_random(&self) -> Option<Quote> {
        let view = self.current_view();
        let quote = Self::pick_random(&view)?.clone();

        match serde_json::to_string(&quote) {
            Ok(encoded) => {
                if let Err(error) = self.session.set(LAST_VIEWED_KEY, &encoded) {
                    tracing::warn!("Failed to remember last viewed quote: {error}");
                }
            }
            Err(error) => tracing::warn!("Failed to encode last viewed quote: {error}"),
        }

        Some(quote)
    }

    /// Quote last shown in this session, if any
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = self.session.get(LAST_VIEWED_KEY).ok().flatten()?;
        serde_json::from_str(&raw)
            .inspect_err(|error| tracing::debug!("Ignoring unreadable last viewed quote: {error}"))
            .ok()
    }

    /// The last viewed quote when the session has one, otherwise a new pick
    pub fn current_or_random(&self) -> Option<Quote> {
        self.last_viewed().or_else(|| self.show_random())
    }

    /// Replace the whole collection in one update
    pub(crate) fn replace_all(&mut self, quotes: Vec<Quote>) -> Result<()> {
        let mut ids = HashSet::with_capacity(quotes.len());
        if let Some(duplicate) = quotes.iter().find(|quote| !ids.insert(&quote.id)) {
            return Err(Error::Validation(format!(
                "duplicate quote id {}",
                duplicate.id
            )));
        }
        self.commit(quotes)
    }

    /// Rewrite a pending id to the id the remote assigned.
    ///
    /// Returns the new id, or `None` when `pending` no longer names a pending
    /// quote. If the synced id is already held, the pending copy is dropped.
    pub(crate) fn promote(&mut self, pending: &QuoteId, remote_id: &str) -> Result<Option<QuoteId>> {
        if !pending.is_pending() {
            return Ok(None);
        }
        let Some(index) = self.quotes.iter().position(|quote| quote.id == *pending) else {
            return Ok(None);
        };

        let synced = QuoteId::synced(remote_id);
        let mut next = self.quotes.clone();
        if next.iter().any(|quote| quote.id == synced) {
            tracing::warn!("Remote id {synced} already present, dropping pending copy {pending}");
            next.remove(index);
        } else {
            next[index].id = synced.clone();
        }
        self.commit(next)?;

        Ok(Some(synced))
    }

    fn commit(&mut self, next: Vec<Quote>) -> Result<()> {
        let encoded = serde_json::to_string(&next)?;
        self.storage.set(QUOTES_KEY, &encoded)?;
        self.quotes = next;
        Ok(())
    }
}

/// Keep one quote per id, the later occurrence winning at the earlier position
pub(crate) fn dedupe_by_id(quotes: Vec<Quote>) -> Vec<Quote> {
    let mut positions: HashMap<QuoteId, usize> = HashMap::with_capacity(quotes.len());
    let mut deduped: Vec<Quote> = Vec::with_capacity(quotes.len());
    for quote in quotes {
        if let Some(&position) = positions.get(&quote.id) {
            deduped[position] = quote;
        } else {
            positions.insert(quote.id.clone(), deduped.len());
            deduped.push(quote);
        }
    }
    deduped
}

fn decode_collection(raw: &str) -> Result<Vec<Quote>> {
    let quotes: Vec<Quote> = serde_json::from_str(raw)
        .map_err(|error| Error::Parse(format!("stored quote collection is invalid: {error}")))?;
    Ok(dedupe_by_id(quotes))
}

fn default_quotes() -> Vec<Quote> {
    DEFAULT_QUOTES
        .iter()
        .map(|(token, text, category)| {
            Quote::with_id(QuoteId::Pending((*token).to_string()), *text, *category)
        })
        .collect()
}

fn fresh_pending_id(existing: &[Quote]) -> QuoteId {
    loop {
        let id = QuoteId::new_pending();
        if existing.iter().all(|quote| quote.id != id) {
            return id;
        }
    }
}

fn required_field(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok((key == QUOTES_KEY).then(|| "[]".to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage(format!("read-only storage rejected '{key}'")))
        }
    }

    fn empty_store() -> (QuoteStore, MemoryKeyValueStore) {
        let storage = MemoryKeyValueStore::new();
        storage.set(QUOTES_KEY, "[]").unwrap();
        let store = QuoteStore::load(storage.clone(), MemoryKeyValueStore::new()).unwrap();
        (store, storage)
    }

    fn quote(id: &str, text: &str, category: &str) -> Quote {
        Quote::with_id(id.parse().unwrap(), text, category)
    }

    fn ids(quotes: &[Quote]) -> Vec<String> {
        quotes.iter().map(|quote| quote.id.to_string()).collect()
    }

    #[test]
    fn test_first_load_seeds_defaults() {
        let storage = MemoryKeyValueStore::new();
        let store = QuoteStore::load(storage.clone(), MemoryKeyValueStore::new()).unwrap();

        assert_eq!(
            ids(store.quotes()),
            vec!["local-1", "local-2", "local-3", "local-4", "local-5"]
        );
        assert!(storage.get(QUOTES_KEY).unwrap().is_some());
        assert_eq!(store.filter(), &CategoryFilter::All);
    }

    #[test]
    fn test_empty_stored_collection_is_not_reseeded() {
        let (store, _) = empty_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_corrupt_collection() {
        let storage = MemoryKeyValueStore::new();
        storage.set(QUOTES_KEY, "{not json").unwrap();
        let error = QuoteStore::load(storage, MemoryKeyValueStore::new())
            .err()
            .unwrap();
        assert!(matches!(error, Error::Parse(_)));
    }

    #[test]
    fn test_load_restores_filter() {
        let storage = MemoryKeyValueStore::new();
        storage.set(QUOTES_KEY, "[]").unwrap();
        storage.set(CATEGORY_FILTER_KEY, "Life").unwrap();
        let store = QuoteStore::load(storage, MemoryKeyValueStore::new()).unwrap();
        assert_eq!(store.filter(), &CategoryFilter::Category("Life".to_string()));
    }

    #[test]
    fn test_add_persists_trimmed_quote() {
        let (mut store, storage) = empty_store();
        let added = store.add("  Stay hungry.  ", " Life ").unwrap();

        assert!(added.id.is_pending());
        assert_eq!(added.text, "Stay hungry.");
        assert_eq!(added.category, "Life");

        let persisted: Vec<Quote> =
            serde_json::from_str(&storage.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, vec![added]);
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let (mut store, _) = empty_store();
        store.add("kept", "Life").unwrap();

        assert!(matches!(store.add("", "Life"), Err(Error::Validation(_))));
        assert!(matches!(store.add("text", ""), Err(Error::Validation(_))));
        assert!(matches!(store.add("   ", "Life"), Err(Error::Validation(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_storage_failure_leaves_memory_untouched() {
        let mut store = QuoteStore::load(ReadOnlyStore, MemoryKeyValueStore::new()).unwrap();
        let error = store.add("text", "Life").unwrap_err();
        assert!(matches!(error, Error::Storage(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_added_ids_are_unique() {
        let (mut store, _) = empty_store();
        for index in 0..50 {
            store.add(&format!("quote {index}"), "Bulk").unwrap();
        }
        let unique = store
            .quotes()
            .iter()
            .map(|quote| &quote.id)
            .collect::<HashSet<_>>();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_import_replaces_existing_id() {
        let (mut store, _) = empty_store();
        store
            .replace_all(vec![
                quote("local-1", "Old", "A"),
                quote("server-2", "Other", "B"),
            ])
            .unwrap();

        let imported = store
            .import_many(vec![ImportRecord::new("New", "C").with_id("local-1")])
            .unwrap();

        assert_eq!(imported, 1);
        assert_eq!(
            store.quotes(),
            &[quote("local-1", "New", "C"), quote("server-2", "Other", "B")]
        );
    }

    #[test]
    fn test_import_assigns_ids_and_appends() {
        let (mut store, _) = empty_store();
        let imported = store
            .import_many(vec![
                ImportRecord::new("First", "A"),
                ImportRecord::new("Second", "B").with_id(""),
            ])
            .unwrap();

        assert_eq!(imported, 2);
        assert_eq!(store.len(), 2);
        assert!(store.quotes().iter().all(|quote| quote.id.is_pending()));
        assert_ne!(store.quotes()[0].id, store.quotes()[1].id);
    }

    #[test]
    fn test_import_later_record_wins_within_batch() {
        let (mut store, _) = empty_store();
        store
            .import_many(vec![
                ImportRecord::new("first", "A").with_id("server-5"),
                ImportRecord::new("second", "B").with_id("server-5"),
            ])
            .unwrap();
        assert_eq!(store.quotes(), &[quote("server-5", "second", "B")]);
    }

    #[test]
    fn test_import_rejects_whole_batch_on_invalid_record() {
        let (mut store, _) = empty_store();
        store.add("kept", "Life").unwrap();

        let error = store
            .import_many(vec![
                ImportRecord::new("valid", "A"),
                ImportRecord::new("missing category", " "),
            ])
            .unwrap_err();

        assert!(error.to_string().contains("record #2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_import_rejects_unrecognized_id() {
        let (mut store, _) = empty_store();
        let error = store
            .import_many(vec![ImportRecord::new("text", "A").with_id("abc")])
            .unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert!(error.to_string().contains("record #1 has an unusable \"id\""));
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_filter_returns_matching_view() {
        let (mut store, storage) = empty_store();
        for (text, category) in [
            ("a", "Life"),
            ("b", "Work"),
            ("c", "Life"),
            ("d", "Dreams"),
            ("e", "Work"),
        ] {
            store.add(text, category).unwrap();
        }

        let life = store.set_filter("Life").unwrap();
        assert_eq!(
            life.iter().map(|quote| quote.text.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(
            storage.get(CATEGORY_FILTER_KEY).unwrap().as_deref(),
            Some("Life")
        );

        assert_eq!(store.set_filter("all").unwrap().len(), 5);
        assert!(store.set_filter("Unknown").unwrap().is_empty());
        assert_eq!(store.filter().as_str(), "Unknown");
    }

    #[test]
    fn test_categories_in_first_occurrence_order() {
        let (mut store, _) = empty_store();
        store
            .replace_all(vec![
                quote("local-1", "a", "Life"),
                quote("local-2", "b", "Work"),
                quote("local-3", "c", "Life"),
                quote("local-4", "d", "all"),
                quote("local-5", "e", "Dreams"),
            ])
            .unwrap();

        assert_eq!(store.categories(), vec!["all", "Life", "Work", "Dreams"]);
    }

    #[test]
    fn test_pick_random_on_empty_view() {
        assert_eq!(QuoteStore::pick_random(&[]), None);

        let view = vec![quote("local-1", "only", "A")];
        assert_eq!(QuoteStore::pick_random(&view), Some(&view[0]));
    }

    #[test]
    fn test_show_random_records_last_viewed() {
        let session = MemoryKeyValueStore::new();
        let storage = MemoryKeyValueStore::new();
        storage.set(QUOTES_KEY, "[]").unwrap();
        let mut store = QuoteStore::load(storage, session.clone()).unwrap();

        assert_eq!(store.show_random(), None);
        assert_eq!(store.last_viewed(), None);

        let added = store.add("remember me", "Memory").unwrap();
        assert_eq!(store.show_random(), Some(added.clone()));
        assert_eq!(store.last_viewed(), Some(added));

        session.clear();
        assert_eq!(store.last_viewed(), None);
    }

    #[test]
    fn test_current_or_random_restores_last_viewed() {
        let (mut store, _) = empty_store();
        assert_eq!(store.current_or_random(), None);

        let first = store.add("first", "A").unwrap();
        assert_eq!(store.current_or_random(), Some(first.clone()));

        store.add("second", "A").unwrap();
        for _ in 0..10 {
            assert_eq!(store.current_or_random(), Some(first.clone()));
        }
    }

    #[test]
    fn test_reload_picks_up_writes_from_another_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.db");

        let mut watcher = QuoteStore::load(
            crate::db::Database::open(&path).unwrap(),
            MemoryKeyValueStore::new(),
        )
        .unwrap();
        let mut other = QuoteStore::load(
            crate::db::Database::open(&path).unwrap(),
            MemoryKeyValueStore::new(),
        )
        .unwrap();
        let added = other.add("Added elsewhere", "Elsewhere").unwrap();
        other.set_filter("Elsewhere").unwrap();

        assert_eq!(watcher.len(), 5);
        watcher.reload().unwrap();

        assert_eq!(watcher.len(), 6);
        assert_eq!(watcher.get(&added.id), Some(&added));
        assert_eq!(watcher.current_view(), vec![added]);
    }

    #[test]
    fn test_reload_rejects_corrupt_collection_and_keeps_memory() {
        let (mut store, storage) = empty_store();
        let kept = store.add("kept", "A").unwrap();
        storage.set(QUOTES_KEY, "{broken").unwrap();

        assert!(matches!(store.reload(), Err(Error::Parse(_))));
        assert_eq!(store.quotes(), &[kept]);
    }

    #[test]
    fn test_show_random_respects_filter() {
        let (mut store, _) = empty_store();
        store.add("life", "Life").unwrap();
        store.set_filter("Work").unwrap();
        assert_eq!(store.show_random(), None);
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let (mut store, _) = empty_store();
        let error = store
            .replace_all(vec![quote("server-1", "a", "A"), quote("server-1", "b", "B")])
            .unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_promote_rewrites_pending_id() {
        let (mut store, _) = empty_store();
        store.replace_all(vec![quote("local-7", "a", "A")]).unwrap();

        let promoted = store
            .promote(&"local-7".parse().unwrap(), "99")
            .unwrap();

        assert_eq!(promoted, Some(QuoteId::synced("99")));
        assert_eq!(store.quotes(), &[quote("server-99", "a", "A")]);
    }

    #[test]
    fn test_promote_drops_pending_copy_when_synced_id_exists() {
        let (mut store, _) = empty_store();
        store
            .replace_all(vec![quote("server-99", "a", "A"), quote("local-7", "a", "A")])
            .unwrap();

        store.promote(&"local-7".parse().unwrap(), "99").unwrap();
        assert_eq!(store.quotes(), &[quote("server-99", "a", "A")]);
    }

    #[test]
    fn test_promote_ignores_unknown_or_synced_ids() {
        let (mut store, _) = empty_store();
        store.replace_all(vec![quote("server-1", "a", "A")]).unwrap();

        assert_eq!(store.promote(&"local-7".parse().unwrap(), "2").unwrap(), None);
        assert_eq!(store.promote(&"server-1".parse().unwrap(), "2").unwrap(), None);
        assert_eq!(ids(store.quotes()), vec!["server-1"]);
    }

    #[test]
    fn test_dedupe_by_id_keeps_later_value_at_first_position() {
        let deduped = dedupe_by_id(vec![
            quote("server-1", "old", "A"),
            quote("server-2", "b", "B"),
            quote("server-1", "new", "A"),
        ]);
        assert_eq!(
            deduped,
            vec![quote("server-1", "new", "A"), quote("server-2", "b", "B")]
        );
    }
}
