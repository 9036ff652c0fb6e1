//! The expense list and its persistence binding.
//!
//! `Store` owns the in-memory list and writes the whole list back to a single key of a `KeyValue`
//! after every mutation. Persistence failures never reach the caller: a list that cannot be read
//! starts out empty and a list that cannot be written stays in memory. Both cases are logged.

use crate::kv::KeyValue;
use crate::model::{Category, ExpenseRecord};
use crate::view::Sections;
use crate::Result;
use anyhow::Context;
use std::cell::Cell;
use std::collections::BTreeSet;
use tracing::{debug, error, warn};

/// The key the list is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "Items";

/// Serializes the list into the bytes that are stored.
pub fn encode(records: &[ExpenseRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(records).context("Unable to serialize the expense list")
}

/// Parses stored bytes back into a list.
pub fn decode(bytes: &[u8]) -> Result<Vec<ExpenseRecord>> {
    serde_json::from_slice(bytes).context("Unable to parse the stored expense list")
}

pub struct Store<K>
where
    K: KeyValue,
{
    kv: K,
    key: String,
    records: Vec<ExpenseRecord>,
    saved: Cell<bool>,
}

impl<K> Store<K>
where
    K: KeyValue,
{
    /// Opens the list stored under `key`, hydrating it immediately.
    pub fn open(kv: K, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = Self::load(&kv, &key);
        Self {
            kv,
            key,
            records,
            saved: Cell::new(true),
        }
    }

    /// Reads the list stored under `key`. Missing and unreadable data both produce an empty list.
    pub fn load(kv: &K, key: &str) -> Vec<ExpenseRecord> {
        let Some(bytes) = kv.get(key) else {
            debug!("Nothing stored under '{key}', starting with an empty list");
            return Vec::new();
        };
        match decode(&bytes) {
            Ok(records) => {
                debug!("Loaded {} expenses from '{key}'", records.len());
                records
            }
            Err(e) => {
                warn!("Discarding the list stored under '{key}': {e:#}");
                Vec::new()
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// False when the last write failed, in which case the stored list is older than `records`.
    pub fn is_saved(&self) -> bool {
        self.saved.get()
    }

    pub fn sections(&self) -> Sections<'_> {
        Sections::new(&self.records)
    }

    /// Consumes the store and returns the underlying key-value slot.
    pub fn into_inner(self) -> K {
        self.kv
    }

    /// Adds `record` to the end of the list and persists.
    pub fn append(&mut self, record: ExpenseRecord) {
        self.records.push(record);
        self.persist();
    }

    /// Removes the records at the given positions of the full list and persists. Positions past
    /// the end are ignored. Returns the removed records in list order.
    pub fn remove_at(&mut self, indices: impl IntoIterator<Item = usize>) -> Vec<ExpenseRecord> {
        let indices: BTreeSet<usize> = indices
            .into_iter()
            .filter(|&ix| ix < self.records.len())
            .collect();
        let mut removed: Vec<ExpenseRecord> = indices
            .into_iter()
            .rev()
            .map(|ix| self.records.remove(ix))
            .collect();
        removed.reverse();
        self.persist();
        removed
    }

    /// Removes records by their offsets within the `category` section, which is how a user picks
    /// them. Offsets past the end of the section are ignored.
    pub fn remove_in_section(
        &mut self,
        category: Category,
        offsets: impl IntoIterator<Item = usize>,
    ) -> Vec<ExpenseRecord> {
        let indices = self.sections().section(category).store_indices(offsets);
        self.remove_at(indices)
    }

    /// Writes the full list under the store's key, replacing what was there.
    pub fn persist(&self) {
        let bytes = match encode(&self.records) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Expenses were not saved: {e:#}");
                self.saved.set(false);
                return;
            }
        };
        match self.kv.set(&self.key, &bytes) {
            Ok(()) => {
                debug!("Saved {} expenses to '{}'", self.records.len(), self.key);
                self.saved.set(true);
            }
            Err(e) => {
                error!("Expenses were not saved: {e:#}");
                self.saved.set(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryKeyValue, ReadOnlyKeyValue};
    use crate::model::Amount;
    use std::str::FromStr;

    fn record(name: &str, category: Category, amount: &str) -> ExpenseRecord {
        ExpenseRecord::new(name, category, Amount::from_str(amount).unwrap())
    }

    fn names(store: &Store<MemoryKeyValue>) -> Vec<&str> {
        store.records().iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            record("Coffee", Category::Personal, "3.50"),
            record("Hotel", Category::Business, "180.00"),
            record("Gum", Category::Personal, "0"),
        ];
        let decoded = decode(&encode(&records).unwrap()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_round_trip_empty() {
        assert!(decode(&encode(&[]).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_open_empty() {
        let store = Store::open(MemoryKeyValue::new(), DEFAULT_STORAGE_KEY);
        assert!(store.records().is_empty());
        assert_eq!(store.key(), "Items");
    }

    #[test]
    fn test_open_corrupt_is_empty() {
        let kv = MemoryKeyValue::new();
        kv.set(DEFAULT_STORAGE_KEY, b"{not json").unwrap();
        let store = Store::open(kv, DEFAULT_STORAGE_KEY);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_open_unknown_category_is_empty() {
        let kv = MemoryKeyValue::new();
        let json = r#"[
            {"id": "6f1d1a2e-8a8e-4e61-9d2c-0a9f4b1f7b10", "name": "Rent", "category": "Personal", "amount": "900"},
            {"id": "0c3a7d3c-51e6-4c07-a9d3-5b4c1f0e2a11", "name": "Snacks", "category": "Food", "amount": "4"}
        ]"#;
        kv.set(DEFAULT_STORAGE_KEY, json.as_bytes()).unwrap();
        assert!(Store::load(&kv, DEFAULT_STORAGE_KEY).is_empty());
    }

    #[test]
    fn test_append_then_restart() {
        let kv = MemoryKeyValue::new();
        let mut store = Store::open(kv.clone(), DEFAULT_STORAGE_KEY);
        let coffee = record("Coffee", Category::Personal, "3.50");
        store.append(coffee.clone());
        drop(store);

        let reopened = Store::open(kv, DEFAULT_STORAGE_KEY);
        assert_eq!(reopened.records(), &[coffee]);
        let loaded = &reopened.records()[0];
        assert_eq!(loaded.name(), "Coffee");
        assert_eq!(loaded.category(), Category::Personal);
        assert_eq!(loaded.amount().to_string(), "3.50");
    }

    #[test]
    fn test_append_keeps_order() {
        let mut store = Store::open(MemoryKeyValue::new(), DEFAULT_STORAGE_KEY);
        store.append(record("a", Category::Personal, "1"));
        store.append(record("b", Category::Business, "2"));
        store.append(record("c", Category::Personal, "3"));
        assert_eq!(names(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_persist_is_idempotent() {
        let kv = MemoryKeyValue::new();
        let mut store = Store::open(kv.clone(), DEFAULT_STORAGE_KEY);
        store.append(record("Coffee", Category::Personal, "3.50"));
        store.append(record("Hotel", Category::Business, "180"));
        store.persist();
        let first = kv.get(DEFAULT_STORAGE_KEY).unwrap();
        store.persist();
        let second = kv.get(DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remove_at_multiple() {
        let kv = MemoryKeyValue::new();
        let mut store = Store::open(kv.clone(), DEFAULT_STORAGE_KEY);
        for name in ["a", "b", "c", "d"] {
            store.append(record(name, Category::Personal, "1"));
        }
        let removed = store.remove_at([3, 1, 9]);
        let removed: Vec<_> = removed.iter().map(|r| r.name()).collect();
        assert_eq!(removed, vec!["b", "d"]);
        assert_eq!(names(&store), vec!["a", "c"]);

        // The removal was persisted.
        assert_eq!(Store::load(&kv, DEFAULT_STORAGE_KEY).len(), 2);
    }

    #[test]
    fn test_remove_first_business_row() {
        let mut store = Store::open(MemoryKeyValue::new(), DEFAULT_STORAGE_KEY);
        store.append(record("Coffee", Category::Personal, "3.50"));
        store.append(record("Books", Category::Personal, "25"));
        let hotel = record("Hotel", Category::Business, "180");
        store.append(hotel.clone());
        store.append(record("Taxi", Category::Business, "32"));

        // Offset 0 of the Business section is store index 2, not store index 0.
        let removed = store.remove_in_section(Category::Business, [0]);
        assert_eq!(removed, vec![hotel]);
        assert_eq!(names(&store), vec!["Coffee", "Books", "Taxi"]);
    }

    #[test]
    fn test_remove_in_section_out_of_range() {
        let mut store = Store::open(MemoryKeyValue::new(), DEFAULT_STORAGE_KEY);
        store.append(record("Coffee", Category::Personal, "3.50"));
        let removed = store.remove_in_section(Category::Business, [0]);
        assert!(removed.is_empty());
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_separate_keys_are_independent() {
        let kv = MemoryKeyValue::new();
        let mut a = Store::open(kv.clone(), "A");
        a.append(record("x", Category::Personal, "1"));
        let b = Store::open(kv.clone(), "B");
        assert!(b.records().is_empty());
        assert!(a.into_inner().get("A").is_some());
    }

    #[test]
    fn test_failed_save_keeps_memory_and_stored_value() {
        let kv = MemoryKeyValue::new();
        let mut seed = Store::open(kv.clone(), DEFAULT_STORAGE_KEY);
        seed.append(record("Coffee", Category::Personal, "3.50"));
        seed.append(record("Hotel", Category::Business, "180"));
        let stored = kv.get(DEFAULT_STORAGE_KEY).unwrap();

        let mut store = Store::open(ReadOnlyKeyValue(kv.clone()), DEFAULT_STORAGE_KEY);
        assert_eq!(store.records().len(), 2);
        assert!(store.is_saved());

        store.append(record("Taxi", Category::Business, "32"));
        assert!(!store.is_saved());
        assert_eq!(names_of(store.records()), vec!["Coffee", "Hotel", "Taxi"]);

        let removed = store.remove_at([0]);
        assert_eq!(names_of(&removed), vec!["Coffee"]);
        assert_eq!(names_of(store.records()), vec!["Hotel", "Taxi"]);
        assert!(!store.is_saved());

        // The earlier value is still what is stored.
        assert_eq!(kv.get(DEFAULT_STORAGE_KEY).unwrap(), stored);
        assert_eq!(Store::load(&kv, DEFAULT_STORAGE_KEY).len(), 2);
    }

    #[test]
    fn test_successful_write_is_saved() {
        let mut store = Store::open(MemoryKeyValue::new(), DEFAULT_STORAGE_KEY);
        store.append(record("Coffee", Category::Personal, "3.50"));
        assert!(store.is_saved());
    }

    fn names_of(records: &[ExpenseRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name()).collect()
    }
}
