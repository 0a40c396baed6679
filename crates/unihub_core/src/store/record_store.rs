//! Named record collections over the key-value substrate.
//!
//! # Responsibility
//! - Decode persisted JSON arrays into typed records.
//! - Encode and write whole collections back in one substrate write.
//!
//! # Invariants
//! - `get` never fails: missing, unreadable or malformed values read as an
//!   empty collection.
//! - Array elements that do not match the record shape are skipped; the
//!   remaining elements keep their stored order.

use crate::store::kv::KeyValueStore;
use crate::store::StoreResult;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

/// Shared handle to the persisted collections.
///
/// Cloning is cheap; all clones address the same substrate.
#[derive(Clone)]
pub struct RecordStore {
    backend: Rc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Reads the collection stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("event=record_get module=store status=unreadable key={key} error={err}");
                return Vec::new();
            }
        };

        let values = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    "event=record_get module=store status=corrupt key={key} line={} column={}",
                    err.line(),
                    err.column()
                );
                return Vec::new();
            }
        };

        let total = values.len();
        let records: Vec<T> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if records.len() < total {
            warn!(
                "event=record_get module=store status=partial key={key} skipped={} kept={}",
                total - records.len(),
                records.len()
            );
        }
        records
    }

    /// Replaces the collection stored under `key`.
    pub fn set<T: Serialize>(&self, key: &str, records: &[T]) -> StoreResult<()> {
        let encoded = serde_json::to_string(records)?;
        self.backend.set_raw(key, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
    }

    fn store_with(key: &str, raw: &str) -> RecordStore {
        let backend = MemoryKeyValueStore::new();
        backend.set_raw(key, raw).unwrap();
        RecordStore::new(backend)
    }

    #[test]
    fn missing_key_reads_empty() {
        let store = RecordStore::new(MemoryKeyValueStore::new());
        assert!(store.get::<Item>("items").is_empty());
    }

    #[test]
    fn syntactically_invalid_value_reads_empty() {
        let store = store_with("items", "[{\"name\": ");
        assert!(store.get::<Item>("items").is_empty());
    }

    #[test]
    fn non_array_value_reads_empty() {
        let store = store_with("items", r#"{"name":"solo"}"#);
        assert!(store.get::<Item>("items").is_empty());
    }

    #[test]
    fn mismatched_elements_are_skipped_in_order() {
        let store = store_with("items", r#"[{"name":"a"},{"other":1},{"name":"c"}]"#);
        let items = store.get::<Item>("items");
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn set_then_get_preserves_order() {
        let store = RecordStore::new(MemoryKeyValueStore::new());
        let items = vec![
            Item {
                name: "first".to_string(),
            },
            Item {
                name: "second".to_string(),
            },
        ];
        store.set("items", &items).unwrap();
        assert_eq!(store.get::<Item>("items"), items);
    }
}
