//! Record store contract and the in-memory table.
//!
//! Stores assign ids on insert, like an auto-increment primary key, and
//! start counting at 1 so that 0 always means "not yet stored".

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use bluemind_logic::{RecordId, SimulationRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("simulation {0} not found")]
    NotFound(RecordId),
    #[error("failed to access store file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode or decode store file: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("failed to export records as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Persistence collaborator for simulation records.
pub trait RecordStore {
    /// Store a new record, returning its assigned id. The stored copy
    /// carries that id.
    fn insert(&mut self, record: SimulationRecord) -> Result<RecordId, StoreError>;

    fn get(&self, id: RecordId) -> Result<SimulationRecord, StoreError>;

    fn update(&mut self, id: RecordId, record: SimulationRecord) -> Result<(), StoreError>;

    fn delete(&mut self, id: RecordId) -> Result<(), StoreError>;

    /// Records belonging to `owner`, ordered by id.
    fn list_by_owner(&self, owner: &str) -> Result<Vec<SimulationRecord>, StoreError>;
}

/// Volatile table keyed by record id.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    pub(crate) records: BTreeMap<RecordId, SimulationRecord>,
    pub(crate) next_id: RecordId,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for InMemoryStore {
    fn insert(&mut self, mut record: SimulationRecord) -> Result<RecordId, StoreError> {
        let id = self.next_id;
        self.next_id += 1;
        record.id = id;
        self.records.insert(id, record);
        Ok(id)
    }

    fn get(&self, id: RecordId) -> Result<SimulationRecord, StoreError> {
        self.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn update(&mut self, id: RecordId, mut record: SimulationRecord) -> Result<(), StoreError> {
        let slot = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.id = id;
        *slot = record;
        Ok(())
    }

    fn delete(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<SimulationRecord>, StoreError> {
        Ok(self
            .records
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluemind_logic::EnvironmentalParameters;

    fn record(owner: &str) -> SimulationRecord {
        SimulationRecord::new(owner, "table test", EnvironmentalParameters::default())
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = InMemoryStore::new();
        let a = store.insert(record("a")).unwrap();
        let b = store.insert(record("a")).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(store.get(b).unwrap().id, b);
    }

    #[test]
    fn test_missing_ids_report_not_found() {
        let mut store = InMemoryStore::new();
        assert!(matches!(store.get(9), Err(StoreError::NotFound(9))));
        assert!(matches!(store.update(9, record("a")), Err(StoreError::NotFound(9))));
        assert!(matches!(store.delete(9), Err(StoreError::NotFound(9))));
    }

    #[test]
    fn test_update_pins_id() {
        let mut store = InMemoryStore::new();
        let id = store.insert(record("a")).unwrap();
        let mut changed = store.get(id).unwrap();
        changed.id = 77;
        changed.name = "renamed".to_string();
        store.update(id, changed).unwrap();
        let stored = store.get(id).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.name, "renamed");
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = InMemoryStore::new();
        let first = store.insert(record("a")).unwrap();
        store.delete(first).unwrap();
        let second = store.insert(record("a")).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_by_owner_filters_and_orders() {
        let mut store = InMemoryStore::new();
        store.insert(record("reef")).unwrap();
        store.insert(record("kelp")).unwrap();
        store.insert(record("reef")).unwrap();
        let ids: Vec<_> = store
            .list_by_owner("reef")
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.list_by_owner("nobody").unwrap().is_empty());
    }
}
