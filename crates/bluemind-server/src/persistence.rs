//! File-backed record store.
//!
//! Uses bincode for a compact, versioned save file holding every record.
//! The whole table is rewritten after each mutation through a temporary
//! file and a rename, so a crash never leaves a half-written store.
//! Mutations are staged on a copy of the table and only become visible
//! once the file write succeeds.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bluemind_logic::{RecordId, SimulationRecord};
use serde::{Deserialize, Serialize};

use crate::tables::{InMemoryStore, RecordStore, StoreError};

/// Version number for the save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    next_id: RecordId,
    records: Vec<SimulationRecord>,
}

/// Write every record in `store` to `writer`.
pub fn save_records<W: Write>(writer: W, store: &InMemoryStore) -> Result<(), StoreError> {
    let data = SaveData {
        version: SAVE_VERSION,
        next_id: store.next_id,
        records: store.records.values().cloned().collect(),
    };
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Rebuild a table from a save file.
pub fn load_records<R: Read>(reader: R) -> Result<InMemoryStore, StoreError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    let mut store = InMemoryStore::new();
    store.next_id = data.next_id;
    for record in data.records {
        store.records.insert(record.id, record);
    }
    Ok(store)
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    table: InMemoryStore,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = if path.exists() {
            let file = File::open(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let table = load_records(BufReader::new(file))?;
            log::info!("Loaded {} simulation(s) from {:?}", table.len(), path);
            table
        } else {
            log::info!("No store at {:?}; starting empty", path);
            InMemoryStore::new()
        };
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all records as a JSON array, for dashboards and charts.
    pub fn export_json<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let records: Vec<&SimulationRecord> = self.table.records.values().collect();
        serde_json::to_writer_pretty(writer, &records)?;
        Ok(())
    }

    /// Apply `change` to a copy of the table, write the copy out, and only
    /// then make it current. A failed write leaves the table untouched.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut InMemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut staged = self.table.clone();
        let out = change(&mut staged)?;
        self.write_table(&staged)?;
        self.table = staged;
        Ok(out)
    }

    fn write_table(&self, table: &InMemoryStore) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let tmp = self.path.with_extension("tmp");
        {
            let file = File::create(&tmp).map_err(io_err)?;
            let mut writer = BufWriter::new(file);
            save_records(&mut writer, table)?;
            writer.flush().map_err(io_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn insert(&mut self, record: SimulationRecord) -> Result<RecordId, StoreError> {
        self.commit(|table| table.insert(record))
    }

    fn get(&self, id: RecordId) -> Result<SimulationRecord, StoreError> {
        self.table.get(id)
    }

    fn update(&mut self, id: RecordId, record: SimulationRecord) -> Result<(), StoreError> {
        self.commit(|table| table.update(id, record))
    }

    fn delete(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.commit(|table| table.delete(id))
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<SimulationRecord>, StoreError> {
        self.table.list_by_owner(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluemind_logic::EnvironmentalParameters;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "bluemind-{}-{}.bin",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let id = {
            let mut store = FileStore::open(&path).expect("open failed");
            let mut record =
                SimulationRecord::new("lab", "persisted", EnvironmentalParameters::default());
            record.advance(1);
            store.insert(record).expect("insert failed")
        };

        let store = FileStore::open(&path).expect("reopen failed");
        let loaded = store.get(id).expect("record missing");
        assert_eq!(loaded.week, 1);
        assert_eq!(loaded.history.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_next_id_survives_reopen() {
        let path = temp_path("ids");
        {
            let mut store = FileStore::open(&path).unwrap();
            let id = store
                .insert(SimulationRecord::new("lab", "a", EnvironmentalParameters::default()))
                .unwrap();
            store.delete(id).unwrap();
        }
        let mut store = FileStore::open(&path).unwrap();
        let id = store
            .insert(SimulationRecord::new("lab", "b", EnvironmentalParameters::default()))
            .unwrap();
        assert_eq!(id, 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_keeps_previous_table() {
        let dir = std::env::temp_dir().join(format!("bluemind-gone-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut store = FileStore::open(dir.join("store.bin")).unwrap();
        let id = store
            .insert(SimulationRecord::new("lab", "a", EnvironmentalParameters::default()))
            .unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let mut advanced = store.get(id).unwrap();
        advanced.advance(1);
        assert!(matches!(
            store.update(id, advanced),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(store.get(id).unwrap().week, 0);

        let orphan = SimulationRecord::new("lab", "b", EnvironmentalParameters::default());
        assert!(store.insert(orphan).is_err());
        assert_eq!(store.list_by_owner("lab").unwrap().len(), 1);
        assert!(store.delete(id).is_err());
        assert!(store.get(id).is_ok());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let data = SaveData {
            version: SAVE_VERSION + 1,
            next_id: 1,
            records: Vec::new(),
        };
        let bytes = bincode::serialize(&data).unwrap();
        let err = load_records(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionMismatch { expected: 1, found: 2 }
        ));
    }

    #[test]
    fn test_export_json_is_array_of_records() {
        let path = temp_path("export");
        let mut store = FileStore::open(&path).unwrap();
        store
            .insert(SimulationRecord::new("lab", "json", EnvironmentalParameters::default()))
            .unwrap();
        let mut out = Vec::new();
        store.export_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "json");
        assert!(value[0]["history"].is_array());
        let _ = fs::remove_file(&path);
    }
}
