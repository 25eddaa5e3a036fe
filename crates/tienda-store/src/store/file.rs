//! # JSON File Store
//!
//! One `<key>.json` file per record key in a data directory.
//!
//! ```text
//! <data dir>/
//! ├── products.json
//! ├── sales.json
//! ├── clients.json
//! ├── cashMovements.json
//! └── settings.json
//! ```
//!
//! Writes go to `<key>.json.tmp` first and are renamed over the target, so
//! a file is always either the old or the new contents.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::{RecordKey, RecordStore};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (creating if needed) a data directory.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| StoreError::Open {
            path: dir.display().to_string(),
            reason: err.to_string(),
        })?;

        info!(path = %dir.display(), "Opened record store");
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: RecordKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: RecordKey) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::read(key, err)),
        }
    }

    fn write(&mut self, key: RecordKey, contents: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, contents).map_err(|err| StoreError::write(key, err))?;
        if let Err(err) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::write(key, err));
        }

        debug!(key = %key, bytes = contents.len(), "Saved records");
        Ok(())
    }

    fn remove(&mut self, key: RecordKey) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::write(key, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStoreExt;
    use tempfile::TempDir;
    use tienda_core::{Client, StoreSettings};

    fn store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let (_dir, store) = store();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_write_read_remove() {
        let (_dir, mut store) = store();
        assert_eq!(store.read(RecordKey::Sales).unwrap(), None);

        store.write(RecordKey::Sales, "[]").unwrap();
        assert!(store.path_for(RecordKey::Sales).ends_with("sales.json"));
        assert_eq!(store.read(RecordKey::Sales).unwrap().as_deref(), Some("[]"));
        assert!(!store.path_for(RecordKey::Sales).with_extension("json.tmp").exists());

        store.remove(RecordKey::Sales).unwrap();
        store.remove(RecordKey::Sales).unwrap();
        assert_eq!(store.read(RecordKey::Sales).unwrap(), None);
    }

    #[test]
    fn test_typed_records_survive_reopen() {
        let (dir, mut store) = store();
        let settings = StoreSettings {
            store_name: "Bodega Ana".to_string(),
            ..StoreSettings::default()
        };
        store.save_one(&settings).unwrap();

        let reopened = JsonFileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(reopened.load_one::<StoreSettings>().store_name, "Bodega Ana");
        assert!(reopened.load::<Client>().is_empty());
    }

    #[test]
    fn test_garbage_file_loads_empty() {
        let (_dir, store) = store();
        fs::write(store.path_for(RecordKey::Clients), "garbage").unwrap();
        assert!(store.load::<Client>().is_empty());
    }
}
