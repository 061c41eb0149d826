use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::settings::LedgerSettings;

/// Raw byte store keyed by name (`UserDefaults` on device).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store. The `fail_*` switches make every read or write fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub values: HashMap<String, Vec<u8>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Read {
                key: key.to_string(),
                source: ErrorKind::PermissionDenied.into(),
            });
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: ErrorKind::PermissionDenied.into(),
            });
        }
        self.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// One file per key under `dir`.
///
/// Values are written to a temporary sibling and renamed into place, so a
/// later read sees either the previous or the new value in full.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.value"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("value.tmp");
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)
    }
}

/// The two persisted values of the ledger: the encoded record list and the
/// scalar counter.
///
/// Each write is independent; nothing keeps the two keys consistent if the
/// process dies between them.
#[derive(Clone, Debug)]
pub struct LedgerStore<S> {
    inner: S,
    records_key: String,
    count_key: String,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(inner: S, settings: &LedgerSettings) -> Self {
        Self {
            inner,
            records_key: settings.records_key.clone(),
            count_key: settings.count_key.clone(),
        }
    }

    pub fn write_records(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.inner.set(&self.records_key, bytes)
    }

    pub fn read_records(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(&self.records_key)
    }

    pub fn write_counter(&mut self, value: i64) -> Result<(), StoreError> {
        self.inner.set(&self.count_key, value.to_string().as_bytes())
    }

    /// Stored counter, 0 when absent.
    pub fn read_counter(&self) -> Result<i64, StoreError> {
        let Some(bytes) = self.inner.get(&self.count_key)? else {
            return Ok(0);
        };
        let text = String::from_utf8_lossy(&bytes);
        text.trim().parse().map_err(|_| StoreError::NotAnInteger {
            key: self.count_key.clone(),
            value: text.into_owned(),
        })
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", b"one").unwrap();
        store.set("a", b"two").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn test_memory_store_failure_switches() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        assert!(matches!(store.set("a", b"x"), Err(StoreError::Write { .. })));
        store.fail_reads = true;
        assert!(matches!(store.get("a"), Err(StoreError::Read { .. })));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("defaults");

        let mut store = FileStore::new(&root);
        assert_eq!(store.get("fishRecords").unwrap(), None);
        store.set("fishRecords", b"[]").unwrap();
        store.set("fishRecords", b"[1]").unwrap();

        let reopened = FileStore::new(&root);
        assert_eq!(reopened.get("fishRecords").unwrap(), Some(b"[1]".to_vec()));
        assert!(!root.join("fishRecords.value.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_dir_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("not-created-yet"));
        assert_eq!(store.get("fishCount").unwrap(), None);
    }

    #[test]
    fn test_ledger_store_counter_defaults_to_zero() {
        let store = LedgerStore::new(MemoryStore::new(), &LedgerSettings::default());
        assert_eq!(store.read_counter().unwrap(), 0);
        assert_eq!(store.read_records().unwrap(), None);
    }

    #[test]
    fn test_ledger_store_uses_configured_keys() {
        let mut store = LedgerStore::new(MemoryStore::new(), &LedgerSettings::default());
        store.write_counter(7).unwrap();
        store.write_records(b"[]").unwrap();
        assert_eq!(store.read_counter().unwrap(), 7);

        let inner = store.into_inner();
        assert_eq!(inner.values.get("fishCount"), Some(&b"7".to_vec()));
        assert_eq!(inner.values.get("fishRecords"), Some(&b"[]".to_vec()));
    }

    #[test]
    fn test_ledger_store_rejects_garbage_counter() {
        let mut inner = MemoryStore::new();
        inner.values.insert("fishCount".to_string(), b"lots".to_vec());
        let store = LedgerStore::new(inner, &LedgerSettings::default());
        let err = store.read_counter().unwrap_err();
        assert!(matches!(err, StoreError::NotAnInteger { ref value, .. } if value == "lots"));
    }
}
