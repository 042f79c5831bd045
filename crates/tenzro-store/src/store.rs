use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::StoreConfig;
use crate::document::{self, Document};
use crate::error::{StoreError, StoreResult};
use crate::key::validate_key;
use crate::persist::{remove_entry, scan_entries, write_entry, EntryFile};
use crate::recovery::recover_index;
use crate::replication::{replicate_snapshot, ReplicationReport};

/// File-backed key-value document store.
///
/// The in-memory index is the source of truth for reads; every mutation is
/// mirrored to one file per key in the base directory. A single mutex guards
/// the index together with the files, so operations on one `Store` are fully
/// serialized. Two stores opened on the same directory are not coordinated.
pub struct Store {
    base_dir: PathBuf,
    node_id: String,
    config: StoreConfig,
    index: Mutex<HashMap<String, Document>>,
}

impl Store {
    /// Open a store on `base_dir` with the default configuration.
    pub fn open(base_dir: impl AsRef<Path>, node_id: impl Into<String>) -> StoreResult<Self> {
        Self::open_with_config(base_dir, node_id, StoreConfig::default())
    }

    /// Open a store on `base_dir`, rebuilding the index from existing entries.
    ///
    /// Fails with [`StoreError::Access`] if the directory cannot be created
    /// or listed and with [`StoreError::CorruptEntry`] if any entry file
    /// does not decode.
    pub fn open_with_config(
        base_dir: impl AsRef<Path>,
        node_id: impl Into<String>,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        config.validate()?;
        let store = Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            node_id: node_id.into(),
            config,
            index: Mutex::new(HashMap::new()),
        };

        {
            let mut index = store.lock();
            *index = recover_index(&store.base_dir, &store.config.suffix)?;
            info!(
                node_id = %store.node_id,
                dir = %store.base_dir.display(),
                entries = index.len(),
                "store opened"
            );
        }

        Ok(store)
    }

    /// Store `document` under `key`, replacing any previous document.
    ///
    /// The entry file is written before the index is updated, so on failure
    /// the index still holds the previous document.
    pub fn put(&self, key: impl Into<String>, document: &Document) -> StoreResult<String> {
        let key = key.into();
        validate_key(&key)?;

        let mut index = self.lock();
        write_entry(&self.base_dir, &key, document, &self.config)?;
        index.insert(key.clone(), document.clone());
        Ok(key)
    }

    /// Serialize `value` and store it under `key`.
    pub fn put_as<T: Serialize + ?Sized>(
        &self,
        key: impl Into<String>,
        value: &T,
    ) -> StoreResult<String> {
        let document = document::to_document(value)?;
        self.put(key, &document)
    }

    /// Look up the document stored under `key`. Never touches the disk.
    pub fn get(&self, key: &str) -> Option<Document> {
        self.lock().get(key).cloned()
    }

    /// Look up `key` and deserialize it into `T`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        self.get(key).map(document::from_document::<T>).transpose()
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sorted list of all stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Push a full snapshot of every entry into `target_dir`.
    ///
    /// The guard is held until every entry has been written. A failure
    /// partway through leaves the entries already written in place.
    pub fn replicate_to(&self, target_dir: impl AsRef<Path>) -> StoreResult<ReplicationReport> {
        let index = self.lock();
        let report = replicate_snapshot(&index, target_dir.as_ref(), &self.config)?;
        info!(
            node_id = %self.node_id,
            target = %report.target.display(),
            entries = report.entries_written,
            "replication complete"
        );
        Ok(report)
    }

    /// Remove every entry from the index and delete every entry file.
    ///
    /// Files in the base directory without the reserved suffix are kept.
    /// Returns the number of files removed.
    pub fn clear(&self) -> StoreResult<usize> {
        let mut index = self.lock();
        let files = scan_entries(&self.base_dir, &self.config.suffix)
            .map_err(|e| StoreError::persistence(&self.base_dir, e))?;

        let removed = remove_entries(&mut index, files)?;
        index.clear();

        info!(node_id = %self.node_id, removed, "store cleared");
        Ok(removed)
    }

    /// Identifier of the node owning this store.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Directory holding the entry files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Configuration the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Document>> {
        self.index.lock().expect("store mutex poisoned")
    }
}

/// Delete `files` in order, dropping each key from `index` once its file is
/// gone. Stops at the first failure, leaving the remaining keys indexed.
fn remove_entries(
    index: &mut HashMap<String, Document>,
    files: Vec<EntryFile>,
) -> StoreResult<usize> {
    let mut removed = 0;
    for file in files {
        remove_entry(&file.path)?;
        if let Some(key) = &file.key {
            index.remove(key);
        }
        removed += 1;
    }
    Ok(removed)
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("Store")
            .field("base_dir", &self.base_dir)
            .field("node_id", &self.node_id)
            .field("entry_count", &count)
            .finish()
    }
}
