//! One-file-per-key persistence.
//!
//! Entry files are named `<key><suffix>` and hold the JSON encoding of the
//! document. Writes go to a temporary file in the destination directory and
//! are renamed over the entry file, so a reader never sees a torn entry.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{StoreConfig, SyncMode};
use crate::document::{self, Document};
use crate::error::{StoreError, StoreResult};

/// Prefix for in-flight temporary files.
const TEMP_PREFIX: &str = ".tzds-tmp-";

/// A store-owned file found while scanning a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFile {
    /// File name with the reserved suffix stripped, or `None` if the name
    /// is not valid UTF-8 and so cannot be a key.
    pub key: Option<String>,
    /// Full path of the file.
    pub path: PathBuf,
}

/// Path of the entry file for `key` inside `dir`.
pub fn entry_path(dir: &Path, key: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{key}{suffix}"))
}

/// Atomically write `document` as the entry file for `key` in `dir`.
///
/// Returns the path of the entry file.
pub fn write_entry(
    dir: &Path,
    key: &str,
    document: &Document,
    config: &StoreConfig,
) -> StoreResult<PathBuf> {
    let path = entry_path(dir, key, &config.suffix);
    let bytes = document::encode(document, config.pretty)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| StoreError::persistence(dir, e))?;
    tmp.write_all(&bytes)
        .and_then(|()| tmp.flush())
        .map_err(|e| StoreError::persistence(tmp.path(), e))?;

    if matches!(config.sync_mode, SyncMode::EveryWrite) {
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::persistence(tmp.path(), e))?;
    }

    tmp.persist(&path)
        .map_err(|e| StoreError::persistence(&path, e.error))?;

    debug!(key, path = %path.display(), len = bytes.len(), "entry written");
    Ok(path)
}

/// Delete an entry file.
pub fn remove_entry(path: &Path) -> StoreResult<()> {
    fs::remove_file(path).map_err(|e| StoreError::persistence(path, e))?;
    debug!(path = %path.display(), "entry removed");
    Ok(())
}

/// List every regular file in `dir` whose name ends with `suffix`.
///
/// The suffix is matched on the raw file name, so files whose names are not
/// valid UTF-8 are still returned, without a key. The result is sorted by
/// path.
pub fn scan_entries(dir: &Path, suffix: &str) -> io::Result<Vec<EntryFile>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.as_encoded_bytes().ends_with(suffix.as_bytes()) {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }

        let key = name
            .to_str()
            .and_then(|n| n.strip_suffix(suffix))
            .map(str::to_owned);
        entries.push(EntryFile { key, path });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
