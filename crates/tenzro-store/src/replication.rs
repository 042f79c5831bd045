use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::persist::write_entry;

/// Result of a snapshot replication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplicationReport {
    /// Directory the snapshot was written to.
    pub target: PathBuf,
    /// Number of entry files written.
    pub entries_written: usize,
}

/// Write every entry of `index` into `target`, in key order.
///
/// Existing files with the same names are overwritten; files present only
/// in the target are left alone. Not transactional: on failure, entries
/// already written stay on the target.
pub(crate) fn replicate_snapshot(
    index: &HashMap<String, Document>,
    target: &Path,
    config: &StoreConfig,
) -> StoreResult<ReplicationReport> {
    fs::create_dir_all(target).map_err(|e| StoreError::persistence(target, e))?;

    let mut keys: Vec<&String> = index.keys().collect();
    keys.sort();

    let mut entries_written = 0;
    for key in keys {
        write_entry(target, key, &index[key], config)?;
        entries_written += 1;
    }

    Ok(ReplicationReport {
        target: target.to_path_buf(),
        entries_written,
    })
}
