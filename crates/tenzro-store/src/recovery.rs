use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::document::{self, Document};
use crate::error::{StoreError, StoreResult};
use crate::key::validate_key;
use crate::persist::scan_entries;

/// Rebuild the index from the entry files in `dir`.
///
/// The directory is created if it does not exist. Every file carrying the
/// reserved suffix must decode: a single malformed entry fails the whole
/// recovery with [`StoreError::CorruptEntry`], since an index missing
/// entries would silently disagree with disk.
///
/// Suffixed files that can never hold a key (a non UTF-8 name, or a name
/// such as `.tzds` or `..tzds` that strips to an invalid key) are not
/// entries: they are logged at `warn` and skipped without being decoded.
pub fn recover_index(dir: &Path, suffix: &str) -> StoreResult<HashMap<String, Document>> {
    fs::create_dir_all(dir).map_err(|e| StoreError::access(dir, e))?;
    let files = scan_entries(dir, suffix).map_err(|e| StoreError::access(dir, e))?;

    let mut index = HashMap::with_capacity(files.len());
    for file in files {
        let Some(key) = file.key else {
            warn!(
                path = %file.path.display(),
                "skipping entry with non UTF-8 name; contents not checked"
            );
            continue;
        };
        if let Err(e) = validate_key(&key) {
            warn!(
                path = %file.path.display(),
                error = %e,
                "skipping entry with unusable key; contents not checked"
            );
            continue;
        }

        let bytes = fs::read(&file.path).map_err(|e| StoreError::access(&file.path, e))?;
        let document = document::decode(&bytes).map_err(|e| StoreError::CorruptEntry {
            path: file.path.clone(),
            reason: e.to_string(),
        })?;
        index.insert(key, document);
    }

    debug!(dir = %dir.display(), recovered = index.len(), "index recovery complete");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recover_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("nested").join("store");
        let index = recover_index(&base, ".tzds").unwrap();
        assert!(index.is_empty());
        assert!(base.is_dir());
    }

    #[test]
    fn recover_loads_suffixed_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tx_1.tzds"), r#"{"value":1}"#).unwrap();
        fs::write(dir.path().join("tx_2.tzds"), r#"[true,null]"#).unwrap();
        fs::write(dir.path().join("README"), "not json at all").unwrap();

        let index = recover_index(dir.path(), ".tzds").unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index["tx_1"], json!({"value": 1}));
        assert_eq!(index["tx_2"], json!([true, null]));
    }

    #[test]
    fn corrupt_entry_aborts_recovery() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.tzds"), "{}").unwrap();
        fs::write(dir.path().join("bad.tzds"), "{not json").unwrap();

        match recover_index(dir.path(), ".tzds").unwrap_err() {
            StoreError::CorruptEntry { path, .. } => {
                assert_eq!(path, dir.path().join("bad.tzds"));
            }
            other => panic!("expected CorruptEntry, got {other:?}"),
        }
    }

    #[test]
    fn empty_entry_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("truncated.tzds"), "").unwrap();
        let err = recover_index(dir.path(), ".tzds").unwrap_err();
        assert!(matches!(err, StoreError::CorruptEntry { .. }));
    }

    #[test]
    fn bare_suffix_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".tzds"), "{}").unwrap();
        let index = recover_index(dir.path(), ".tzds").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn unusable_key_file_is_skipped_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("..tzds"), "{not json").unwrap();
        fs::write(dir.path().join("ok.tzds"), "true").unwrap();
        let index = recover_index(dir.path(), ".tzds").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["ok"], json!(true));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_entry_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xFF.tzds")), "{}").unwrap();
        let index = recover_index(dir.path(), ".tzds").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn custom_suffix_ignores_default_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.ledger"), "1").unwrap();
        fs::write(dir.path().join("b.tzds"), "2").unwrap();
        let index = recover_index(dir.path(), ".ledger").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["a"], json!(1));
    }

    #[test]
    fn base_path_that_is_a_file_is_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();
        let err = recover_index(&file, ".tzds").unwrap_err();
        assert!(matches!(err, StoreError::Access { .. }));
    }
}
