use std::io;
use std::path::PathBuf;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A persisted entry could not be decoded during recovery.
    ///
    /// The index cannot be trusted once this happens, so store construction
    /// is aborted rather than skipping the file.
    #[error("corrupt entry {}: {reason}", .path.display())]
    CorruptEntry { path: PathBuf, reason: String },

    /// The base directory or an entry in it could not be created or read.
    #[error("cannot access {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file write, rename or delete failed during an operation.
    #[error("persistence failure at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The key cannot be used as a file name.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A typed value could not be converted to or from a document.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
