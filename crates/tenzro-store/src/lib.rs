//! File-backed key-value document storage for the Tenzro Ledger.
//!
//! A [`Store`] keeps every document in an in-memory index and mirrors each
//! entry to one file per key, named `<key>.tzds`, in its base directory.
//! On open the index is rebuilt from those files. [`Store::replicate_to`]
//! pushes a full snapshot of the index into another directory, which a
//! follower store can then open.
//!
//! # Modules
//!
//! - [`error`] -- [`StoreError`] and the [`StoreResult`] alias
//! - [`config`] -- [`StoreConfig`]: suffix, sync mode, output style
//! - [`document`] -- the [`Document`] type and its JSON encoding
//! - [`key`] -- key validation
//! - [`persist`] -- atomic one-file-per-key writes and directory scans
//! - [`recovery`] -- index reconstruction at open
//! - [`replication`] -- snapshot replication
//! - [`store`] -- the [`Store`] itself
//!
//! # Design Rules
//!
//! 1. The index and the entry files change together under one guard.
//! 2. Entry files are replaced by rename, never rewritten in place.
//! 3. A corrupt entry fails recovery; it is never skipped.
//! 4. Replication only adds or overwrites, it never deletes.
//! 5. Stores sharing a directory are not coordinated (single writer).

pub mod config;
pub mod document;
pub mod error;
pub mod key;
pub mod persist;
pub mod recovery;
pub mod replication;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{StoreConfig, SyncMode, DEFAULT_SUFFIX};
pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use replication::ReplicationReport;
pub use store::Store;
