//! Storage layer for family-funds
//!
//! The engine never touches storage. Hosts load a `Snapshot` through a
//! `SnapshotProvider` and persist goal lifecycle changes with atomic writes.

pub mod file_io;
pub mod init;
pub mod json_store;
pub mod snapshot_file;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use json_store::JsonSnapshotStore;
pub use snapshot_file::SnapshotFile;

use crate::error::FundsResult;
use crate::models::Snapshot;

/// Source of the four read-only collections
pub trait SnapshotProvider {
    /// Read a fresh snapshot
    fn load_snapshot(&self) -> FundsResult<Snapshot>;
}
