// crates/geosync-core/src/store/mod.rs

//! # Entity Store
//!
//! Implementations of [`crate::traits::EntityStore`]: plain in-memory tables,
//! and the same tables persisted as a snapshot file in the data directory.

pub mod common_io;
mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

/// File name of the store snapshot inside the data directory.
#[cfg(not(feature = "compact"))]
pub const SNAPSHOT_FILE: &str = "geosync.bin";
#[cfg(feature = "compact")]
pub const SNAPSHOT_FILE: &str = "geosync.bin.gz";
