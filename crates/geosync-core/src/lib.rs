// crates/geosync-core/src/lib.rs

//! Keeps a local country / region / city store in sync with the geonames
//! dump files.
//!
//! ```no_run
//! use geosync_core::{HttpFetcher, Pipeline, SnapshotStore, SourceRegistry, SyncOptions};
//!
//! # fn main() -> geosync_core::Result<()> {
//! let registry = SourceRegistry::default();
//! let store = SnapshotStore::open(&registry.data_dir)?;
//! let mut pipeline = Pipeline::new(registry, HttpFetcher::new()?, store);
//! let report = pipeline.run(&SyncOptions::default())?;
//! println!("{} files downloaded", report.downloads());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod common;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod search;
pub mod sources;
pub mod store;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::common::DbStats;
pub use crate::error::{GeoSyncError, Result};
pub use crate::fetch::{Fetch, HttpFetcher};
pub use crate::filter::{CityFilter, CityFilters, CountryAllowList, FilterRejection, PopulatedPlaces};
pub use crate::model::{City, Country, EntityId, Region};
pub use crate::pipeline::{ImportStats, Pipeline, SourceReport, SyncOptions, SyncReport};
pub use crate::search::GeoSearch;
pub use crate::sources::{SourceKind, SourceRegistry};
pub use crate::store::{MemoryStore, SnapshotStore};
pub use crate::traits::{EntityStore, NameMatch};
