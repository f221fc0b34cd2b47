// crates/geosync-core/src/store/snapshot.rs
use super::common_io;
use super::memory::MemoryStore;
use super::SNAPSHOT_FILE;
use crate::error::Result;
use crate::model::{City, Country, EntityId, Region};
use crate::traits::EntityStore;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A [`MemoryStore`] persisted as a single bincode snapshot on disk.
///
/// Saves mutate memory only; [`EntityStore::flush`] writes the snapshot
/// when anything changed since the last flush.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    inner: MemoryStore,
    dirty: bool,
}

impl SnapshotStore {
    /// Opens the snapshot inside `data_dir`, see [`SnapshotStore::open_path`].
    pub fn open(data_dir: &Path) -> Result<Self> {
        Self::open_path(data_dir.join(SNAPSHOT_FILE))
    }

    /// Loads the snapshot at `path`, or starts empty if there is none yet.
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let inner = if path.exists() {
            let mut store: MemoryStore = common_io::read_snapshot(&path)?;
            store.reindex()?;
            debug!("Loaded snapshot {}", path.display());
            store
        } else {
            info!("No snapshot at {}, starting empty", path.display());
            MemoryStore::new()
        };

        Ok(Self {
            path,
            inner,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_inner(self) -> MemoryStore {
        self.inner
    }

    fn touched(&mut self, result: Result<()>) -> Result<()> {
        result?;
        self.dirty = true;
        Ok(())
    }
}

impl Deref for SnapshotStore {
    type Target = MemoryStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl EntityStore for SnapshotStore {
    fn find_country(&self, code2: &str) -> Result<Option<Country>> {
        self.inner.find_country(code2)
    }

    fn find_region(&self, country_id: EntityId, code: &str) -> Result<Option<Region>> {
        self.inner.find_region(country_id, code)
    }

    fn find_city(&self, name: &str, country_id: EntityId) -> Result<Option<City>> {
        self.inner.find_city(name, country_id)
    }

    fn save_country(&mut self, country: &mut Country) -> Result<()> {
        let result = self.inner.save_country(country);
        self.touched(result)
    }

    fn save_region(&mut self, region: &mut Region) -> Result<()> {
        let result = self.inner.save_region(region);
        self.touched(result)
    }

    fn save_city(&mut self, city: &mut City) -> Result<()> {
        let result = self.inner.save_city(city);
        self.touched(result)
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        common_io::write_snapshot(&self.path, &self.inner)?;
        self.dirty = false;
        debug!("Wrote snapshot {}", self.path.display());
        Ok(())
    }
}
