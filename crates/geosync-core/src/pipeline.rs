// crates/geosync-core/src/pipeline.rs

//! # Sync Pipeline
//!
//! For every configured source, strictly one after another:
//!
//! 1. fetch: download unless the local copy is current (or forced)
//! 2. extract: archives only, replacing `.zip` by `.txt`
//! 3. decide: import if downloaded, or forced for all or for this file
//! 4. import: parse, then route each row to every kind the URL is
//!    configured for
//!
//! The store is flushed after each source. Any error aborts the run.

use crate::archive;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::filter::CityFilters;
use crate::parser;
use crate::reconcile::{
    CityReconciler, CountryCache, CountryReconciler, Outcome, Reconcile, RegionReconciler,
};
use crate::sources::{extracted_name, file_name_from_url, SourceKind, SourceRegistry};
use crate::traits::EntityStore;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Flags of one run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Download every source even if the local copy is current.
    pub force_all: bool,
    /// Import every source even if nothing was downloaded.
    pub force_import_all: bool,
    /// Downloaded file names (e.g. `cities15000.zip`) to download regardless.
    pub force: HashSet<String>,
    /// Imported file names (e.g. `cities15000.txt`) to import regardless.
    pub force_import: HashSet<String>,
}

impl SyncOptions {
    fn forces_download(&self, file_name: &str) -> bool {
        self.force_all || self.force.contains(file_name)
    }

    fn forces_import(&self, file_name: &str) -> bool {
        self.force_import_all || self.force_import.contains(file_name)
    }
}

/// Row counters for one imported file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub records: usize,
    pub rejected: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ImportStats {
    fn record(&mut self, outcome: &Outcome) {
        self.records += 1;
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Rejected(_) => self.rejected += 1,
        }
    }
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} created, {} updated, {} unchanged, {} rejected",
            self.records, self.created, self.updated, self.unchanged, self.rejected
        )
    }
}

/// What happened to one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub url: String,
    /// Name of the file that was (or would have been) imported.
    pub file_name: String,
    pub downloaded: bool,
    /// Kinds imported from this file, empty when the import was skipped.
    pub imported: Vec<(SourceKind, ImportStats)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub sources: Vec<SourceReport>,
}

impl SyncReport {
    pub fn downloads(&self) -> usize {
        self.sources.iter().filter(|s| s.downloaded).count()
    }

    pub fn imports(&self) -> usize {
        self.sources.iter().filter(|s| !s.imported.is_empty()).count()
    }
}

/// Ties fetcher, store and city filters together for repeated runs.
pub struct Pipeline<F, S> {
    registry: SourceRegistry,
    fetcher: F,
    store: S,
    filters: CityFilters,
}

impl<F: Fetch, S: EntityStore> Pipeline<F, S> {
    /// A pipeline with the default city filters (populated places only).
    pub fn new(registry: SourceRegistry, fetcher: F, store: S) -> Self {
        Self {
            registry,
            fetcher,
            store,
            filters: CityFilters::default(),
        }
    }

    /// Replaces the city filters.
    pub fn with_filters(mut self, filters: CityFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn run(&mut self, options: &SyncOptions) -> Result<SyncReport> {
        let data_dir = self.registry.data_dir.clone();
        if !data_dir.exists() {
            info!("Creating {}", data_dir.display());
            fs::create_dir_all(&data_dir)?;
        }

        if self.filters.is_empty() {
            debug!("No city filters, every city row is admitted");
        } else {
            debug!("{} city filters active", self.filters.len());
        }

        // one memo per run, a later run sees countries added in between
        let mut countries = CountryCache::new();
        let mut report = SyncReport::default();

        let urls: Vec<String> = self
            .registry
            .sources()
            .into_iter()
            .map(str::to_string)
            .collect();
        for url in urls {
            let source = self.sync_source(&url, &data_dir, options, &mut countries)?;
            report.sources.push(source);
        }

        Ok(report)
    }

    fn sync_source(
        &mut self,
        url: &str,
        data_dir: &Path,
        options: &SyncOptions,
        countries: &mut CountryCache,
    ) -> Result<SourceReport> {
        let mut file_name = file_name_from_url(url)?.to_string();
        let mut path = data_dir.join(&file_name);

        let downloaded = self
            .fetcher
            .fetch(url, &path, options.forces_download(&file_name))?;

        if let Some(inner) = extracted_name(&file_name) {
            path = archive::extract(&path, &inner, data_dir)?;
            file_name = inner;
        }

        let mut source = SourceReport {
            url: url.to_string(),
            file_name,
            downloaded,
            imported: Vec::new(),
        };

        if !(downloaded || options.forces_import(&source.file_name)) {
            info!("Skipping import of {}", source.file_name);
            return Ok(source);
        }

        info!("Importing {}", source.file_name);
        for kind in self.registry.kinds_for(url) {
            let stats = match kind {
                SourceKind::Country => import_file(&path, &mut self.store, &mut CountryReconciler)?,
                SourceKind::Region => import_file(
                    &path,
                    &mut self.store,
                    &mut RegionReconciler::new(countries),
                )?,
                SourceKind::City => import_file(
                    &path,
                    &mut self.store,
                    &mut CityReconciler::new(countries, &self.filters),
                )?,
            };
            info!("{} as {kind:?}: {stats}", source.file_name);
            source.imported.push((kind, stats));
        }
        self.store.flush()?;

        Ok(source)
    }
}

/// Feeds every record of `path` through `reconciler`.
pub fn import_file<S, R>(path: &Path, store: &mut S, reconciler: &mut R) -> Result<ImportStats>
where
    S: EntityStore + ?Sized,
    R: Reconcile,
{
    let mut stats = ImportStats::default();
    for items in parser::parse(path)? {
        let outcome = reconciler.reconcile(store, &items?)?;
        stats.record(&outcome);
    }
    Ok(stats)
}
