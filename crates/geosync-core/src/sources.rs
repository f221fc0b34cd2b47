// crates/geosync-core/src/sources.rs
//! Which remote files feed which record kind, and where they land locally.
use crate::error::{GeoSyncError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const GEONAMES_DUMP_URL: &str = "http://download.geonames.org/export/dump";

/// Extension of archive sources, replaced by [`TEXT_EXTENSION`] on extraction.
pub const ARCHIVE_EXTENSION: &str = ".zip";
pub const TEXT_EXTENSION: &str = ".txt";

/// The record kind a source file feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Country,
    Region,
    City,
}

/// Static source configuration.
///
/// Every field is optional in a config file; missing ones keep their
/// defaults (the geonames dump of `countryInfo.txt`, `admin1CodesASCII.txt`
/// and `cities15000.zip`, stored under `./data`).
///
/// ```json
/// {
///   "city_sources": ["http://download.geonames.org/export/dump/cities5000.zip"],
///   "data_dir": "/var/lib/geosync"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRegistry {
    pub country_sources: Vec<String>,
    pub region_sources: Vec<String>,
    pub city_sources: Vec<String>,
    pub data_dir: PathBuf,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self {
            country_sources: vec![format!("{GEONAMES_DUMP_URL}/countryInfo.txt")],
            region_sources: vec![format!("{GEONAMES_DUMP_URL}/admin1CodesASCII.txt")],
            city_sources: vec![format!("{GEONAMES_DUMP_URL}/cities15000.zip")],
            data_dir: PathBuf::from("data"),
        }
    }
}

impl SourceRegistry {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            GeoSyncError::NotFound(format!("Config not found at {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// All source URLs, countries first, then regions, then cities.
    ///
    /// A URL listed under several kinds appears once, at its first position.
    pub fn sources(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let all = self
            .country_sources
            .iter()
            .chain(&self.region_sources)
            .chain(&self.city_sources);
        for url in all {
            if !out.contains(&url.as_str()) {
                out.push(url);
            }
        }
        out
    }

    /// Every kind `url` is configured for. Membership is checked per list,
    /// so one URL may feed more than one kind.
    pub fn kinds_for(&self, url: &str) -> Vec<SourceKind> {
        [
            (SourceKind::Country, &self.country_sources),
            (SourceKind::Region, &self.region_sources),
            (SourceKind::City, &self.city_sources),
        ]
        .into_iter()
        .filter(|(_, list)| list.iter().any(|u| u == url))
        .map(|(kind, _)| kind)
        .collect()
    }
}

/// Local file name for a URL: its final path segment.
pub fn file_name_from_url(url: &str) -> Result<&str> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    match without_query.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(GeoSyncError::InvalidData(format!(
            "source URL has no file name: {url}"
        ))),
    }
}

/// `cities15000.zip` -> `Some("cities15000.txt")`, `None` for non-archives.
pub fn extracted_name(file_name: &str) -> Option<String> {
    file_name
        .strip_suffix(ARCHIVE_EXTENSION)
        .map(|stem| format!("{stem}{TEXT_EXTENSION}"))
}
