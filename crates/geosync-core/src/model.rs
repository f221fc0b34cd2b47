// crates/geosync-core/src/model.rs
//! Domain entities persisted by the import.
//!
//! The layout is flat: regions and cities point at their parents by
//! [`EntityId`] instead of nesting. An id of `None` means the entity has not
//! been saved yet; the store assigns one on first save.
use serde::{Deserialize, Serialize};

/// Row id assigned by an [`crate::traits::EntityStore`].
pub type EntityId = u32;

/// A Country entry. Natural key: `code2`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: Option<EntityId>,
    /// ISO 3166-1 alpha-2, e.g. "DE".
    pub code2: String,
    /// ISO 3166-1 alpha-3, e.g. "DEU".
    pub code3: String,
    pub name: String,
    /// Two-letter continent code, e.g. "EU".
    pub continent: String,
    /// Top-level domain without the leading dot, e.g. "de".
    pub tld: String,
}

/// An administrative subdivision. Natural key: (`country_id`, `code`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: Option<EntityId>,
    pub country_id: EntityId,
    /// The part of the upstream `CC.code` key after the country prefix.
    pub code: String,
    pub name: String,
}

/// A City entry. Natural key: (`name`, `country_id`).
///
/// Every optional field is fill-once: an import writes it only while it is
/// `None`. `geoname_id` and `region_id` are written together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Option<EntityId>,
    pub name: String,
    pub country_id: EntityId,
    pub region_id: Option<EntityId>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma-joined ASCII alternate names, see [`crate::text::normalize_search_names`].
    pub search_names: Option<String>,
    pub geoname_id: Option<u64>,
}

impl Country {
    pub fn new(code2: impl Into<String>) -> Self {
        Self {
            code2: code2.into(),
            ..Self::default()
        }
    }
}

impl Region {
    pub fn new(country_id: EntityId, code: impl Into<String>) -> Self {
        Self {
            id: None,
            country_id,
            code: code.into(),
            name: String::new(),
        }
    }
}

impl City {
    /// A city with only its natural key set, as an operator would create it
    /// by hand before any import enriched it.
    pub fn new(name: impl Into<String>, country_id: EntityId) -> Self {
        Self {
            id: None,
            name: name.into(),
            country_id,
            region_id: None,
            latitude: None,
            longitude: None,
            search_names: None,
            geoname_id: None,
        }
    }

    /// Search names as a list, empty when unset.
    pub fn search_names(&self) -> Vec<&str> {
        self.search_names
            .as_deref()
            .map(|s| s.split(',').collect())
            .unwrap_or_default()
    }
}
