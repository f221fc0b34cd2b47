// crates/geosync-core/src/reconcile/cache.rs
use crate::error::{GeoSyncError, Result};
use crate::model::EntityId;
use crate::traits::EntityStore;
use std::collections::HashMap;

/// Lazy code2 -> country id map for one pipeline run.
///
/// Region and city files repeat the same few hundred country codes across
/// many thousand rows; each code hits the store once per run.
#[derive(Debug, Default)]
pub struct CountryCache {
    ids: HashMap<String, EntityId>,
}

impl CountryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<S: EntityStore + ?Sized>(&mut self, store: &S, code2: &str) -> Result<EntityId> {
        if let Some(id) = self.ids.get(code2) {
            return Ok(*id);
        }

        let country = store
            .find_country(code2)?
            .ok_or_else(|| GeoSyncError::UnknownCountry(code2.to_string()))?;
        let id = country.id.ok_or_else(|| {
            GeoSyncError::InvalidData(format!("store returned country {code2} without an id"))
        })?;

        self.ids.insert(code2.to_string(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
