// crates/geosync-core/src/store/memory.rs
use crate::error::{GeoSyncError, Result};
use crate::model::{City, Country, EntityId, Region};
use crate::traits::EntityStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// In-memory entity tables.
///
/// Rows live in flat vectors and an entity's id is its position, so parent
/// lookups (`country_id`, `region_id`) are plain index operations. Natural
/// keys are indexed separately; the index is not serialized and is rebuilt
/// by [`MemoryStore::reindex`] after loading.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    pub(crate) countries: Vec<Country>,
    pub(crate) regions: Vec<Region>,
    pub(crate) cities: Vec<City>,
    #[serde(skip)]
    index: NaturalKeys,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct NaturalKeys {
    countries: HashMap<String, EntityId>,
    regions: HashMap<(EntityId, String), EntityId>,
    cities: HashMap<(String, EntityId), EntityId>,
}

/// A row kind stored in one of the tables.
trait Row: Clone {
    type Key: Eq + Hash + std::fmt::Debug;

    fn key(&self) -> Self::Key;
    fn id(&self) -> Option<EntityId>;
    fn set_id(&mut self, id: EntityId);
}

impl Row for Country {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.code2.clone()
    }
    fn id(&self) -> Option<EntityId> {
        self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

impl Row for Region {
    type Key = (EntityId, String);

    fn key(&self) -> Self::Key {
        (self.country_id, self.code.clone())
    }
    fn id(&self) -> Option<EntityId> {
        self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

impl Row for City {
    type Key = (String, EntityId);

    fn key(&self) -> Self::Key {
        (self.name.clone(), self.country_id)
    }
    fn id(&self) -> Option<EntityId> {
        self.id
    }
    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the natural-key index from the row tables.
    ///
    /// Fails if two rows share a natural key or a row's id does not match
    /// its position.
    pub fn reindex(&mut self) -> Result<()> {
        self.index = NaturalKeys {
            countries: build_index(&self.countries)?,
            regions: build_index(&self.regions)?,
            cities: build_index(&self.cities)?,
        };
        Ok(())
    }

    fn lookup<T: Row>(rows: &[T], index: &HashMap<T::Key, EntityId>, key: &T::Key) -> Option<T> {
        index
            .get(key)
            .and_then(|id| rows.get(*id as usize))
            .cloned()
    }
}

fn build_index<T: Row>(rows: &[T]) -> Result<HashMap<T::Key, EntityId>> {
    let mut index = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        if row.id() != Some(pos as EntityId) {
            return Err(GeoSyncError::InvalidData(format!(
                "row at position {pos} carries id {:?}",
                row.id()
            )));
        }
        if index.insert(row.key(), pos as EntityId).is_some() {
            return Err(GeoSyncError::InvalidData(format!(
                "duplicate natural key {:?}",
                row.key()
            )));
        }
    }
    Ok(index)
}

/// Insert-or-replace keeping the natural-key index consistent.
fn upsert<T: Row>(
    rows: &mut Vec<T>,
    index: &mut HashMap<T::Key, EntityId>,
    entity: &mut T,
) -> Result<()> {
    let key = entity.key();

    let id = match entity.id().or_else(|| index.get(&key).copied()) {
        Some(id) => {
            let current = rows.get(id as usize).ok_or_else(|| {
                GeoSyncError::InvalidData(format!("no row with id {id}"))
            })?;
            if let Some(holder) = index.get(&key) {
                if *holder != id {
                    return Err(GeoSyncError::InvalidData(format!(
                        "natural key {key:?} already belongs to row {holder}"
                    )));
                }
            }
            index.remove(&current.key());
            id
        }
        None => EntityId::try_from(rows.len())
            .map_err(|_| GeoSyncError::InvalidData("entity table is full".into()))?,
    };

    entity.set_id(id);
    index.insert(key, id);

    match rows.get_mut(id as usize) {
        Some(slot) => *slot = entity.clone(),
        None => rows.push(entity.clone()),
    }
    Ok(())
}

impl EntityStore for MemoryStore {
    fn find_country(&self, code2: &str) -> Result<Option<Country>> {
        Ok(Self::lookup(
            &self.countries,
            &self.index.countries,
            &code2.to_string(),
        ))
    }

    fn find_region(&self, country_id: EntityId, code: &str) -> Result<Option<Region>> {
        Ok(Self::lookup(
            &self.regions,
            &self.index.regions,
            &(country_id, code.to_string()),
        ))
    }

    fn find_city(&self, name: &str, country_id: EntityId) -> Result<Option<City>> {
        Ok(Self::lookup(
            &self.cities,
            &self.index.cities,
            &(name.to_string(), country_id),
        ))
    }

    fn save_country(&mut self, country: &mut Country) -> Result<()> {
        upsert(&mut self.countries, &mut self.index.countries, country)
    }

    fn save_region(&mut self, region: &mut Region) -> Result<()> {
        upsert(&mut self.regions, &mut self.index.regions, region)
    }

    fn save_city(&mut self, city: &mut City) -> Result<()> {
        upsert(&mut self.cities, &mut self.index.cities, city)
    }
}
