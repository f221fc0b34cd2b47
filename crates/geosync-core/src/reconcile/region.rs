// crates/geosync-core/src/reconcile/region.rs
use super::{field, CountryCache, Outcome, Reconcile};
use crate::error::{GeoSyncError, Result};
use crate::model::Region;
use crate::traits::EntityStore;

// admin1CodesASCII.txt columns
const KEY: usize = 0;
const NAME: usize = 2;

/// Full refresh of region names. Rows are keyed `CC.code`, e.g. `US.CA`.
#[derive(Debug)]
pub struct RegionReconciler<'a> {
    countries: &'a mut CountryCache,
}

impl<'a> RegionReconciler<'a> {
    pub fn new(countries: &'a mut CountryCache) -> Self {
        Self { countries }
    }
}

/// `"US.CA"` -> `("US", "CA")`. Splits at the first dot only.
fn split_key(key: &str) -> Result<(&str, &str)> {
    key.split_once('.').ok_or_else(|| {
        GeoSyncError::MalformedRecord(format!("region key {key:?} has no country prefix"))
    })
}

impl Reconcile for RegionReconciler<'_> {
    fn reconcile<S: EntityStore + ?Sized>(
        &mut self,
        store: &mut S,
        items: &[String],
    ) -> Result<Outcome> {
        let (code2, code) = split_key(field(items, KEY, "region key")?)?;
        let name = field(items, NAME, "name")?;
        let country_id = self.countries.get(&*store, code2)?;

        let existing = store.find_region(country_id, code)?;
        let outcome = match &existing {
            None => Outcome::Created,
            Some(region) if region.name == name => Outcome::Unchanged,
            Some(_) => Outcome::Updated,
        };

        let mut region = existing.unwrap_or_else(|| Region::new(country_id, code));
        region.name = name.to_string();
        store.save_region(&mut region)?;

        Ok(outcome)
    }
}
