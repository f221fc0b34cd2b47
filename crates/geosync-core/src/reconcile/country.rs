// crates/geosync-core/src/reconcile/country.rs
use super::{field, Outcome, Reconcile};
use crate::error::Result;
use crate::model::Country;
use crate::traits::EntityStore;

// countryInfo.txt columns
const CODE2: usize = 0;
const CODE3: usize = 1;
const NAME: usize = 4;
const CONTINENT: usize = 8;
const TLD: usize = 9;

/// Full refresh: every import overwrites name, code3, continent and tld.
#[derive(Debug, Default)]
pub struct CountryReconciler;

impl Reconcile for CountryReconciler {
    fn reconcile<S: EntityStore + ?Sized>(
        &mut self,
        store: &mut S,
        items: &[String],
    ) -> Result<Outcome> {
        let code2 = field(items, CODE2, "code2")?;
        let existing = store.find_country(code2)?;
        let created = existing.is_none();
        let mut country = existing.clone().unwrap_or_else(|| Country::new(code2));

        let tld = field(items, TLD, "tld")?;
        country.name = field(items, NAME, "name")?.to_string();
        country.code3 = field(items, CODE3, "code3")?.to_string();
        country.continent = field(items, CONTINENT, "continent")?.to_string();
        country.tld = tld.strip_prefix('.').unwrap_or(tld).to_string();

        store.save_country(&mut country)?;

        Ok(if created {
            Outcome::Created
        } else if existing.as_ref() == Some(&country) {
            Outcome::Unchanged
        } else {
            Outcome::Updated
        })
    }
}
