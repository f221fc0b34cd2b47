// crates/geosync-core/src/search.rs
use crate::common::DbStats;
use crate::model::{City, Country, EntityId, Region};
use crate::store::MemoryStore;
use crate::text::fold_key;
use crate::traits::NameMatch;

/// A city with its country and (if known) region.
pub type CityContext<'a> = (&'a City, Option<&'a Region>, &'a Country);

/// Read-side queries over imported data.
pub trait GeoSearch {
    fn stats(&self) -> DbStats;

    fn countries(&self) -> &[Country];

    fn country(&self, id: EntityId) -> Option<&Country>;

    fn region(&self, id: EntityId) -> Option<&Region>;

    /// ISO2 or ISO3, case-insensitive.
    fn find_country_by_code(&self, code: &str) -> Option<&Country>;

    fn regions_for_country(&self, country: &Country) -> Vec<&Region>;

    /// Accent- and case-insensitive substring match on the city name or any
    /// of its search names.
    fn find_cities_by_substring(&self, substr: &str) -> Vec<CityContext<'_>>;
}

impl GeoSearch for MemoryStore {
    fn stats(&self) -> DbStats {
        DbStats {
            countries: self.countries.len(),
            regions: self.regions.len(),
            cities: self.cities.len(),
        }
    }

    fn countries(&self) -> &[Country] {
        &self.countries
    }

    fn country(&self, id: EntityId) -> Option<&Country> {
        self.countries.get(id as usize)
    }

    fn region(&self, id: EntityId) -> Option<&Region> {
        self.regions.get(id as usize)
    }

    fn find_country_by_code(&self, code: &str) -> Option<&Country> {
        let code = code.trim();
        self.countries
            .iter()
            .find(|c| c.code2.eq_ignore_ascii_case(code))
            .or_else(|| {
                self.countries
                    .iter()
                    .find(|c| c.code3.eq_ignore_ascii_case(code))
            })
    }

    fn regions_for_country(&self, country: &Country) -> Vec<&Region> {
        let Some(id) = country.id else {
            return Vec::new();
        };
        self.regions.iter().filter(|r| r.country_id == id).collect()
    }

    fn find_cities_by_substring(&self, substr: &str) -> Vec<CityContext<'_>> {
        let q = fold_key(substr);
        let mut out = Vec::new();
        if q.is_empty() {
            return out;
        }

        for city in &self.cities {
            let matched = city.name_contains(substr)
                || city
                    .search_names()
                    .iter()
                    .any(|alias| fold_key(alias).contains(&q));
            if !matched {
                continue;
            }
            // ID Lookup!
            if let Some(country) = self.country(city.country_id) {
                let region = city.region_id.and_then(|id| self.region(id));
                out.push((city, region, country));
            }
        }
        out
    }
}
