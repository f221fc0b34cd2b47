// crates/geosync-core/src/reconcile/city.rs
use super::{field, parse_field, CountryCache, Outcome, Reconcile};
use crate::error::Result;
use crate::filter::CityFilters;
use crate::model::City;
use crate::text::normalize_search_names;
use crate::traits::EntityStore;
use tracing::{debug, info};

// cities*.txt columns (the geonames "geoname" table)
const GEONAME_ID: usize = 0;
const NAME: usize = 1;
const ALTERNATE_NAMES: usize = 3;
const LATITUDE: usize = 4;
const LONGITUDE: usize = 5;
const COUNTRY_CODE: usize = 8;
const ADMIN1_CODE: usize = 10;

/// Fill-once merge of city rows.
///
/// Rows first pass through the [`CityFilters`]; a rejected row is reported
/// as [`Outcome::Rejected`] without touching the store. Admitted rows only
/// fill fields that are still unset, so values an operator entered by hand
/// are never overwritten. The city is saved only if something was filled.
#[derive(Debug)]
pub struct CityReconciler<'a> {
    countries: &'a mut CountryCache,
    filters: &'a CityFilters,
}

impl<'a> CityReconciler<'a> {
    pub fn new(countries: &'a mut CountryCache, filters: &'a CityFilters) -> Self {
        Self { countries, filters }
    }
}

impl Reconcile for CityReconciler<'_> {
    fn reconcile<S: EntityStore + ?Sized>(
        &mut self,
        store: &mut S,
        items: &[String],
    ) -> Result<Outcome> {
        if let Err(rejection) = self.filters.check(items) {
            info!("Skipping city row {:?}: {rejection}", items.get(NAME));
            return Ok(Outcome::Rejected(rejection));
        }

        let country_id = self
            .countries
            .get(&*store, field(items, COUNTRY_CODE, "country code")?)?;
        let name = field(items, NAME, "name")?;

        let existing = store.find_city(name, country_id)?;
        let created = existing.is_none();
        let mut city = existing.unwrap_or_else(|| City::new(name, country_id));

        let mut changed = false;

        if city.latitude.is_none() {
            city.latitude = Some(parse_field(items, LATITUDE, "latitude")?);
            changed = true;
        }
        if city.longitude.is_none() {
            city.longitude = Some(parse_field(items, LONGITUDE, "longitude")?);
            changed = true;
        }
        if city.search_names.is_none() {
            // stays unset when nothing survives normalization, retried next import
            let raw = field(items, ALTERNATE_NAMES, "alternate names")?;
            if let Some(names) = normalize_search_names(raw) {
                city.search_names = Some(names);
                changed = true;
            }
        }
        if city.geoname_id.is_none() {
            // a hand-made city gets its id and region in one go, never revisited
            city.geoname_id = Some(parse_field(items, GEONAME_ID, "geoname id")?);
            let admin1 = field(items, ADMIN1_CODE, "admin1 code")?;
            // an unresolved code leaves whatever region the city already has
            match store.find_region(country_id, admin1)? {
                Some(region) => city.region_id = region.id,
                None => debug!("No region {admin1:?} for city {name:?}"),
            }
            changed = true;
        }

        if !changed {
            return Ok(Outcome::Unchanged);
        }

        store.save_city(&mut city)?;
        Ok(if created {
            Outcome::Created
        } else {
            Outcome::Updated
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoSyncError;
    use crate::model::{Country, EntityId, Region};
    use crate::store::MemoryStore;
    use tracing_test::traced_test;

    struct Row {
        geoname_id: &'static str,
        name: &'static str,
        alternate: &'static str,
        lat: &'static str,
        lng: &'static str,
        feature: &'static str,
        country: &'static str,
        admin1: &'static str,
    }

    impl Default for Row {
        fn default() -> Self {
            Self {
                geoname_id: "2950159",
                name: "Berlin",
                alternate: "Berlin,Berlín,Берлин",
                lat: "52.52437",
                lng: "13.41053",
                feature: "PPLC",
                country: "DE",
                admin1: "16",
            }
        }
    }

    impl Row {
        fn items(&self) -> Vec<String> {
            [
                self.geoname_id,
                self.name,
                self.name,
                self.alternate,
                self.lat,
                self.lng,
                "P",
                self.feature,
                self.country,
                "",
                self.admin1,
                "00",
                "",
                "",
                "3426354",
                "",
                "74",
                "Europe/Berlin",
                "2012-09-19",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect()
        }
    }

    struct Fixture {
        store: MemoryStore,
        cache: CountryCache,
        filters: CityFilters,
        de: EntityId,
        berlin_region: EntityId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut store = MemoryStore::new();
            let mut de = Country::new("DE");
            store.save_country(&mut de).unwrap();
            let de = de.id.unwrap();
            let mut region = Region::new(de, "16");
            region.name = "Berlin".into();
            store.save_region(&mut region).unwrap();

            Self {
                store,
                cache: CountryCache::new(),
                filters: CityFilters::default(),
                de,
                berlin_region: region.id.unwrap(),
            }
        }

        fn import(&mut self, row: &Row) -> Result<Outcome> {
            CityReconciler::new(&mut self.cache, &self.filters)
                .reconcile(&mut self.store, &row.items())
        }

        fn city(&self, name: &str) -> Option<City> {
            self.store.find_city(name, self.de).unwrap()
        }
    }

    #[test]
    fn first_sighting_fills_everything() {
        let mut fx = Fixture::new();
        assert_eq!(fx.import(&Row::default()).unwrap(), Outcome::Created);

        let berlin = fx.city("Berlin").unwrap();
        assert_eq!(berlin.latitude, Some(52.52437));
        assert_eq!(berlin.longitude, Some(13.41053));
        assert_eq!(berlin.search_names.as_deref(), Some("Berlin,Berlin"));
        assert_eq!(berlin.geoname_id, Some(2950159));
        assert_eq!(berlin.region_id, Some(fx.berlin_region));
    }

    #[test]
    fn set_fields_are_never_overwritten() {
        let mut fx = Fixture::new();
        fx.import(&Row::default()).unwrap();
        let before = fx.city("Berlin").unwrap();

        let outcome = fx
            .import(&Row {
                geoname_id: "1",
                alternate: "Spree-Athen",
                lat: "0.5",
                lng: "0.5",
                admin1: "99",
                ..Row::default()
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(fx.city("Berlin").unwrap(), before);
    }

    #[test]
    fn manual_city_is_enriched_without_clobbering() {
        let mut fx = Fixture::new();
        let mut manual = City::new("Berlin", fx.de);
        manual.latitude = Some(52.5);
        fx.store.save_city(&mut manual).unwrap();

        assert_eq!(fx.import(&Row::default()).unwrap(), Outcome::Updated);

        let berlin = fx.city("Berlin").unwrap();
        assert_eq!(berlin.id, manual.id);
        assert_eq!(berlin.latitude, Some(52.5));
        assert_eq!(berlin.longitude, Some(13.41053));
        assert_eq!(berlin.geoname_id, Some(2950159));
        assert_eq!(berlin.region_id, Some(fx.berlin_region));
    }

    #[test]
    fn unresolved_admin1_keeps_a_manual_region() {
        let mut fx = Fixture::new();
        let mut manual = City::new("Berlin", fx.de);
        manual.region_id = Some(fx.berlin_region);
        fx.store.save_city(&mut manual).unwrap();

        let outcome = fx
            .import(&Row {
                admin1: "99",
                ..Row::default()
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Updated);
        let berlin = fx.city("Berlin").unwrap();
        assert_eq!(berlin.geoname_id, Some(2950159));
        assert_eq!(berlin.region_id, manual.region_id);
    }

    #[test]
    fn search_names_left_unset_when_nothing_survives() {
        let mut fx = Fixture::new();
        fx.import(&Row {
            name: "Tokyo",
            alternate: "東京,Токио",
            ..Row::default()
        })
        .unwrap();
        assert_eq!(fx.city("Tokyo").unwrap().search_names, None);

        // a later file with usable names fills it in
        let outcome = fx
            .import(&Row {
                name: "Tokyo",
                alternate: "Tokio, Tōkyō",
                ..Row::default()
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(
            fx.city("Tokyo").unwrap().search_names.as_deref(),
            Some("Tokio,Tokyo")
        );
    }

    #[test]
    fn missing_region_leaves_region_unset_and_is_not_retried() {
        let mut fx = Fixture::new();
        fx.import(&Row {
            name: "Potsdam",
            admin1: "11",
            ..Row::default()
        })
        .unwrap();
        let potsdam = fx.city("Potsdam").unwrap();
        assert_eq!(potsdam.geoname_id, Some(2950159));
        assert_eq!(potsdam.region_id, None);

        let mut brandenburg = Region::new(fx.de, "11");
        fx.store.save_region(&mut brandenburg).unwrap();

        let outcome = fx
            .import(&Row {
                name: "Potsdam",
                admin1: "11",
                ..Row::default()
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(fx.city("Potsdam").unwrap().region_id, None);
    }

    #[test]
    fn rejected_rows_touch_nothing() {
        let mut fx = Fixture::new();
        let outcome = fx
            .import(&Row {
                name: "Landkreis Somewhere",
                feature: "ADM3",
                country: "ZZ",
                ..Row::default()
            })
            .unwrap();

        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert!(fx.store.cities.is_empty());
        assert!(fx.cache.is_empty());
    }

    #[test]
    #[traced_test]
    fn rejections_are_logged_at_info() {
        let mut fx = Fixture::new();
        fx.import(&Row {
            name: "Mitte",
            feature: "ADM4",
            ..Row::default()
        })
        .unwrap();

        assert!(logs_contain("Skipping city row"));
        logs_assert(|lines: &[&str]| {
            if lines
                .iter()
                .any(|l| l.contains("INFO") && l.contains("Mitte") && l.contains("ADM4"))
            {
                Ok(())
            } else {
                Err("rejection not logged at info".to_string())
            }
        });
    }

    #[test]
    fn unparsable_coordinates_are_malformed() {
        let mut fx = Fixture::new();
        let err = fx
            .import(&Row {
                lat: "n/a",
                ..Row::default()
            })
            .unwrap_err();
        assert!(matches!(err, GeoSyncError::MalformedRecord(_)));
        assert!(fx.store.cities.is_empty());
    }
}
