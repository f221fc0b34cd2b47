// crates/geosync-core/tests/pipeline.rs
use geosync_core::error::GeoSyncError;
use geosync_core::{
    CityFilters, CountryAllowList, EntityStore, Fetch, GeoSearch, MemoryStore, Pipeline,
    SnapshotStore, SourceKind, SourceRegistry, SyncOptions,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const COUNTRIES_URL: &str = "http://geo.test/dump/countryInfo.txt";
const REGIONS_URL: &str = "http://geo.test/dump/admin1CodesASCII.txt";
const CITIES_URL: &str = "http://geo.test/dump/cities15000.zip";

const COUNTRY_INFO: &str = "\
# GeoNames country info
#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea(in sq km)\tPopulation\tContinent\ttld\tCurrencyCode
DE\tDEU\t276\tGM\tGermany\tBerlin\t357022\t82927922\tEU\t.de\tEUR
CH\tCHE\t756\tSZ\tSwitzerland\tBern\t41290\t8516543\tEU\t.ch\tCHF
";

const ADMIN1: &str = "\
DE.16\tBerlin\tBerlin\t2950157
CH.ZH\tZurich\tZurich\t2657895
";

const CITIES: &str = "\
2950159\tBerlin\tBerlin\tBerlin,Berlín,Берлин\t52.52437\t13.41053\tP\tPPLC\tDE\t\t16\t00\t11000\t11000000\t3426354\t\t74\tEurope/Berlin\t2012-09-19
2657896\tZürich\tZurich\tZurich,Zurigo,Zürich\t47.36667\t8.55\tP\tPPLA\tCH\t\tZH\t112\t261\t\t341730\t\t429\tEurope/Zurich\t2012-09-19
6295521\tKreis 1\tKreis 1\t\t47.37\t8.54\tA\tADM3\tCH\t\tZH\t112\t261\t\t5700\t\t408\tEurope/Zurich\t2012-09-19
";

fn zipped(entry: &str, body: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(entry, SimpleFileOptions::default()).unwrap();
    zip.write_all(body.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Serves canned bodies and keeps the local copy whenever one exists.
#[derive(Clone, Default)]
struct FakeFetch {
    bodies: HashMap<String, Vec<u8>>,
    downloads: Rc<RefCell<Vec<String>>>,
}

impl FakeFetch {
    fn geonames() -> Self {
        let mut fake = Self::default();
        fake.serve(COUNTRIES_URL, COUNTRY_INFO.as_bytes().to_vec());
        fake.serve(REGIONS_URL, ADMIN1.as_bytes().to_vec());
        fake.serve(CITIES_URL, zipped("cities15000.txt", CITIES));
        fake
    }

    fn serve(&mut self, url: &str, body: Vec<u8>) {
        self.bodies.insert(url.to_string(), body);
    }

    fn downloads(&self) -> Vec<String> {
        self.downloads.borrow().clone()
    }
}

impl Fetch for FakeFetch {
    fn fetch(&self, url: &str, path: &Path, force: bool) -> geosync_core::Result<bool> {
        if !force && path.exists() {
            return Ok(false);
        }
        let body = self.bodies.get(url).ok_or_else(|| GeoSyncError::Network {
            url: url.to_string(),
            reason: "404".into(),
        })?;
        fs::write(path, body)?;
        self.downloads.borrow_mut().push(url.to_string());
        Ok(true)
    }
}

fn registry(data_dir: &Path) -> SourceRegistry {
    SourceRegistry {
        country_sources: vec![COUNTRIES_URL.into()],
        region_sources: vec![REGIONS_URL.into()],
        city_sources: vec![CITIES_URL.into()],
        data_dir: data_dir.to_path_buf(),
    }
}

fn city_stats(report: &geosync_core::SyncReport) -> geosync_core::ImportStats {
    report
        .sources
        .iter()
        .flat_map(|s| &s.imported)
        .find(|(kind, _)| *kind == SourceKind::City)
        .map(|(_, stats)| *stats)
        .expect("cities were imported")
}

#[test]
fn first_run_downloads_extracts_and_imports_everything() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("nested").join("data");
    let fetch = FakeFetch::geonames();
    let mut pipeline = Pipeline::new(registry(&data_dir), fetch.clone(), MemoryStore::new());

    let report = pipeline.run(&SyncOptions::default()).unwrap();

    assert!(data_dir.is_dir());
    assert!(data_dir.join("cities15000.txt").is_file());
    assert_eq!(fetch.downloads(), vec![COUNTRIES_URL, REGIONS_URL, CITIES_URL]);
    assert_eq!(report.downloads(), 3);
    assert_eq!(report.imports(), 3);
    assert_eq!(report.sources[2].file_name, "cities15000.txt");

    let cities = city_stats(&report);
    assert_eq!((cities.records, cities.created, cities.rejected), (3, 2, 1));

    let store = pipeline.store();
    let stats = store.stats();
    assert_eq!((stats.countries, stats.regions, stats.cities), (2, 2, 2));

    let de = store.find_country_by_code("DEU").unwrap();
    assert_eq!(de.tld, "de");

    let hits = store.find_cities_by_substring("zurigo");
    assert_eq!(hits.len(), 1);
    let (zurich, region, country) = hits[0];
    assert_eq!(zurich.name, "Zürich");
    assert_eq!(zurich.geoname_id, Some(2657896));
    assert_eq!(region.map(|r| r.code.as_str()), Some("ZH"));
    assert_eq!(country.code2, "CH");
}

#[test]
fn second_run_without_changes_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let fetch = FakeFetch::geonames();
    let mut pipeline = Pipeline::new(registry(dir.path()), fetch.clone(), MemoryStore::new());

    pipeline.run(&SyncOptions::default()).unwrap();
    let before = pipeline.store().clone();

    let report = pipeline.run(&SyncOptions::default()).unwrap();

    assert_eq!(fetch.downloads().len(), 3);
    assert_eq!(report.downloads(), 0);
    assert_eq!(report.imports(), 0);
    assert_eq!(pipeline.store(), &before);
}

#[test]
fn forcing_uses_download_name_and_import_name() {
    let dir = TempDir::new().unwrap();
    let fetch = FakeFetch::geonames();
    let mut pipeline = Pipeline::new(registry(dir.path()), fetch.clone(), MemoryStore::new());
    pipeline.run(&SyncOptions::default()).unwrap();

    // import forcing names the extracted file
    let report = pipeline
        .run(&SyncOptions {
            force_import: HashSet::from(["cities15000.txt".to_string()]),
            ..SyncOptions::default()
        })
        .unwrap();
    assert_eq!(report.downloads(), 0);
    assert_eq!(report.imports(), 1);
    let cities = city_stats(&report);
    assert_eq!((cities.unchanged, cities.rejected), (2, 1));

    // the archive name does not force an import on its own
    let report = pipeline
        .run(&SyncOptions {
            force_import: HashSet::from(["cities15000.zip".to_string()]),
            ..SyncOptions::default()
        })
        .unwrap();
    assert_eq!(report.imports(), 0);

    // download forcing names the fetched file, and a download always imports
    let report = pipeline
        .run(&SyncOptions {
            force: HashSet::from(["cities15000.zip".to_string()]),
            ..SyncOptions::default()
        })
        .unwrap();
    assert_eq!(report.downloads(), 1);
    assert_eq!(report.imports(), 1);
    assert_eq!(fetch.downloads().last().map(String::as_str), Some(CITIES_URL));

    let report = pipeline
        .run(&SyncOptions {
            force_import_all: true,
            ..SyncOptions::default()
        })
        .unwrap();
    assert_eq!((report.downloads(), report.imports()), (0, 3));
}

#[test]
fn extra_city_filter_narrows_the_import() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(
        registry(dir.path()),
        FakeFetch::geonames(),
        MemoryStore::new(),
    )
    .with_filters(CityFilters::default().with(CountryAllowList::new(["ch"])));

    let report = pipeline.run(&SyncOptions::default()).unwrap();

    let cities = city_stats(&report);
    assert_eq!((cities.created, cities.rejected), (1, 2));
    let de = pipeline.store().find_country("DE").unwrap().unwrap().id.unwrap();
    assert!(pipeline.store().find_city("Berlin", de).unwrap().is_none());
}

#[test]
fn url_listed_for_two_kinds_is_fetched_once_and_routed_to_both() {
    let dir = TempDir::new().unwrap();
    let fetch = FakeFetch::geonames();
    let registry = SourceRegistry {
        country_sources: vec![COUNTRIES_URL.into()],
        region_sources: vec![],
        city_sources: vec![COUNTRIES_URL.into()],
        data_dir: dir.path().to_path_buf(),
    };
    let mut pipeline = Pipeline::new(registry, fetch.clone(), MemoryStore::new());

    let report = pipeline.run(&SyncOptions::default()).unwrap();

    assert_eq!(fetch.downloads(), vec![COUNTRIES_URL]);
    assert_eq!(report.sources.len(), 1);
    let kinds: Vec<_> = report.sources[0].imported.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, vec![SourceKind::Country, SourceKind::City]);
    // country rows are no populated places
    assert_eq!(city_stats(&report).rejected, 2);
    assert_eq!(pipeline.store().stats().countries, 2);
}

#[test]
fn cities_without_their_country_abort_the_run() {
    let dir = TempDir::new().unwrap();
    let registry = SourceRegistry {
        country_sources: vec![],
        region_sources: vec![],
        city_sources: vec![CITIES_URL.into()],
        data_dir: dir.path().to_path_buf(),
    };
    let mut pipeline = Pipeline::new(registry, FakeFetch::geonames(), MemoryStore::new());

    let err = pipeline.run(&SyncOptions::default()).unwrap_err();
    assert!(matches!(err, GeoSyncError::UnknownCountry(code) if code == "DE"));
}

#[test]
fn snapshot_survives_between_runs() {
    let dir = TempDir::new().unwrap();
    let fetch = FakeFetch::geonames();

    let store = SnapshotStore::open(dir.path()).unwrap();
    let mut pipeline = Pipeline::new(registry(dir.path()), fetch.clone(), store);
    pipeline.run(&SyncOptions::default()).unwrap();
    let first = pipeline.into_store().into_inner();

    let reopened = SnapshotStore::open(dir.path()).unwrap();
    assert_eq!(reopened.stats(), first.stats());
    let ch = reopened.find_country("CH").unwrap().unwrap();
    assert_eq!(ch.name, "Switzerland");

    // a new process sees current files and an up to date store
    let mut pipeline = Pipeline::new(registry(dir.path()), fetch.clone(), reopened);
    let report = pipeline.run(&SyncOptions::default()).unwrap();
    assert_eq!((report.downloads(), report.imports()), (0, 0));
    assert_eq!(fetch.downloads().len(), 3);
}
