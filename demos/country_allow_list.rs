//! Sync only the cities of a few countries, plus a hand-written filter.
//!
//! ```text
//! cargo run --example country_allow_list -- DE,CH,AT
//! ```
use geosync_core::{
    CityFilters, CountryAllowList, FilterRejection, GeoSearch, HttpFetcher, Pipeline,
    SnapshotStore, SourceRegistry, SyncOptions,
};

/// geonames column 14 holds the population.
const POPULATION_FIELD: usize = 14;

fn main() -> geosync_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("geosync_core=info")
        .with_writer(std::io::stderr)
        .init();

    let codes = std::env::args().nth(1).unwrap_or_else(|| "DE,CH,AT".into());

    let filters = CityFilters::default()
        .with(CountryAllowList::new(codes.split(',')))
        .with(|items: &[String]| {
            let population: u64 = items
                .get(POPULATION_FIELD)
                .and_then(|p| p.parse().ok())
                .unwrap_or(0);
            if population >= 50_000 {
                Ok(())
            } else {
                Err(FilterRejection::new(format!("population {population} below 50000")))
            }
        });

    let registry = SourceRegistry::default().with_data_dir("data/demo");
    std::fs::create_dir_all(&registry.data_dir)?;
    let store = SnapshotStore::open(&registry.data_dir)?;

    let mut pipeline = Pipeline::new(registry, HttpFetcher::new()?, store).with_filters(filters);
    let report = pipeline.run(&SyncOptions::default())?;

    for source in &report.sources {
        for (kind, stats) in &source.imported {
            println!("{} as {kind:?}: {stats}", source.file_name);
        }
    }

    let stats = pipeline.store().stats();
    println!(
        "{} countries, {} regions, {} cities from {codes}",
        stats.countries, stats.regions, stats.cities
    );
    Ok(())
}
