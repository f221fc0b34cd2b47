//! geosync: command-line front end of geosync-core
//!
//! `sync` runs the download/import pipeline against the configured sources;
//! the other subcommands inspect the store snapshot it leaves behind.
//!
//! Usage examples
//! --------------
//!
//! - Fetch what changed and import it
//!   $ geosync sync
//!
//! - Re-import the city file without downloading it again
//!   $ geosync sync --force-import cities15000.txt
//!
//! - Only keep cities of some countries, from a custom config
//!   $ geosync --config sources.json sync --countries DE,CH,AT
//!
//! - Inspect the result
//!   $ geosync stats
//!   $ geosync country deu
//!   $ geosync regions CH
//!   $ geosync cities zurich
mod args;

use crate::args::{CliArgs, Commands, SyncArgs};
use anyhow::Context;
use clap::Parser;
use geosync_core::{
    CityFilters, CountryAllowList, GeoSearch, HttpFetcher, Pipeline, SnapshotStore,
    SourceRegistry, SyncOptions,
};
use tracing::debug;

fn setup_logging(args: &CliArgs) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.log_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("geosync_core={log_level},geosync={log_level}"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {log_level}");
}

fn load_registry(args: &CliArgs) -> anyhow::Result<SourceRegistry> {
    let registry = match &args.config {
        Some(path) => SourceRegistry::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SourceRegistry::default(),
    };
    Ok(match &args.data_dir {
        Some(dir) => registry.with_data_dir(dir),
        None => registry,
    })
}

fn sync(registry: SourceRegistry, args: SyncArgs) -> anyhow::Result<()> {
    let store = SnapshotStore::open(&registry.data_dir)?;
    let mut filters = CityFilters::default();
    if !args.countries.is_empty() {
        filters.push(CountryAllowList::new(&args.countries));
    }

    let options = SyncOptions {
        force_all: args.force_all,
        force_import_all: args.force_import_all,
        force: args.force.into_iter().collect(),
        force_import: args.force_import.into_iter().collect(),
    };

    let mut pipeline = Pipeline::new(registry, HttpFetcher::new()?, store).with_filters(filters);
    let report = pipeline.run(&options).context("sync failed")?;

    for source in &report.sources {
        let state = if source.downloaded {
            "downloaded"
        } else {
            "current"
        };
        if source.imported.is_empty() {
            println!("{} ({state}): not imported", source.file_name);
        }
        for (kind, stats) in &source.imported {
            println!("{} ({state}) as {kind:?}: {stats}", source.file_name);
        }
    }

    let stats = pipeline.store().stats();
    println!(
        "Store: {} countries, {} regions, {} cities",
        stats.countries, stats.regions, stats.cities
    );
    Ok(())
}

fn inspect(registry: &SourceRegistry, command: Commands) -> anyhow::Result<()> {
    let store = SnapshotStore::open(&registry.data_dir)?;

    match command {
        Commands::Sync(_) => {}

        Commands::Stats => {
            let stats = store.stats();
            println!("Store statistics:");
            println!("  Countries: {}", stats.countries);
            println!("  Regions: {}", stats.regions);
            println!("  Cities: {}", stats.cities);
        }

        Commands::Country { code } => match store.find_country_by_code(&code) {
            Some(c) => {
                println!("Country: {}", c.name);
                println!("ISO2: {}", c.code2);
                println!("ISO3: {}", c.code3);
                println!("Continent: {}", c.continent);
                println!("TLD: {}", c.tld);
                println!("Regions: {}", store.regions_for_country(c).len());
            }
            None => {
                eprintln!("No country found for: {code}");
            }
        },

        Commands::Regions { iso2 } => match store.find_country_by_code(&iso2) {
            Some(c) => {
                println!("Regions in {}:", c.name);
                for r in store.regions_for_country(c) {
                    println!("- {} ({})", r.name, r.code);
                }
            }
            None => eprintln!("Country {iso2} not found"),
        },

        Commands::Cities { query } => {
            let matches = store.find_cities_by_substring(&query);
            if matches.is_empty() {
                println!("No cities found matching: {query}");
            } else {
                for (city, region, country) in matches {
                    let region = region.map(|r| r.name.as_str()).unwrap_or("-");
                    match (city.latitude, city.longitude) {
                        (Some(lat), Some(lon)) => println!(
                            "{}, {region}, {} ({lat:.4}, {lon:.4})",
                            city.name, country.name
                        ),
                        _ => println!("{}, {region}, {}", city.name, country.name),
                    }
                }
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    setup_logging(&args);

    let registry = load_registry(&args)?;

    match args.command {
        Commands::Sync(sync_args) => sync(registry, sync_args),
        command => inspect(&registry, command),
    }
}
