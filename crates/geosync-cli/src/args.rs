use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for geosync
#[derive(Debug, Parser)]
#[command(
    name = "geosync",
    version,
    about = "Keep a local country/region/city store in sync with the geonames dumps"
)]
pub struct CliArgs {
    /// JSON file with source URLs and data directory (defaults: geonames, ./data)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory for downloads and the store snapshot, overrides the config
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download changed source files and import them
    Sync(SyncArgs),

    /// Show a summary of the store contents
    Stats,

    /// Lookup a country by ISO2 or ISO3 code
    Country {
        /// ISO2 or ISO3 code (e.g. DE, USA)
        code: String,
    },

    /// List all regions for a given country
    Regions {
        /// ISO2 code of the country
        iso2: String,
    },

    /// Search for cities containing a substring
    Cities {
        /// Substring to search (case- and accent-insensitive)
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Download every source even if the local copy is current
    #[arg(long)]
    pub force_all: bool,

    /// Import every source even if nothing was downloaded
    #[arg(long)]
    pub force_import_all: bool,

    /// Download this file regardless (e.g. cities15000.zip), repeatable
    #[arg(long = "force", value_name = "FILE")]
    pub force: Vec<String>,

    /// Import this file regardless (e.g. cities15000.txt), repeatable
    #[arg(long = "force-import", value_name = "FILE")]
    pub force_import: Vec<String>,

    /// Only import cities of these ISO2 countries (e.g. DE,CH,AT)
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,
}
