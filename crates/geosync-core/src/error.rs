// crates/geosync-core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the synchronization pipeline.
///
/// Every variant is fatal for the run that raised it. Per-record filter
/// rejections are not errors; see [`crate::filter::FilterRejection`].
#[derive(Debug, Error)]
pub enum GeoSyncError {
    /// The request itself failed (DNS, connect, TLS, body read, bad status).
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but lacks the metadata needed to judge staleness.
    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("cannot extract {entry} from {}: {reason}", archive.display())]
    Extraction {
        archive: PathBuf,
        entry: String,
        reason: String,
    },

    /// A row is too short, or a numeric column does not parse.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("country {0} is not in the store; import countries first")]
    UnknownCountry(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, GeoSyncError>;
