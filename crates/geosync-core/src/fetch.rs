// crates/geosync-core/src/fetch.rs
//! Conditional download of source files.
use crate::error::{GeoSyncError, Result};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderName, CONTENT_LENGTH, LAST_MODIFIED};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const USER_AGENT: &str = concat!("geosync/", env!("CARGO_PKG_VERSION"));

/// Downloads a URL into a local path unless the local copy is current.
pub trait Fetch {
    /// Returns `true` when the remote body was written to `path`, `false`
    /// when the existing local copy was kept.
    fn fetch(&self, url: &str, path: &Path, force: bool) -> Result<bool>;
}

/// What the server says about the remote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteMeta {
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

impl RemoteMeta {
    fn from_response(url: &str, response: &Response) -> Result<Self> {
        let last_modified = parse_http_date(header(url, response, &LAST_MODIFIED)?)
            .ok_or_else(|| GeoSyncError::Network {
                url: url.to_string(),
                reason: "unparsable last-modified header".into(),
            })?;
        let size = header(url, response, &CONTENT_LENGTH)?
            .trim()
            .parse::<u64>()
            .map_err(|e| GeoSyncError::Network {
                url: url.to_string(),
                reason: format!("invalid content-length header: {e}"),
            })?;

        Ok(Self {
            last_modified,
            size,
        })
    }
}

fn header<'r>(url: &str, response: &'r Response, name: &HeaderName) -> Result<&'r str> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| GeoSyncError::Network {
            url: url.to_string(),
            reason: format!("response has no {name} header"),
        })
}

/// Parses an HTTP date such as `Wed, 21 Oct 2015 07:28:00 GMT`.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A local copy is current when it is at least as new as the remote file
/// and has exactly the remote size. A missing file is never current.
pub fn is_up_to_date(path: &Path, remote: &RemoteMeta) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    let local_time: DateTime<Utc> = modified.into();

    local_time >= remote.last_modified && meta.len() == remote.size
}

/// [`Fetch`] over plain HTTP(S) with a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GeoSyncError::InvalidData(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, path: &Path, force: bool) -> Result<bool> {
        let http_err = |source| GeoSyncError::Http {
            url: url.to_string(),
            source,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .map_err(http_err)?;
        let remote = RemoteMeta::from_response(url, &response)?;

        if !force && is_up_to_date(path, &remote) {
            warn!("Assuming local download is up to date for {url}");
            return Ok(false);
        }

        info!("Downloading {url} into {}", path.display());
        let mut local = BufWriter::new(File::create(path)?);
        let written = io::copy(&mut response, &mut local).map_err(|e| GeoSyncError::Network {
            url: url.to_string(),
            reason: format!("body transfer failed: {e}"),
        })?;
        local.flush()?;

        if written != remote.size {
            warn!(
                "{url}: content-length announced {} bytes, received {written}",
                remote.size
            );
        }
        Ok(true)
    }
}
