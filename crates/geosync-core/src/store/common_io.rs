// crates/geosync-core/src/store/common_io.rs
use crate::error::{GeoSyncError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Opens a file, buffers it, and optionally wraps it in a Gzip decoder.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoSyncError::NotFound(format!("Snapshot not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(reader))
    }
}

/// `dir/name.ext` -> `dir/name.ext.suffix`
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{filename}.{suffix}"))
}

pub fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open_stream(path)?;
    Ok(bincode::deserialize_from(reader)?)
}

/// Writes ANY serializable value to disk.
///
/// The bytes go to a `.tmp` sibling and are renamed over `path` once
/// complete; readers never observe a half-written snapshot.
pub fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp_path = sibling_path(path, "tmp");
    let file = File::create(&tmp_path)?;
    let mut writer = BufWriter::new(file);

    #[cfg(feature = "compact")]
    {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        bincode::serialize_into(&mut encoder, value)?;
        writer = encoder.finish()?;
    }
    #[cfg(not(feature = "compact"))]
    bincode::serialize_into(&mut writer, value)?;

    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
