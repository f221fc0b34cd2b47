// crates/geosync-core/src/archive.rs
use crate::error::{GeoSyncError, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::read::ZipArchive;

/// Extracts the entry `entry` of the zip at `archive_path` to
/// `data_dir/entry`, overwriting any previous file, and returns that path.
///
/// The entry is streamed to disk, never held in memory whole.
pub fn extract(archive_path: &Path, entry: &str, data_dir: &Path) -> Result<PathBuf> {
    let destination = data_dir.join(entry);
    info!(
        "Extracting {entry} from {} into {}",
        archive_path.display(),
        destination.display()
    );

    let fail = |reason: String| GeoSyncError::Extraction {
        archive: archive_path.to_path_buf(),
        entry: entry.to_string(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| fail(e.to_string()))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| fail(format!("not a zip archive: {e}")))?;
    let mut inner = archive.by_name(entry).map_err(|e| fail(e.to_string()))?;

    let mut out = BufWriter::new(File::create(&destination)?);
    io::copy(&mut inner, &mut out).map_err(|e| fail(e.to_string()))?;
    out.flush()?;

    Ok(destination)
}
