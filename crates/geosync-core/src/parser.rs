// crates/geosync-core/src/parser.rs
//! Tab-delimited record reader for geonames dump files.
use crate::error::{GeoSyncError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Lazy iterator over the records of a tab-delimited file.
///
/// Blank lines and lines whose first non-space character is `#` are
/// skipped. Each record is the line split on `\t` with every field trimmed.
/// Field counts are not checked here.
pub struct Records<R> {
    lines: Lines<R>,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let probe = line.trim();
            if probe.is_empty() || probe.starts_with('#') {
                continue;
            }
            // the raw line is split so empty edge columns keep their position
            let line = line.trim_end_matches(['\r', '\n']);
            return Some(Ok(line.split('\t').map(|f| f.trim().to_string()).collect()));
        }
    }
}

/// Opens `path` for record-by-record reading.
pub fn parse(path: &Path) -> Result<Records<BufReader<File>>> {
    let file = File::open(path).map_err(|e| {
        GeoSyncError::NotFound(format!("Source file not found at {}: {}", path.display(), e))
    })?;
    Ok(Records::new(BufReader::new(file)))
}
