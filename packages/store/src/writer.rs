//! Serializes scrobbles into store lines.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use scrobble_models::{NormalizedScrobble, WriteMode};

use crate::StoreError;
use crate::paths::ensure_dir;

/// Joins artist names within the artists column.
pub const ARTIST_SEPARATOR: &str = "\u{241F}";

/// Duration column value for scrobbles without a known duration.
pub const ABSENT_DURATION: &str = "-";

/// Formats `scrobble` as one store line, without the trailing newline.
///
/// Tabs and line breaks inside fields become spaces so a record always
/// occupies exactly one five-column line.
#[must_use]
pub fn format_line(scrobble: &NormalizedScrobble) -> String {
    let artists = scrobble
        .artists
        .iter()
        .map(|a| sanitize(a))
        .collect::<Vec<_>>()
        .join(ARTIST_SEPARATOR);
    let duration = scrobble
        .duration
        .map_or_else(|| ABSENT_DURATION.to_string(), |d| d.to_string());

    [
        scrobble.timestamp.to_string(),
        artists,
        sanitize(&scrobble.title),
        sanitize(&scrobble.album),
        duration,
    ]
    .join("\t")
}

fn sanitize(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}

/// Appends scrobbles to one store file.
pub struct StoreWriter {
    out: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl StoreWriter {
    /// Opens the store at `path`, creating its directory if needed.
    ///
    /// [`WriteMode::Overwrite`] truncates an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be
    /// created.
    pub fn open(path: &Path, mode: WriteMode) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_dir(parent)?;
        }

        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Overwrite => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };
        let file = options.open(path)?;

        log::debug!("Opened store {} ({mode})", path.display());

        Ok(Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Writes one record as a newline-terminated line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the write fails.
    pub fn write(&mut self, scrobble: &NormalizedScrobble) -> Result<(), StoreError> {
        writeln!(self.out, "{}", format_line(scrobble))?;
        self.written += 1;
        Ok(())
    }

    /// Flushes buffered lines to disk and returns the number written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the flush fails.
    pub fn finish(mut self) -> Result<u64, StoreError> {
        self.out.flush()?;
        log::debug!("Wrote {} record(s) to {}", self.written, self.path.display());
        Ok(self.written)
    }
}
