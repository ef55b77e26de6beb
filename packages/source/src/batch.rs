//! Batch discovery for multi-file exports.
//!
//! Spotify splits an export across numbered files and repeats plays
//! across them, so deduplication is only accurate when every file of the
//! export is parsed in one pass. Discovery lists the candidates; whether
//! to use them is the caller's decision.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use scrobble_models::SourceFormat;

use crate::SourceError;
use crate::detect::file_name_pattern;

/// Lists every file in `input`'s directory that belongs to the same batch
/// as `input`, ordered by numeric suffix.
///
/// Formats that are not batched return just `input`. `input` is always
/// part of the result.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the directory cannot be listed.
pub fn discover_batch(input: &Path, format: SourceFormat) -> Result<Vec<PathBuf>, SourceError> {
    if !format.is_batched() {
        return Ok(vec![input.to_path_buf()]);
    }

    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let pattern = file_name_pattern(format);

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if pattern.is_match(name) && entry.path().is_file() {
            files.push(input.with_file_name(name));
        }
    }

    if !files.iter().any(|f| f.file_name() == input.file_name()) {
        files.push(input.to_path_buf());
    }

    files.sort_by_cached_key(|path| batch_sort_key(path));

    log::debug!(
        "Discovered {} {format} batch file(s) next to {}",
        files.len(),
        input.display()
    );

    Ok(files)
}

/// Orders `endsong_2.json` before `endsong_10.json`. Files without a
/// usable suffix go last, by name.
fn batch_sort_key(path: &Path) -> (bool, Option<u64>, PathBuf) {
    let suffix = numeric_suffix(path);
    (suffix.is_none(), suffix, path.to_path_buf())
}

fn numeric_suffix(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[start..].parse().ok()
}

/// Reads one batch file as a JSON array of entries.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened, or
/// [`SourceError::Json`] if it is not a JSON array.
pub fn read_json_entries(path: &Path) -> Result<Vec<serde_json::Value>, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Entries of every file in a batch, read one file at a time.
///
/// A file that cannot be read yields a single `Err` and iteration moves
/// on to the next file.
pub struct BatchEntries {
    files: VecDeque<PathBuf>,
    entries: std::vec::IntoIter<serde_json::Value>,
}

impl BatchEntries {
    /// Creates an iterator over `files` in the given order.
    #[must_use]
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files: files.into(),
            entries: Vec::new().into_iter(),
        }
    }
}

impl Iterator for BatchEntries {
    type Item = Result<serde_json::Value, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.entries.next() {
                return Some(Ok(entry));
            }

            let file = self.files.pop_front()?;
            log::info!("Importing {} ...", file.display());
            match read_json_entries(&file) {
                Ok(entries) => self.entries = entries.into_iter(),
                Err(e) => {
                    log::error!("{} could not be read. File not imported. ({e})", file.display());
                    return Some(Err(e));
                }
            }
        }
    }
}
