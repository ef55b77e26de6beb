//! Reads an existing store back into records.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use scrobble_models::NormalizedScrobble;

use crate::StoreError;
use crate::writer::{ABSENT_DURATION, ARTIST_SEPARATOR};

/// Parses one store line. `line_number` is only used in errors.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if the line does not have five
/// columns or its numeric columns do not parse.
pub fn parse_line(line: &str, line_number: usize) -> Result<NormalizedScrobble, StoreError> {
    let malformed = |message: String| StoreError::Malformed {
        line: line_number,
        message,
    };

    let columns: Vec<&str> = line.split('\t').collect();
    let &[timestamp, artists, title, album, duration] = columns.as_slice() else {
        return Err(malformed(format!("expected 5 columns, found {}", columns.len())));
    };

    let timestamp = timestamp
        .parse()
        .map_err(|e| malformed(format!("bad timestamp {timestamp:?}: {e}")))?;
    let duration = if duration == ABSENT_DURATION {
        None
    } else {
        Some(
            duration
                .parse()
                .map_err(|e| malformed(format!("bad duration {duration:?}: {e}")))?,
        )
    };

    Ok(NormalizedScrobble {
        timestamp,
        artists: artists
            .split(ARTIST_SEPARATOR)
            .filter(|a| !a.is_empty())
            .map(ToString::to_string)
            .collect(),
        title: title.to_string(),
        album: album.to_string(),
        duration,
    })
}

/// Reads every well-formed record from the store at `path`.
///
/// A missing store reads as empty. Malformed lines are logged and
/// skipped.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be read.
pub fn read_store(path: &Path) -> Result<Vec<NormalizedScrobble>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        match parse_line(&line, i + 1) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("{}: {e}, ignoring", path.display()),
        }
    }

    log::debug!("Read {} record(s) from {}", records.len(), path.display());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use scrobble_models::WriteMode;

    use super::*;
    use crate::writer::StoreWriter;

    #[test]
    fn reads_back_written_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.tsv");
        let records = vec![
            NormalizedScrobble {
                timestamp: 10,
                artists: vec!["A".to_string(), "B".to_string()],
                title: "T".to_string(),
                album: String::new(),
                duration: None,
            },
            NormalizedScrobble {
                timestamp: 11,
                artists: vec!["C".to_string()],
                title: "U".to_string(),
                album: "Album".to_string(),
                duration: Some(60),
            },
        ];

        let mut writer = StoreWriter::open(&path, WriteMode::Overwrite).unwrap();
        for record in &records {
            writer.write(record).unwrap();
        }
        writer.finish().unwrap();

        assert_eq!(read_store(&path).unwrap(), records);
    }

    #[test]
    fn missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_store(&dir.path().join("absent.tsv")).unwrap().is_empty());
    }

    #[test]
    fn skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.tsv");
        std::fs::write(&path, "garbage\nx\tA\tT\t\t-\n5\tA\tT\t\t-\n").unwrap();

        let records = read_store(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 5);
    }

    #[test]
    fn rejects_wrong_column_count() {
        assert!(matches!(
            parse_line("1\tA\tT\t-", 7),
            Err(StoreError::Malformed { line: 7, .. })
        ));
    }
}
