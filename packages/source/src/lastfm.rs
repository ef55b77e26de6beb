//! Last.fm scrobble CSV parser.
//!
//! One row per scrobble, no header: `artist,album,title,time` with time
//! formatted like `01 Jan 2020 00:00` in UTC. Last.fm exports carry no
//! play duration and the parser does no deduplication.

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;

use scrobble_models::{ParseOutcome, RawScrobble};

use crate::SourceError;
use crate::parsing::parse_lastfm_time;

/// Lazily parses a Last.fm CSV export, one [`ParseOutcome`] per row.
///
/// Blank lines count as rows with no fields and fail like any other short
/// row.
pub struct LastFmParser {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    record: csv::StringRecord,
    last_end: usize,
    pending: VecDeque<ParseOutcome>,
    done: bool,
}

impl LastFmParser {
    /// Opens `path` for parsing.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        log::info!("Importing {} ...", path.display());
        let bytes = std::fs::read(path)?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(bytes));
        Ok(Self {
            reader,
            record: csv::StringRecord::new(),
            last_end: 0,
            pending: VecDeque::new(),
            done: false,
        })
    }

    fn parse_record(record: &csv::StringRecord) -> ParseOutcome {
        if record.len() != 4 {
            log::error!("{record:?} does not look like a valid entry. Scrobble not imported.");
            return ParseOutcome::Fail(format!("expected 4 fields, found {}", record.len()));
        }

        let (artist, album, title, time) = (&record[0], &record[1], &record[2], &record[3]);

        match parse_lastfm_time(time) {
            Ok(timestamp) => ParseOutcome::Success(RawScrobble {
                title: title.to_string(),
                artist_string: artist.to_string(),
                album: album.to_string(),
                timestamp,
                duration: None,
            }),
            Err(e) => {
                log::error!("{record:?} could not be parsed. Scrobble not imported. ({e})");
                ParseOutcome::Fail(e.to_string())
            }
        }
    }

    /// Queues a failure for every blank line between the last row read
    /// and the next one.
    fn queue_blank_lines(&mut self) {
        let bytes = self.reader.get_ref().get_ref();
        let from = self.last_end.min(bytes.len());
        let terminated = from == 0 || bytes[from - 1] == b'\n';
        let blank = count_blank_lines(&bytes[from..], terminated);

        for _ in 0..blank {
            log::error!("Blank line does not look like a valid entry. Scrobble not imported.");
            self.pending
                .push_back(ParseOutcome::Fail("expected 4 fields, found 0".to_string()));
        }
    }
}

/// Counts the empty lines at the start of `rest`.
///
/// When the previous row's terminator has not been consumed yet, the first
/// line break in `rest` ends that row and is not a blank line.
fn count_blank_lines(rest: &[u8], terminated: bool) -> usize {
    let newlines = rest
        .iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .filter(|&&b| b == b'\n')
        .count();
    if terminated {
        newlines
    } else {
        newlines.saturating_sub(1)
    }
}

impl Iterator for LastFmParser {
    type Item = ParseOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(outcome) = self.pending.pop_front() {
                return Some(outcome);
            }
            if self.done {
                return None;
            }

            self.queue_blank_lines();
            let read = self.reader.read_record(&mut self.record);
            self.last_end = usize::try_from(self.reader.position().byte()).unwrap_or(usize::MAX);

            match read {
                Ok(true) => {
                    let outcome = Self::parse_record(&self.record);
                    self.pending.push_back(outcome);
                }
                Ok(false) => self.done = true,
                Err(e) => {
                    // A failed read leaves the reader in an unknown position.
                    if e.is_io_error() {
                        self.done = true;
                    }
                    log::error!("Unreadable row. Scrobble not imported. ({e})");
                    self.pending.push_back(ParseOutcome::Fail(e.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scrobble_models::Disposition;

    use super::*;

    fn parse(contents: &str) -> Vec<ParseOutcome> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrobbles.csv");
        std::fs::write(&path, contents).unwrap();
        LastFmParser::open(&path).unwrap().collect()
    }

    #[test]
    fn parses_well_formed_rows() {
        let outcomes = parse(
            "Artist A,Album A,Title A,01 Jan 2020 00:00\n\
             \"Artist, B\",Album B,Title B,02 Jan 2020 12:30\n",
        );

        assert_eq!(
            outcomes,
            vec![
                ParseOutcome::Success(RawScrobble {
                    title: "Title A".to_string(),
                    artist_string: "Artist A".to_string(),
                    album: "Album A".to_string(),
                    timestamp: 1_577_836_800,
                    duration: None,
                }),
                ParseOutcome::Success(RawScrobble {
                    title: "Title B".to_string(),
                    artist_string: "Artist, B".to_string(),
                    album: "Album B".to_string(),
                    timestamp: 1_577_968_200,
                    duration: None,
                }),
            ]
        );
    }

    #[test]
    fn wrong_field_count_fails() {
        let outcomes = parse(
            "Artist,Album,Title\n\
             Artist,Album,Title,01 Jan 2020 00:00,extra\n",
        );
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.disposition() == Disposition::Fail));
    }

    #[test]
    fn bad_time_fails_without_stopping() {
        let outcomes = parse(
            "Artist,Album,Title,yesterday\n\
             Artist,Album,Title,01 Jan 2020 00:00\n",
        );
        let dispositions: Vec<_> = outcomes.iter().map(ParseOutcome::disposition).collect();
        assert_eq!(dispositions, vec![Disposition::Fail, Disposition::Success]);
    }

    #[test]
    fn keeps_duplicate_rows() {
        let row = "Artist,Album,Title,01 Jan 2020 00:00\n";
        let outcomes = parse(&row.repeat(2));
        assert!(
            outcomes
                .iter()
                .all(|o| o.disposition() == Disposition::Success)
        );
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn blank_line_fails_in_place() {
        let outcomes = parse(
            "Artist A,Album A,Title A,01 Jan 2020 00:00\n\
             \n\
             Artist B,Album B,Title B,01 Jan 2020 00:01\n",
        );
        let dispositions: Vec<_> = outcomes.iter().map(ParseOutcome::disposition).collect();
        assert_eq!(
            dispositions,
            vec![Disposition::Success, Disposition::Fail, Disposition::Success]
        );
    }

    #[test]
    fn leading_and_trailing_blank_lines_fail() {
        let outcomes = parse("\r\nArtist,Album,Title,01 Jan 2020 00:00\r\n\r\n\r\n");
        let dispositions: Vec<_> = outcomes.iter().map(ParseOutcome::disposition).collect();
        assert_eq!(
            dispositions,
            vec![
                Disposition::Fail,
                Disposition::Success,
                Disposition::Fail,
                Disposition::Fail,
            ]
        );
    }

    #[test]
    fn quoted_newlines_are_not_blank_lines() {
        let outcomes = parse("\"Artist\n\nA\",Album,Title,01 Jan 2020 00:00\n");
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].disposition(), Disposition::Success);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(LastFmParser::open(Path::new("/nonexistent/scrobbles.csv")).is_err());
    }
}
