//! Spotify account-data streaming history parser (`StreamingHistoryN.json`).
//!
//! Entries look like
//! `{"endTime": "2020-01-01 12:34", "artistName": "...", "trackName": "...", "msPlayed": 123}`.
//! There is no album, and `endTime` is minute-precision UTC. The same
//! skip rules as the extended history apply, and exact repeats across the
//! batch are dropped.

use std::path::PathBuf;

use scrobble_models::{MIN_PLAYED_SECONDS, ParseOutcome, RawScrobble, SkipReason};
use serde::Deserialize;

use crate::SourceError;
use crate::batch::BatchEntries;
use crate::dedup::PlayLedger;
use crate::parsing::parse_minute_time;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingHistoryEntry {
    end_time: String,
    artist_name: Option<String>,
    track_name: Option<String>,
    ms_played: i64,
}

/// Lazily parses a batch of `StreamingHistoryN.json` files in order.
pub struct SpotifyLiteParser {
    entries: BatchEntries,
    ledger: PlayLedger,
}

impl SpotifyLiteParser {
    /// Creates a parser over `files`.
    #[must_use]
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            entries: BatchEntries::new(files),
            ledger: PlayLedger::new(),
        }
    }

    fn parse_entry(&mut self, value: &serde_json::Value) -> Result<ParseOutcome, SourceError> {
        let entry = StreamingHistoryEntry::deserialize(value)?;

        let played = entry.ms_played / 1000;
        let timestamp = parse_minute_time(&entry.end_time)?;

        let Some(title) = entry.track_name else {
            log::warn!("{value} has no title, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::MissingTitle));
        };
        let Some(artist) = entry.artist_name else {
            log::warn!("{value} has no artist, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::MissingArtist));
        };
        if played < MIN_PLAYED_SECONDS {
            log::warn!("{value} is shorter than {MIN_PLAYED_SECONDS} seconds, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::BelowPlayThreshold));
        }

        if !self.ledger.record(timestamp, &artist, &title) {
            log::warn!("{value} seems to be a duplicate, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::Duplicate));
        }

        Ok(ParseOutcome::Success(RawScrobble {
            title,
            artist_string: artist,
            album: String::new(),
            timestamp,
            duration: Some(played),
        }))
    }
}

impl Iterator for SpotifyLiteParser {
    type Item = ParseOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let outcome = match self.entries.next()? {
            Ok(value) => self.parse_entry(&value).unwrap_or_else(|e| {
                log::error!("{value} could not be parsed. Scrobble not imported. ({e})");
                ParseOutcome::Fail(e.to_string())
            }),
            Err(e) => ParseOutcome::Fail(e.to_string()),
        };
        Some(outcome)
    }
}
