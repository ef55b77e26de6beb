//! Spotify extended streaming history parser (`endsong_N.json`).
//!
//! Each entry is one listening event. `offline_timestamp` (milliseconds)
//! is exact when present, but is `0` for many events; those fall back to
//! `ts`, which is only accurate to roughly when playback ended and is
//! reported as [`ParseOutcome::Warn`].

use std::path::PathBuf;

use scrobble_models::{MIN_PLAYED_SECONDS, ParseOutcome, RawScrobble, SkipReason};
use serde::Deserialize;

use crate::SourceError;
use crate::batch::BatchEntries;
use crate::dedup::PlayLedger;
use crate::parsing::parse_iso_offset;

#[derive(Debug, Deserialize)]
struct EndsongEntry {
    ms_played: i64,
    offline_timestamp: i64,
    master_metadata_album_artist_name: Option<String>,
    master_metadata_track_name: Option<String>,
    master_metadata_album_album_name: Option<String>,
    ts: Option<String>,
}

/// Lazily parses a batch of `endsong_N.json` files in order.
///
/// Duplicate detection spans the whole batch, not individual files.
pub struct SpotifyFullParser {
    entries: BatchEntries,
    ledger: PlayLedger,
}

impl SpotifyFullParser {
    /// Creates a parser over `files`.
    #[must_use]
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            entries: BatchEntries::new(files),
            ledger: PlayLedger::new(),
        }
    }

    fn parse_entry(&mut self, value: &serde_json::Value) -> Result<ParseOutcome, SourceError> {
        let entry = EndsongEntry::deserialize(value)?;

        let played = entry.ms_played / 1000;
        let timestamp = entry.offline_timestamp / 1000;

        let Some(title) = entry.master_metadata_track_name else {
            log::warn!("{value} has no title, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::MissingTitle));
        };
        let Some(artist) = entry.master_metadata_album_artist_name else {
            log::warn!("{value} has no artist, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::MissingArtist));
        };
        if played < MIN_PLAYED_SECONDS {
            log::warn!("{value} is shorter than {MIN_PLAYED_SECONDS} seconds, skipping...");
            return Ok(ParseOutcome::Skip(SkipReason::BelowPlayThreshold));
        }

        let album = entry.master_metadata_album_album_name.unwrap_or_default();

        if timestamp != 0 {
            if !self.ledger.record(timestamp, &artist, &title) {
                log::warn!("{value} seems to be a duplicate, skipping...");
                return Ok(ParseOutcome::Skip(SkipReason::Duplicate));
            }
            return Ok(ParseOutcome::Success(RawScrobble {
                title,
                artist_string: artist,
                album,
                timestamp,
                duration: Some(played),
            }));
        }

        // No duplicate check here: `ts` is too coarse to tell repeats from
        // genuine back-to-back plays.
        log::warn!("{value} might have an inaccurate timestamp.");
        let ts = entry.ts.ok_or(SourceError::MissingField("ts"))?;
        Ok(ParseOutcome::Warn(RawScrobble {
            title,
            artist_string: artist,
            album,
            timestamp: parse_iso_offset(&ts)?,
            duration: Some(played),
        }))
    }
}

impl Iterator for SpotifyFullParser {
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
