#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listening-history export detection and parsing.
//!
//! [`detect::detect_format`] picks a [`SourceFormat`] from a file name and
//! [`ScrobbleParser::open`] turns the files of that export into a lazy
//! stream of [`ParseOutcome`]s. Parsers never abort on a bad entry: it
//! becomes a [`ParseOutcome::Fail`] and parsing continues.

pub mod batch;
pub mod dedup;
pub mod detect;
pub mod lastfm;
pub mod parsing;
pub mod progress;
pub mod spotify_full;
pub mod spotify_lite;

use std::path::PathBuf;

use scrobble_models::{ParseOutcome, SourceFormat};

use crate::lastfm::LastFmParser;
use crate::spotify_full::SpotifyFullParser;
use crate::spotify_lite::SpotifyLiteParser;

/// Errors that can occur while reading an export.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file or directory read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A time string did not match the format expected for its source.
    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        /// The offending string.
        value: String,
        /// Why it did not parse.
        #[source]
        source: chrono::ParseError,
    },

    /// An entry lacks a field needed to place it in time.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// No files were given to parse.
    #[error("no input files for {0} import")]
    EmptyBatch(SourceFormat),
}

/// A parser for one of the supported export formats.
pub enum ScrobbleParser {
    /// Last.fm CSV.
    LastFm(LastFmParser),
    /// Spotify extended streaming history.
    SpotifyFull(SpotifyFullParser),
    /// Spotify account-data streaming history.
    SpotifyLite(SpotifyLiteParser),
}

impl ScrobbleParser {
    /// Opens a parser for `format` over `files`.
    ///
    /// Last.fm exports are single files, so only the first file is read.
    /// Spotify batches are read in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyBatch`] if `files` is empty, or an I/O
    /// error if a Last.fm file cannot be opened.
    pub fn open(format: SourceFormat, files: Vec<PathBuf>) -> Result<Self, SourceError> {
        if files.is_empty() {
            return Err(SourceError::EmptyBatch(format));
        }

        Ok(match format {
            SourceFormat::LastFm => Self::LastFm(LastFmParser::open(&files[0])?),
            SourceFormat::SpotifyFull => Self::SpotifyFull(SpotifyFullParser::new(files)),
            SourceFormat::SpotifyLite => Self::SpotifyLite(SpotifyLiteParser::new(files)),
        })
    }
}

impl Iterator for ScrobbleParser {
    type Item = ParseOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::LastFm(parser) => parser.next(),
            Self::SpotifyFull(parser) => parser.next(),
            Self::SpotifyLite(parser) => parser.next(),
        }
    }
}
