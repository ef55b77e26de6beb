#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scrobble record types shared across the import pipeline.
//!
//! Every source parser produces a stream of [`ParseOutcome`]s. Accepted
//! outcomes carry a [`RawScrobble`], which the importer cleans and stamps
//! into a [`NormalizedScrobble`] before it is appended to the store for
//! its [`SourceFormat`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Outcome classification of one parse attempt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    /// Record accepted as-is.
    Success,
    /// Record accepted, but its timestamp came from a less trustworthy field.
    Warn,
    /// Record intentionally dropped. Not an error.
    Skip,
    /// Record could not be parsed at all.
    Fail,
}

impl Disposition {
    /// Whether records with this disposition are written to the store.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Success | Self::Warn)
    }
}

/// Why a record was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The source entry has no track title.
    MissingTitle,
    /// The source entry has no artist.
    MissingArtist,
    /// Played for less than [`MIN_PLAYED_SECONDS`].
    BelowPlayThreshold,
    /// Already seen earlier in the same batch, or already in the store.
    Duplicate,
}

/// Plays shorter than this many seconds are not scrobbles.
pub const MIN_PLAYED_SECONDS: i64 = 30;

/// A scrobble as read from a source, before cleaning and timestamp
/// assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScrobble {
    /// Track title as the source spells it.
    pub title: String,
    /// Unsplit artist string as the source spells it.
    pub artist_string: String,
    /// Album name, empty when the source has none.
    pub album: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Seconds played, when the source reports it.
    pub duration: Option<i64>,
}

/// One parse attempt yielded by a source parser.
///
/// Accepted variants always carry a record and rejected variants never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Accepted as-is.
    Success(RawScrobble),
    /// Accepted with a recovered timestamp.
    Warn(RawScrobble),
    /// Intentionally dropped.
    Skip(SkipReason),
    /// Malformed input. The message describes what went wrong.
    Fail(String),
}

impl ParseOutcome {
    /// Returns the disposition of this outcome.
    #[must_use]
    pub const fn disposition(&self) -> Disposition {
        match self {
            Self::Success(_) => Disposition::Success,
            Self::Warn(_) => Disposition::Warn,
            Self::Skip(_) => Disposition::Skip,
            Self::Fail(_) => Disposition::Fail,
        }
    }

    /// Consumes the outcome, returning the record if it was accepted.
    #[must_use]
    pub fn into_scrobble(self) -> Option<RawScrobble> {
        match self {
            Self::Success(scrobble) | Self::Warn(scrobble) => Some(scrobble),
            Self::Skip(_) | Self::Fail(_) => None,
        }
    }
}

/// A cleaned scrobble ready to be written as one store line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedScrobble {
    /// Seconds since the Unix epoch, unique within the destination store.
    pub timestamp: i64,
    /// Clean artist names in credit order.
    pub artists: Vec<String>,
    /// Clean track title.
    pub title: String,
    /// Album name, possibly empty.
    pub album: String,
    /// Seconds played, if known.
    pub duration: Option<i64>,
}

/// A recognized listening-history export format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    /// Last.fm scrobble CSV (`artist,album,title,time`).
    LastFm,
    /// Spotify extended streaming history (`endsong_N.json`).
    SpotifyFull,
    /// Spotify account data streaming history (`StreamingHistoryN.json`).
    SpotifyLite,
}

impl SourceFormat {
    /// Human-readable service name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastFm => "Last.fm",
            Self::SpotifyFull | Self::SpotifyLite => "Spotify",
        }
    }

    /// File name of the store this format is imported into.
    ///
    /// Both Spotify formats share one store.
    #[must_use]
    pub const fn store_file_name(self) -> &'static str {
        match self {
            Self::LastFm => "lastfmimport.tsv",
            Self::SpotifyFull | Self::SpotifyLite => "spotifyimport.tsv",
        }
    }

    /// Whether the format spans several files that must be imported
    /// together to catch cross-file duplicates.
    #[must_use]
    pub const fn is_batched(self) -> bool {
        matches!(self, Self::SpotifyFull | Self::SpotifyLite)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::LastFm, Self::SpotifyFull, Self::SpotifyLite]
    }
}

/// How the destination store is opened.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WriteMode {
    /// Truncate the store and start over.
    Overwrite,
    /// Keep existing records and add new ones after them.
    Append,
}
