//! Export format detection by file name.
//!
//! Detection never opens the file: the name alone decides the parser and
//! the destination store. Matching is case-sensitive.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scrobble_models::SourceFormat;

static LASTFM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\.csv$").expect("valid regex"));

static SPOTIFY_FULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^endsong_[0-9]+\.json$").expect("valid regex"));

static SPOTIFY_LITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^StreamingHistory[0-9]+\.json$").expect("valid regex"));

/// Returns the file-name pattern for `format`.
#[must_use]
pub fn file_name_pattern(format: SourceFormat) -> &'static Regex {
    match format {
        SourceFormat::LastFm => &LASTFM_RE,
        SourceFormat::SpotifyFull => &SPOTIFY_FULL_RE,
        SourceFormat::SpotifyLite => &SPOTIFY_LITE_RE,
    }
}

/// Classifies `path` by its file name.
///
/// Returns `None` when the name matches no known export, which callers
/// treat as a terminal "nothing to import".
#[must_use]
pub fn detect_format(path: &Path) -> Option<SourceFormat> {
    let name = path.file_name()?.to_str()?;
    SourceFormat::all()
        .iter()
        .copied()
        .find(|&format| file_name_pattern(format).is_match(name))
}
