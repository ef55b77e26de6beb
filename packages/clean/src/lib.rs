#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Artist and title cleanup for imported scrobbles.
//!
//! The importer treats cleaning as an opaque collaborator behind the
//! [`TextCleaner`] trait. [`StandardCleaner`] is the default: it splits
//! collaboration credits into individual artists and pulls featured
//! artists out of the title, so that "A feat. B" and "A" with a title of
//! "Song (feat. B)" end up stored the same way.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Splits a raw artist string and title into clean artist names and a
/// clean title.
pub trait TextCleaner {
    /// Returns `(artists, title)`. Artists are in credit order.
    fn clean(&self, artists: &str, title: &str) -> (Vec<String>, String);
}

impl<F> TextCleaner for F
where
    F: Fn(&str, &str) -> (Vec<String>, String),
{
    fn clean(&self, artists: &str, title: &str) -> (Vec<String>, String) {
        self(artists, title)
    }
}

/// Separators between credited artists. `x` only counts in lowercase so
/// names like "Malcolm X" survive.
static ARTIST_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?i:feat\.?|ft\.?|featuring|vs\.?)\s+|\s+&\s+|\s*,\s+|\s+x\s+")
        .expect("valid regex")
});

/// A featured-artist group inside a title, e.g. `(feat. B)` or `[ft. B & C]`.
static TITLE_FEATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[\(\[](?i:feat\.?|ft\.?|featuring)\s+([^\)\]]+)[\)\]]").expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Default [`TextCleaner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCleaner;

impl StandardCleaner {
    /// Creates a new cleaner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TextCleaner for StandardCleaner {
    fn clean(&self, artists: &str, title: &str) -> (Vec<String>, String) {
        let mut featured = Vec::new();
        for caps in TITLE_FEATURE_RE.captures_iter(title) {
            if let Some(group) = caps.get(1) {
                featured.extend(split_artists(group.as_str()));
            }
        }
        let clean_title = collapse_whitespace(&TITLE_FEATURE_RE.replace_all(title, ""));

        let mut credited = split_artists(artists);
        credited.extend(featured);

        let mut seen = HashSet::new();
        credited.retain(|name| seen.insert(name.to_lowercase()));

        if credited.is_empty() {
            let fallback = collapse_whitespace(artists);
            if !fallback.is_empty() {
                credited.push(fallback);
            }
        }

        (credited, clean_title)
    }
}

/// Splits a credit string on collaboration separators, dropping empty
/// names.
fn split_artists(raw: &str) -> Vec<String> {
    let collapsed = collapse_whitespace(raw);
    ARTIST_SEPARATOR_RE
        .split(&collapsed)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn collapse_whitespace(input: &str) -> String {
    WHITESPACE_RE.replace_all(input, " ").trim().to_string()
}
