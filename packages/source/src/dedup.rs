//! Batch-scoped duplicate detection for Spotify exports.
//!
//! Spotify repeats the same play across export files. A play is only
//! treated as a repeat when its timestamp is exact: the same second with
//! the same artist and title. This is separate from the store-level
//! timestamp assignment, which assumes colliding records are distinct
//! plays.

use std::collections::HashMap;

/// Plays already accepted in the current batch, keyed by timestamp.
#[derive(Debug, Default)]
pub struct PlayLedger {
    seen: HashMap<i64, Vec<(String, String)>>,
}

impl PlayLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a play. Returns `false` if the same `(artist, title)` was
    /// already recorded at `timestamp`.
    pub fn record(&mut self, timestamp: i64, artist: &str, title: &str) -> bool {
        let plays = self.seen.entry(timestamp).or_default();
        if plays.iter().any(|(a, t)| a == artist && t == title) {
            return false;
        }
        plays.push((artist.to_string(), title.to_string()));
        true
    }
}
