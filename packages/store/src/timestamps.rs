//! Timestamp assignment for store merges.
//!
//! Distinct plays sometimes share a timestamp (minute-precision exports,
//! back-to-back skips). Each accepted record is moved forward one second
//! at a time until its timestamp is unused in the store. This is collision
//! resolution, not deduplication: two records staged in the same run are
//! always both kept.
//!
//! When appending, records already in the store are known by timestamp.
//! Walking forward onto a stored record with the same artists and title
//! means this play was imported by an earlier run.

use std::collections::{HashMap, HashSet};

use scrobble_models::NormalizedScrobble;

/// Result of [`TimestampAssigner::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The record gets this timestamp.
    Unique(i64),
    /// The record is already in the store at this timestamp.
    AlreadyStored(i64),
}

/// Hands out store-unique timestamps for one import run.
#[derive(Debug, Default)]
pub struct TimestampAssigner {
    used: HashSet<i64>,
    stored: HashMap<i64, (Vec<String>, String)>,
}

impl TimestampAssigner {
    /// Creates an assigner for an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assigner for a store that already holds `existing`.
    #[must_use]
    pub fn with_existing(existing: Vec<NormalizedScrobble>) -> Self {
        let mut assigner = Self::new();
        for record in existing {
            assigner.used.insert(record.timestamp);
            assigner
                .stored
                .insert(record.timestamp, (record.artists, record.title));
        }
        assigner
    }

    /// Finds the first free timestamp at or after `timestamp` and reserves
    /// it.
    pub fn assign(&mut self, timestamp: i64, artists: &[String], title: &str) -> Assignment {
        let mut candidate = timestamp;
        loop {
            if let Some((stored_artists, stored_title)) = self.stored.get(&candidate)
                && stored_artists.as_slice() == artists
                && stored_title == title
            {
                return Assignment::AlreadyStored(candidate);
            }
            if self.used.insert(candidate) {
                return Assignment::Unique(candidate);
            }
            candidate += 1;
        }
    }
}
