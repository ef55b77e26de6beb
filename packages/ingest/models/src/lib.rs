#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Import decisions and result types.

use std::ops::AddAssign;

use scrobble_models::{Disposition, WriteMode};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Answer to "the store already exists, what now?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WriteDecision {
    /// Replace the existing store.
    Overwrite,
    /// Add to the existing store.
    Append,
    /// Abort the import without touching anything.
    Cancel,
}

impl WriteDecision {
    /// The write mode to open the store with, or `None` on cancel.
    #[must_use]
    pub const fn mode(self) -> Option<WriteMode> {
        match self {
            Self::Overwrite => Some(WriteMode::Overwrite),
            Self::Append => Some(WriteMode::Append),
            Self::Cancel => None,
        }
    }
}

impl From<WriteMode> for WriteDecision {
    fn from(mode: WriteMode) -> Self {
        match mode {
            WriteMode::Overwrite => Self::Overwrite,
            WriteMode::Append => Self::Append,
        }
    }
}

/// Answer to "other files of this export were found, import them too?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatchChoice {
    /// Import every file of the batch together.
    All,
    /// Import only the file that was named.
    Single,
}

/// Counters returned by an import.
///
/// `success` counts every record written, including those also counted
/// in `warn`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Records written to the store.
    pub success: u64,
    /// Records written with a recovered timestamp.
    pub warn: u64,
    /// Records intentionally dropped.
    pub skip: u64,
    /// Entries that could not be parsed.
    pub fail: u64,
}

impl ImportSummary {
    /// Counts one outcome.
    pub const fn record(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Success => self.success += 1,
            Disposition::Warn => {
                self.success += 1;
                self.warn += 1;
            }
            Disposition::Skip => self.skip += 1,
            Disposition::Fail => self.fail += 1,
        }
    }

    /// The counters as `(success, warn, skip, fail)`.
    #[must_use]
    pub const fn as_tuple(self) -> (u64, u64, u64, u64) {
        (self.success, self.warn, self.skip, self.fail)
    }
}

impl AddAssign for ImportSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.success += rhs.success;
        self.warn += rhs.warn;
        self.skip += rhs.skip;
        self.fail += rhs.fail;
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} imported ({} with inaccurate timestamps), {} skipped, {} failed",
            self.success, self.warn, self.skip, self.fail
        )
    }
}
