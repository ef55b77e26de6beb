#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The canonical scrobble store.
//!
//! A store is a UTF-8 text file with one record per line and five
//! tab-separated columns:
//!
//! ```text
//! timestamp  artists (joined by U+241F)  title  album  duration (or "-")
//! ```
//!
//! Stores are append-only across imports. Within a store every timestamp
//! is unique; [`timestamps::TimestampAssigner`] keeps it that way.

pub mod paths;
pub mod reader;
pub mod timestamps;
pub mod writer;

/// Errors that can occur while reading or writing a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store line does not have the expected shape.
    #[error("malformed store line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },
}
