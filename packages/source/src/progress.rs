//! Progress reporting for long-running imports.
//!
//! The importer only knows it has written N records; how that is shown
//! (an `indicatif` spinner, log lines, nothing) is up to the caller.

/// Receives progress updates from an import.
pub trait ProgressCallback {
    /// Advance progress by `delta` records.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates. Used by tests and non-interactive callers.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
