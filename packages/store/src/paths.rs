//! Store file locations.

use std::path::{Path, PathBuf};

use scrobble_models::SourceFormat;

/// Environment variable overriding the store directory.
pub const STORE_DIR_ENV: &str = "SCROBBLE_STORE_DIR";

/// Returns the store directory: `explicit` if given, else
/// `$SCROBBLE_STORE_DIR`, else `data/scrobbles` under the working directory.
#[must_use]
pub fn resolve_store_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(STORE_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| Path::new("data").join("scrobbles"))
}

/// Returns the store file that `format` imports into.
#[must_use]
pub fn store_path(store_dir: &Path, format: SourceFormat) -> PathBuf {
    store_dir.join(format.store_file_name())
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
