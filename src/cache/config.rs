//! Default location of the artifact cache.

use camino::Utf8PathBuf;

/// Subdirectory of the system temporary directory used by default.
const CACHE_SUBDIR: &str = "cxxpm";

/// Used when the system temporary directory is not valid UTF-8.
const FALLBACK_TEMP_DIR: &str = "/tmp";

/// Resolves the default cache directory, `<temp-dir>/cxxpm`.
///
/// The value is computed once when [`crate::Settings`] are built and passed
/// down explicitly from there.
///
/// # Examples
///
/// ```
/// use cxxpm::default_cache_dir;
///
/// assert!(default_cache_dir().ends_with("cxxpm"));
/// ```
#[must_use]
pub fn default_cache_dir() -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap_or_else(|_| Utf8PathBuf::from(FALLBACK_TEMP_DIR))
        .join(CACHE_SUBDIR)
}
