//! Fills a local artifact cache from an ordered list of repositories.
//!
//! Each dependency is a plain file name. Repositories are local directories
//! or HTTP(S) base URLs, tried in the order given; the first one holding an
//! artifact supplies it. Artifacts already in the cache are never fetched
//! again, and a run always attempts every dependency so it can report all
//! missing ones at once.
//!
//! The layers, leaves first:
//!
//! - [`RepositoryAccess`] reads one artifact out of one repository.
//! - [`fill_cache`] walks the repositories for one artifact.
//! - [`run`] fills the cache for a whole dependency list.
//!
//! [`fetch_dependencies`] wires them to a [`Settings`] value.

mod artifact;
mod batch;
mod cache;
mod error;
mod fs;
pub mod observability;
mod repository;
mod settings;
#[doc(hidden)]
pub mod test_support;

pub use artifact::Artifact;
pub use batch::{BatchReport, BatchResult, run};
pub use cache::{CacheDir, FetchOutcome, default_cache_dir, fill_cache};
pub use error::{
    CacheError, CacheResult, ClientError, ConfigError, ConfigResult, CxxpmError, FetchError,
    FetchResult, Result,
};
pub use repository::{
    DEFAULT_REQUEST_TIMEOUT, Repository, RepositoryAccess, RepositoryAccessor, Retrieval,
    request_url,
};
pub use settings::{DEFAULT_CONFIG_FILE, Settings};

use color_eyre::eyre::Context;

/// Creates the expansion directory and fills the cache for `settings`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use cxxpm::{BatchResult, Settings, fetch_dependencies};
///
/// let settings = Settings::load(Utf8Path::new("cxxpm.yml"))?;
/// let report = fetch_dependencies(&settings)?;
/// assert_eq!(report.result(), BatchResult::AllSatisfied);
/// # Ok::<(), cxxpm::CxxpmError>(())
/// ```
///
/// # Errors
/// Returns an error when the HTTP client cannot be built or the cache or
/// expansion directory cannot be created. Missing artifacts are not errors;
/// inspect the returned [`BatchReport`].
pub fn fetch_dependencies(settings: &Settings) -> Result<BatchReport> {
    let accessor = RepositoryAccessor::with_timeout(settings.request_timeout())?;
    fs::ensure_dir_exists(&settings.location)
        .with_context(|| format!("failed to prepare dependency location {}", settings.location))
        .map_err(CacheError::from)?;

    let report = run(
        &accessor,
        &settings.dependencies,
        &CacheDir::new(settings.cache.clone()),
        &settings.repositories,
    )?;
    Ok(report)
}
