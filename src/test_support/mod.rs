//! Internal helpers re-exported for integration tests.
//!
//! Besides log capture, this module offers [`ForbiddenAccess`], a repository
//! accessor that refuses every request and counts how often it was asked.
//! Suites use it to prove that a run was served entirely from the cache.

mod logging;

use std::cell::Cell;

use camino::Utf8Path;

use crate::artifact::Artifact;
use crate::error::{FetchError, FetchResult};
use crate::repository::{Repository, RepositoryAccess, Retrieval};

pub use logging::{capture_logs, capture_warn_logs};

/// Accessor that fails every retrieval and records the attempt.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use cxxpm::test_support::ForbiddenAccess;
/// use cxxpm::{Artifact, CacheDir, FetchOutcome, Repository, fill_cache};
///
/// let temp = tempfile::tempdir()?;
/// let cache = CacheDir::new(Utf8Path::from_path(temp.path()).expect("utf8 tempdir"));
/// let forbidden = ForbiddenAccess::default();
/// let outcome = fill_cache(
///     &forbidden,
///     &Artifact::new("a.zip"),
///     &cache,
///     &[Repository::parse("/repo")],
/// );
/// assert_eq!(outcome, FetchOutcome::Unsatisfied);
/// assert_eq!(forbidden.calls(), 1);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ForbiddenAccess {
    calls: Cell<usize>,
}

impl ForbiddenAccess {
    /// Number of retrievals attempted so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RepositoryAccess for ForbiddenAccess {
    fn retrieve(
        &self,
        repository: &Repository,
        _artifact: &Artifact,
        _destination: &Utf8Path,
    ) -> FetchResult<Retrieval> {
        self.calls.set(self.calls.get().saturating_add(1));
        Err(FetchError::MalformedRepository {
            repository: repository.to_string(),
            reason: "repository access is forbidden in this test".to_owned(),
        })
    }
}
