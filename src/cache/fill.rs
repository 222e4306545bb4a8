//! Per-artifact cache fill with repository fallback.

use std::error::Error as _;

use tracing::{debug, error, info, warn};

use super::directory::CacheDir;
use crate::artifact::Artifact;
use crate::error::FetchError;
use crate::repository::{Repository, RepositoryAccess, Retrieval};

/// Observability target for cache operations.
const LOG_TARGET: &str = "cxxpm::cache";

/// Terminal state of one artifact after a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The artifact is in the cache.
    Satisfied,
    /// No repository could supply the artifact.
    Unsatisfied,
}

impl FetchOutcome {
    /// Returns `true` for [`FetchOutcome::Satisfied`].
    #[must_use]
    pub const fn is_satisfied(self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Ensures `artifact` is present in `cache`.
///
/// A cached artifact is accepted as-is without consulting any repository.
/// Otherwise repositories are tried in order and the first one that supplies
/// the artifact wins. Misses and recoverable errors fall through to the next
/// repository; a failure to write the cache ends the attempt early because no
/// repository can fix it.
///
/// # Examples
/// ```no_run
/// use cxxpm::{Artifact, CacheDir, FetchOutcome, Repository, RepositoryAccessor, fill_cache};
///
/// let accessor = RepositoryAccessor::new()?;
/// let outcome = fill_cache(
///     &accessor,
///     &Artifact::new("zlib-1.3.tar.gz"),
///     &CacheDir::new("/tmp/cxxpm"),
///     &[Repository::parse("https://mirror.example/deps")],
/// );
/// assert_eq!(outcome, FetchOutcome::Satisfied);
/// # Ok::<(), cxxpm::ClientError>(())
/// ```
pub fn fill_cache<A>(
    accessor: &A,
    artifact: &Artifact,
    cache: &CacheDir,
    repositories: &[Repository],
) -> FetchOutcome
where
    A: RepositoryAccess + ?Sized,
{
    if cache.contains(artifact) {
        debug!(target: LOG_TARGET, artifact = %artifact, "cache hit");
        return FetchOutcome::Satisfied;
    }

    // One scratch file serves every repository attempt for this artifact.
    let staged = match cache.stage(artifact) {
        Ok(staged) => staged,
        Err(err) => return abandon(artifact, &err),
    };

    for repository in repositories {
        match accessor.retrieve(repository, artifact, staged.path()) {
            Ok(Retrieval::Fetched) => {
                if let Err(err) = staged.commit() {
                    return abandon(artifact, &err);
                }
                info!(
                    target: LOG_TARGET,
                    artifact = %artifact,
                    repository = %repository,
                    path = %cache.entry_path(artifact),
                    "cached artifact"
                );
                return FetchOutcome::Satisfied;
            }
            Ok(Retrieval::NotFound) => {
                info!(
                    target: LOG_TARGET,
                    artifact = %artifact,
                    repository = %repository,
                    "artifact not in repository, trying next"
                );
            }
            Err(err) if err.is_recoverable() => {
                warn!(
                    target: LOG_TARGET,
                    artifact = %artifact,
                    repository = %repository,
                    error = %describe(&err),
                    "skipping repository"
                );
            }
            Err(err) => return abandon(artifact, &err),
        }
    }

    FetchOutcome::Unsatisfied
}

fn abandon(artifact: &Artifact, err: &FetchError) -> FetchOutcome {
    error!(
        target: LOG_TARGET,
        artifact = %artifact,
        error = %describe(err),
        "cannot write to cache, abandoning artifact"
    );
    FetchOutcome::Unsatisfied
}

/// Renders the error with its source chain on one line.
fn describe(err: &FetchError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
