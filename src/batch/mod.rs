//! Fills the cache for a whole dependency list.
//!
//! Every artifact is attempted exactly once per run, whatever happened to the
//! ones before it, so a single run reports the complete set of missing
//! dependencies.

use tracing::{error, info};

use crate::artifact::Artifact;
use crate::cache::{CacheDir, FetchOutcome, fill_cache};
use crate::error::CacheResult;
use crate::repository::{Repository, RepositoryAccess};

/// Observability target for batch runs.
const LOG_TARGET: &str = "cxxpm::batch";

/// Aggregate verdict of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResult {
    /// Every artifact is cached.
    AllSatisfied,
    /// At least one artifact could not be found.
    SomeUnsatisfied {
        /// Unsatisfied artifacts in the order they were attempted.
        missing: Vec<Artifact>,
    },
}

/// Per-artifact outcomes of a run, in dependency-list order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    outcomes: Vec<(Artifact, FetchOutcome)>,
}

impl BatchReport {
    /// Returns every artifact with its outcome.
    #[must_use]
    pub fn outcomes(&self) -> &[(Artifact, FetchOutcome)] {
        &self.outcomes
    }

    /// Iterates over the artifacts that could not be cached.
    pub fn unsatisfied(&self) -> impl Iterator<Item = &Artifact> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_satisfied())
            .map(|(artifact, _)| artifact)
    }

    /// Returns `true` when every artifact is cached.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied().next().is_none()
    }

    /// Folds the outcomes into a [`BatchResult`].
    ///
    /// # Examples
    /// ```
    /// use cxxpm::{BatchReport, BatchResult};
    ///
    /// assert_eq!(BatchReport::default().result(), BatchResult::AllSatisfied);
    /// ```
    #[must_use]
    pub fn result(&self) -> BatchResult {
        let missing: Vec<Artifact> = self.unsatisfied().cloned().collect();
        if missing.is_empty() {
            BatchResult::AllSatisfied
        } else {
            BatchResult::SomeUnsatisfied { missing }
        }
    }
}

/// Fills `cache` with every artifact in `artifacts`.
///
/// The cache directory is created first. That is the only step that can fail
/// the run; per-artifact failures are recorded in the returned report.
///
/// # Errors
/// Returns an error when the cache directory cannot be created.
///
/// # Examples
/// ```no_run
/// use cxxpm::{Artifact, BatchResult, CacheDir, Repository, RepositoryAccessor, run};
///
/// let accessor = RepositoryAccessor::new()?;
/// let report = run(
///     &accessor,
///     &[Artifact::new("file.zip")],
///     &CacheDir::new("/tmp/cxxpm"),
///     &[Repository::parse("/srv/deps")],
/// )?;
/// if let BatchResult::SomeUnsatisfied { missing } = report.result() {
///     eprintln!("missing: {missing:?}");
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<A>(
    accessor: &A,
    artifacts: &[Artifact],
    cache: &CacheDir,
    repositories: &[Repository],
) -> CacheResult<BatchReport>
where
    A: RepositoryAccess + ?Sized,
{
    cache.ensure()?;
    info!(
        target: LOG_TARGET,
        cache = %cache.root(),
        artifacts = artifacts.len(),
        repositories = repositories.len(),
        "filling dependency cache"
    );

    let outcomes = artifacts
        .iter()
        .map(|artifact| {
            let outcome = fill_cache(accessor, artifact, cache, repositories);
            if !outcome.is_satisfied() {
                error!(target: LOG_TARGET, artifact = %artifact, "failed to find dependency");
            }
            (artifact.clone(), outcome)
        })
        .collect();
    let report = BatchReport { outcomes };

    log_summary(&report);
    Ok(report)
}

fn log_summary(report: &BatchReport) {
    let missing = report.unsatisfied().count();
    if missing == 0 {
        info!(
            target: LOG_TARGET,
            artifacts = report.outcomes().len(),
            "all dependencies cached"
        );
    } else {
        error!(
            target: LOG_TARGET,
            missing,
            artifacts = report.outcomes().len(),
            "dependency fetch failed"
        );
    }
}
