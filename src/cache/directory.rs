//! The cache directory and its staged writes.
//!
//! An entry is complete the moment `<root>/<artifact>` exists, so bytes are
//! never written there directly. A fill writes a hidden `.part` file in the
//! same directory and only a successful fetch renames it into place.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::Context;
use tempfile::TempPath;
use tracing::debug;

use crate::artifact::Artifact;
use crate::error::{CacheResult, FetchError, FetchResult};
use crate::fs::ensure_dir_exists;

/// Observability target for cache operations.
const LOG_TARGET: &str = "cxxpm::cache";

/// Prefix of in-flight entries. Kept short so any valid artifact name still
/// leaves room for the random part.
const STAGING_PREFIX: &str = ".cxxpm-";

/// Suffix of in-flight entries.
const STAGING_SUFFIX: &str = ".part";

/// Durable store of fetched artifacts, keyed by file name.
///
/// # Examples
/// ```
/// use cxxpm::{Artifact, CacheDir};
///
/// let cache = CacheDir::new("/var/cache/cxxpm");
/// assert_eq!(cache.entry_path(&Artifact::new("a.zip")), "/var/cache/cxxpm/a.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: Utf8PathBuf,
}

impl CacheDir {
    /// Wraps the cache root. Nothing is touched on disk.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns where `artifact` lives once cached.
    #[must_use]
    pub fn entry_path(&self, artifact: &Artifact) -> Utf8PathBuf {
        self.root.join(artifact.name())
    }

    /// Returns `true` when `artifact` is already cached as a regular file.
    #[must_use]
    pub fn contains(&self, artifact: &Artifact) -> bool {
        self.entry_path(artifact).is_file()
    }

    /// Creates the cache root and its parents when missing.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created.
    pub fn ensure(&self) -> CacheResult<()> {
        ensure_dir_exists(&self.root)
            .with_context(|| format!("failed to prepare cache directory {}", self.root))?;
        Ok(())
    }

    /// Reserves a hidden scratch file for fetching `artifact`.
    ///
    /// The same scratch file serves every repository attempt; accessors
    /// truncate it before writing.
    pub(crate) fn stage(&self, artifact: &Artifact) -> FetchResult<StagedEntry> {
        let target = self.entry_path(artifact);
        let write_failure = |source: io::Error| FetchError::CacheWrite {
            path: target.clone(),
            source,
        };

        let temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(write_failure)?
            .into_temp_path();
        let path = Utf8Path::from_path(&temp)
            .map(Utf8Path::to_path_buf)
            .ok_or_else(|| write_failure(io::Error::other("staging path is not valid UTF-8")))?;

        Ok(StagedEntry { path, temp, target })
    }
}

/// Scratch file for one artifact. Dropping it removes the file.
#[derive(Debug)]
pub(crate) struct StagedEntry {
    path: Utf8PathBuf,
    temp: TempPath,
    target: Utf8PathBuf,
}

impl StagedEntry {
    /// Path the accessor should write to.
    pub(crate) fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Publishes the staged bytes as the cache entry.
    ///
    /// A regular file that appeared in the meantime wins; the staged copy is
    /// discarded and the artifact still counts as cached. Anything else
    /// occupying the entry path is a cache write failure.
    pub(crate) fn commit(self) -> FetchResult<()> {
        let Self { temp, target, .. } = self;
        match temp.persist_noclobber(&target) {
            Ok(()) => Ok(()),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists && target.is_file() => {
                debug!(
                    target: LOG_TARGET,
                    path = %target,
                    "cache entry appeared concurrently, keeping existing file"
                );
                Ok(())
            }
            Err(err) => Err(FetchError::CacheWrite {
                path: target,
                source: err.error,
            }),
        }
    }
}
