//! Domain error types for the dependency cache filler.

use std::io;

use camino::Utf8PathBuf;
use color_eyre::Report;
use thiserror::Error;

/// Result alias for operations that may return a [`CxxpmError`].
pub type Result<T> = std::result::Result<T, CxxpmError>;

/// Result alias for configuration fallible operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result alias for cache directory preparation.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Result alias for a single repository attempt.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Top-level error exposed by the crate.
///
/// Only conditions that make the whole run pointless end up here. A missing
/// artifact is never one of them; see [`crate::BatchReport`].
#[derive(Debug, Error)]
pub enum CxxpmError {
    /// Indicates configuration loading or validation failed.
    #[error("configuration loading failed")]
    Config(#[from] ConfigError),
    /// Indicates the cache or expansion directory could not be prepared.
    #[error("cache preparation failed")]
    Cache(#[from] CacheError),
    /// Indicates the HTTP client could not be constructed.
    #[error("HTTP client setup failed")]
    Client(#[from] ClientError),
}

/// Captures configuration failures.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ConfigError(#[from] Report);

/// Captures failures preparing the cache directory.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct CacheError(#[from] Report);

/// Captures failures building the HTTP client.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ClientError(#[from] Report);

/// Failure of one repository attempt for one artifact.
///
/// Everything except [`FetchError::CacheWrite`] means "try the next
/// repository". A local miss is not an error at all; it is reported as
/// [`crate::Retrieval::NotFound`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote repository answered with a non-success status.
    #[error("{url} responded with HTTP {status}")]
    Http {
        /// Full request URL.
        url: String,
        /// Numeric HTTP status code.
        status: u16,
    },
    /// The request never produced a complete response.
    #[error("request to {url} failed")]
    Network {
        /// Full request URL.
        url: String,
        /// Transport-level cause (timeout, refused connection, DNS, reset).
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The repository entry is neither an existing directory nor a usable URL.
    #[error("repository {repository} is unusable: {reason}")]
    MalformedRepository {
        /// Repository string as configured.
        repository: String,
        /// Why the entry was rejected.
        reason: String,
    },
    /// A local repository holds the artifact but it could not be read.
    #[error("failed to read {path}")]
    LocalRead {
        /// Path of the unreadable artifact.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Writing into the cache directory failed.
    #[error("failed to write {path}")]
    CacheWrite {
        /// Destination path inside the cache directory.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Returns `true` when another repository might still satisfy the artifact.
    ///
    /// # Examples
    /// ```
    /// use cxxpm::FetchError;
    ///
    /// let err = FetchError::Http { url: "http://repo/a.zip".into(), status: 404 };
    /// assert!(err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CacheWrite { .. })
    }
}
