//! Source repositories and the accessor that reads artifacts out of them.
//!
//! A repository is either a local directory or the base URL of an HTTP
//! server. The [`RepositoryAccess`] trait is the seam between the cache fill
//! engine and the outside world: it answers whether a repository holds an
//! artifact and, when it does, writes the artifact's bytes to a destination
//! path chosen by the caller.

mod local;
mod remote;
mod stream;

use std::fmt;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::Context;
use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::error::{ClientError, FetchResult};

pub use remote::{DEFAULT_REQUEST_TIMEOUT, request_url};

/// Observability target for repository access.
const LOG_TARGET: &str = "cxxpm::repository";

/// A ranked source of artifacts.
///
/// Configuration strings starting with `http://` or `https://` become
/// [`Repository::Remote`]; anything else is treated as a local directory.
///
/// # Examples
/// ```
/// use cxxpm::Repository;
///
/// assert!(matches!(Repository::parse("https://mirror.example/deps"), Repository::Remote { .. }));
/// assert!(matches!(Repository::parse("/srv/deps"), Repository::Local { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Repository {
    /// A directory on the local filesystem.
    Local {
        /// Directory the artifact names are joined onto.
        base_path: Utf8PathBuf,
    },
    /// An HTTP(S) endpoint.
    Remote {
        /// URL the artifact names are appended to.
        base_url: String,
    },
}

impl Repository {
    /// Classifies a configured repository string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if has_http_scheme(trimmed) {
            Self::Remote {
                base_url: trimmed.to_owned(),
            }
        } else {
            Self::Local {
                base_path: Utf8PathBuf::from(trimmed),
            }
        }
    }
}

fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        raw.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { base_path } => f.write_str(base_path.as_str()),
            Self::Remote { base_url } => f.write_str(base_url),
        }
    }
}

impl From<String> for Repository {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Repository {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Repository> for String {
    fn from(repository: Repository) -> Self {
        match repository {
            Repository::Local { base_path } => base_path.into_string(),
            Repository::Remote { base_url } => base_url,
        }
    }
}

/// Successful answer from a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieval {
    /// The artifact was written to the destination.
    Fetched,
    /// The repository does not hold the artifact.
    NotFound,
}

/// Reads artifacts out of repositories.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryAccess {
    /// Writes `artifact` from `repository` to `destination`.
    ///
    /// `destination` is created or truncated. Its content is meaningful only
    /// when [`Retrieval::Fetched`] is returned.
    ///
    /// # Errors
    /// Returns a [`crate::FetchError`] describing why this repository could not
    /// supply the artifact.
    fn retrieve(
        &self,
        repository: &Repository,
        artifact: &Artifact,
        destination: &Utf8Path,
    ) -> FetchResult<Retrieval>;
}

/// Production accessor backed by the filesystem and a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct RepositoryAccessor {
    client: reqwest::blocking::Client,
}

impl RepositoryAccessor {
    /// Builds an accessor whose HTTP requests time out after
    /// [`DEFAULT_REQUEST_TIMEOUT`].
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be initialised.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Builds an accessor with a custom whole-request timeout.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl RepositoryAccess for RepositoryAccessor {
    fn retrieve(
        &self,
        repository: &Repository,
        artifact: &Artifact,
        destination: &Utf8Path,
    ) -> FetchResult<Retrieval> {
        match repository {
            Repository::Local { base_path } => local::retrieve(base_path, artifact, destination),
            Repository::Remote { base_url } => {
                remote::retrieve(&self.client, base_url, artifact, destination)
            }
        }
    }
}
