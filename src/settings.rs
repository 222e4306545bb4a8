//! Run configuration.
//!
//! Settings are layered from built-in defaults, a YAML file (`cxxpm.yml` by
//! default) and `CXXPM_`-prefixed environment variables, later layers
//! winning. A missing file is not an error: the defaults stand in for it.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{Context, eyre};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::cache::default_cache_dir;
use crate::error::{ConfigError, ConfigResult};
use crate::repository::{DEFAULT_REQUEST_TIMEOUT, Repository};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cxxpm.yml";

/// Prefix of environment variable overrides.
const ENV_PREFIX: &str = "CXXPM_";

/// Where dependencies get expanded unless configured otherwise.
const DEFAULT_LOCATION: &str = "build/cxxpm/dependencies";

const MAX_TIMEOUT_SECS: u64 = 600;

/// Everything a run needs, resolved once at startup.
///
/// # Examples
/// ```
/// use cxxpm::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.dependencies.is_empty());
/// assert_eq!(settings.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cache directory receiving the artifacts.
    pub cache: Utf8PathBuf,
    /// Repositories in priority order.
    pub repositories: Vec<Repository>,
    /// Artifacts that must end up in the cache.
    pub dependencies: Vec<Artifact>,
    /// Directory dependencies are expanded into. Only created by this crate.
    pub location: Utf8PathBuf,
    /// Whole-request timeout for HTTP repositories, in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache: default_cache_dir(),
            repositories: Vec::new(),
            dependencies: Vec::new(),
            location: Utf8PathBuf::from(DEFAULT_LOCATION),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    /// Loads settings from `path` and the environment.
    ///
    /// # Errors
    /// Returns an error when the file is not valid YAML, a value has the wrong
    /// shape, or the timeout is out of range.
    pub fn load(path: &Utf8Path) -> ConfigResult<Self> {
        let settings: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file_exact(path.as_std_path()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| format!("failed to load configuration from {path}"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Returns the HTTP timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::from(eyre!(
                "timeout_secs must be at least 1 second (received 0)"
            )));
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::from(eyre!(
                "timeout_secs must be {MAX_TIMEOUT_SECS} seconds or less (received {})",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}
