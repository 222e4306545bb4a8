//! Artifact names as they appear in the dependency list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dependency file identified solely by its name.
///
/// The name is joined onto repository and cache locations verbatim.
///
/// # Examples
/// ```
/// use cxxpm::Artifact;
///
/// let artifact = Artifact::new("zlib-1.3.tar.gz");
/// assert_eq!(artifact.name(), "zlib-1.3.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    /// Wraps a file name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Artifact {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Artifact {
    fn from(name: String) -> Self {
        Self(name)
    }
}
