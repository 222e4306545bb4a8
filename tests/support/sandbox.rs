//! Shared sandbox for tests that need a cache directory and local repositories.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{Context, Result, eyre};
use cxxpm::{Artifact, CacheDir, Repository};
use tempfile::TempDir;

/// Temporary tree holding a cache directory and any number of local
/// repositories. Everything is removed when the sandbox is dropped.
#[derive(Debug)]
pub struct Sandbox {
    _guard: TempDir,
    base_dir: Utf8PathBuf,
}

impl Sandbox {
    /// Creates an empty sandbox.
    pub fn new() -> Result<Self> {
        let guard = tempfile::Builder::new()
            .prefix("cxxpm-test")
            .tempdir()
            .context("create sandbox tempdir")?;
        let base_dir = Utf8Path::from_path(guard.path())
            .ok_or_else(|| eyre!("sandbox path is not valid UTF-8"))?
            .to_path_buf();
        Ok(Self {
            _guard: guard,
            base_dir,
        })
    }

    /// Root of the sandbox.
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Cache directory inside the sandbox. Not created until a run needs it.
    pub fn cache(&self) -> CacheDir {
        CacheDir::new(self.base_dir.join("cache"))
    }

    /// Creates a local repository holding `files` and returns it.
    pub fn local_repository(&self, name: &str, files: &[(&str, &str)]) -> Result<Repository> {
        let dir = self.base_dir.join(name);
        fs::create_dir_all(&dir).with_context(|| format!("create repository {dir}"))?;
        for (file, content) in files {
            fs::write(dir.join(file), content).with_context(|| format!("write {file}"))?;
        }
        Ok(Repository::parse(dir.as_str()))
    }

    /// Reads a cached artifact, if present.
    pub fn cached(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.cache().entry_path(&Artifact::new(name))).ok()
    }
}
