//! Directory creation through the capability sandbox.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use color_eyre::eyre::{Context, Result};
use std::io::ErrorKind;

/// Splits `path` into an ambient directory handle and the path relative to it.
///
/// Absolute paths are opened relative to the ambient root; relative paths are
/// resolved against the current working directory.
fn ambient_dir_and_path(path: &Utf8Path) -> Result<(Dir, Utf8PathBuf)> {
    if path.has_root() {
        let stripped = path
            .strip_prefix("/")
            .map_or_else(|_| path.to_path_buf(), Utf8Path::to_path_buf);
        let dir = Dir::open_ambient_dir("/", ambient_authority())
            .context("open ambient root directory")?;
        Ok((dir, stripped))
    } else {
        let dir = Dir::open_ambient_dir(".", ambient_authority())
            .context("open ambient working directory")?;
        Ok((dir, path.to_path_buf()))
    }
}

/// Creates `path` and any missing parents. Existing directories are left alone.
pub(crate) fn ensure_dir_exists(path: &Utf8Path) -> Result<()> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }

    let relative = relative.as_std_path();
    match dir.create_dir_all(relative) {
        Err(err) if err.kind() == ErrorKind::AlreadyExists && dir.is_dir(relative) => Ok(()),
        other => other,
    }
    .with_context(|| format!("create {}", path.as_str()))
}
