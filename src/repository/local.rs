//! Local directory repositories.

use std::fs::File;

use camino::Utf8Path;
use tracing::debug;

use super::stream::{StreamError, stream_to_file};
use super::{LOG_TARGET, Retrieval};
use crate::artifact::Artifact;
use crate::error::{FetchError, FetchResult};

/// Copies `base_path/<artifact>` to `destination` when it exists.
pub(super) fn retrieve(
    base_path: &Utf8Path,
    artifact: &Artifact,
    destination: &Utf8Path,
) -> FetchResult<Retrieval> {
    if !base_path.is_dir() {
        return Err(FetchError::MalformedRepository {
            repository: base_path.to_string(),
            reason: "not an existing directory".to_owned(),
        });
    }

    let source = base_path.join(artifact.name());
    if !source.is_file() {
        debug!(target: LOG_TARGET, path = %source, "artifact absent from local repository");
        return Ok(Retrieval::NotFound);
    }

    let mut file = File::open(&source).map_err(|err| FetchError::LocalRead {
        path: source.clone(),
        source: err,
    })?;
    let bytes = stream_to_file(&mut file, destination).map_err(|err| match err {
        StreamError::Read(read_err) => FetchError::LocalRead {
            path: source.clone(),
            source: read_err,
        },
        StreamError::Write(write_err) => FetchError::CacheWrite {
            path: destination.to_path_buf(),
            source: write_err,
        },
    })?;

    debug!(
        target: LOG_TARGET,
        source = %source,
        bytes,
        "copied artifact from local repository"
    );
    Ok(Retrieval::Fetched)
}
