//! HTTP repositories.

use std::time::Duration;

use camino::Utf8Path;
use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

use super::stream::{StreamError, stream_to_file};
use super::{LOG_TARGET, Retrieval};
use crate::artifact::Artifact;
use crate::error::{FetchError, FetchResult};

/// Whole-request timeout applied to downloads unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Joins `base_url` and `name` with exactly one separating slash.
///
/// # Errors
/// Returns the parser's complaint when the joined string is not a valid URL.
///
/// # Examples
/// ```
/// use cxxpm::request_url;
///
/// let url = request_url("http://mirror.example/deps/", "/zlib.tar.gz").expect("valid url");
/// assert_eq!(url.as_str(), "http://mirror.example/deps/zlib.tar.gz");
/// ```
pub fn request_url(base_url: &str, name: &str) -> Result<Url, url::ParseError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        name.trim_start_matches('/')
    );
    Url::parse(&joined)
}

/// Downloads `<base_url>/<artifact>` into `destination`.
pub(super) fn retrieve(
    client: &Client,
    base_url: &str,
    artifact: &Artifact,
    destination: &Utf8Path,
) -> FetchResult<Retrieval> {
    let url = request_url(base_url, artifact.name()).map_err(|err| {
        FetchError::MalformedRepository {
            repository: base_url.to_owned(),
            reason: err.to_string(),
        }
    })?;

    let mut response = client
        .get(url.clone())
        .send()
        .map_err(|err| FetchError::Network {
            url: url.to_string(),
            source: Box::new(err),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    debug!(target: LOG_TARGET, url = %url, "downloading artifact");
    let bytes = stream_to_file(&mut response, destination).map_err(|err| match err {
        StreamError::Read(read_err) => FetchError::Network {
            url: url.to_string(),
            source: Box::new(read_err),
        },
        StreamError::Write(write_err) => FetchError::CacheWrite {
            path: destination.to_path_buf(),
            source: write_err,
        },
    })?;

    info!(target: LOG_TARGET, url = %url, bytes, "downloaded artifact");
    Ok(Retrieval::Fetched)
}
