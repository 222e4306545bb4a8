//! HTTP repository double backed by `wiremock`.
//!
//! The mock server runs on its own thread, so blocking clients can talk to it
//! from the test thread while the runtime here only drives setup calls.

use std::time::Duration;

use color_eyre::eyre::{Context, Result};
use cxxpm::Repository;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock HTTP server standing in for a remote repository.
pub struct HttpRepository {
    server: MockServer,
    runtime: Runtime,
}

impl HttpRepository {
    /// Starts an empty server; unknown paths answer `404`.
    pub fn start() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build tokio runtime")?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self { server, runtime })
    }

    /// Repository pointing at `prefix` on this server.
    pub fn repository(&self, prefix: &str) -> Repository {
        Repository::parse(&format!("{}{prefix}", self.server.uri()))
    }

    /// Serves `body` at `route` with `status`.
    pub fn serve(&self, route: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.mount(route, ResponseTemplate::new(status).set_body_bytes(body.into()));
    }

    /// Serves `body` at `route` after `delay`.
    pub fn serve_slowly(&self, route: &str, delay: Duration, body: impl Into<Vec<u8>>) {
        self.mount(
            route,
            ResponseTemplate::new(200)
                .set_body_bytes(body.into())
                .set_delay(delay),
        );
    }

    /// Number of requests the server has seen.
    pub fn request_count(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map_or(0, |requests| requests.len())
    }

    fn mount(&self, route: &str, response: ResponseTemplate) {
        self.runtime.block_on(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(response)
                .mount(&self.server),
        );
    }
}
