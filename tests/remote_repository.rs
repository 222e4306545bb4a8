//! Behavioural coverage for HTTP repositories.

use std::net::TcpListener;
use std::time::Duration;

use color_eyre::eyre::{Context, Result, ensure};
use cxxpm::test_support::ForbiddenAccess;
use cxxpm::{
    Artifact, BatchResult, FetchError, FetchOutcome, Repository, RepositoryAccess,
    RepositoryAccessor, Retrieval, fill_cache, run,
};
use rstest::{fixture, rstest};

#[path = "support/http_repository.rs"]
mod http_repository;
#[path = "support/sandbox.rs"]
mod sandbox_support;

use http_repository::HttpRepository;
use sandbox_support::Sandbox;

#[fixture]
fn sandbox() -> Sandbox {
    Sandbox::new().expect("create sandbox")
}

#[fixture]
fn server() -> HttpRepository {
    HttpRepository::start().expect("start mock repository")
}

fn accessor() -> RepositoryAccessor {
    RepositoryAccessor::new().expect("build accessor")
}

#[rstest]
fn downloads_artifact_into_cache(sandbox: Sandbox, server: HttpRepository) -> Result<()> {
    server.serve("/deps/file.zip", 200, "remote bytes");
    let cache = sandbox.cache();
    cache.ensure()?;

    let outcome = fill_cache(
        &accessor(),
        &Artifact::new("file.zip"),
        &cache,
        &[server.repository("/deps")],
    );

    ensure!(outcome == FetchOutcome::Satisfied, "unexpected outcome {outcome:?}");
    ensure!(sandbox.cached("file.zip").as_deref() == Some("remote bytes"));
    Ok(())
}

#[rstest]
fn trailing_slashes_on_the_base_url_are_normalised(
    sandbox: Sandbox,
    server: HttpRepository,
) -> Result<()> {
    server.serve("/deps/file.zip", 200, "joined");
    let cache = sandbox.cache();
    cache.ensure()?;

    let outcome = fill_cache(
        &accessor(),
        &Artifact::new("file.zip"),
        &cache,
        &[server.repository("/deps//")],
    );

    ensure!(outcome == FetchOutcome::Satisfied);
    ensure!(sandbox.cached("file.zip").as_deref() == Some("joined"));
    Ok(())
}

#[rstest]
fn streams_bodies_larger_than_the_copy_buffer(
    sandbox: Sandbox,
    server: HttpRepository,
) -> Result<()> {
    let payload: Vec<u8> = (0..=250_u8).cycle().take(1024 * 1024).collect();
    server.serve("/1MB.zip", 200, payload.clone());
    let cache = sandbox.cache();
    cache.ensure()?;

    let outcome = fill_cache(
        &accessor(),
        &Artifact::new("1MB.zip"),
        &cache,
        &[server.repository("")],
    );

    ensure!(outcome == FetchOutcome::Satisfied);
    let cached = std::fs::read(cache.entry_path(&Artifact::new("1MB.zip")))
        .context("read cached artifact")?;
    ensure!(cached == payload, "cached bytes differ from served bytes");
    Ok(())
}

#[rstest]
#[case::not_found(404)]
#[case::forbidden(403)]
#[case::server_error(500)]
fn non_success_statuses_surface_as_http_errors(
    sandbox: Sandbox,
    server: HttpRepository,
    #[case] status: u16,
) -> Result<()> {
    server.serve("/deps/file.zip", status, "nope");
    sandbox.cache().ensure()?;
    let dest = sandbox.base_dir().join("cache/staged");

    let err = accessor()
        .retrieve(
            &server.repository("/deps"),
            &Artifact::new("file.zip"),
            &dest,
        )
        .expect_err("non-success status");

    match err {
        FetchError::Http { status: got, url } => {
            ensure!(got == status, "expected {status}, got {got}");
            ensure!(url.ends_with("/deps/file.zip"), "unexpected url {url}");
        }
        other => return Err(color_eyre::eyre::eyre!("unexpected error {other:?}")),
    }
    Ok(())
}

#[rstest]
fn refused_connections_surface_as_network_failures(sandbox: Sandbox) -> Result<()> {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").context("reserve port")?;
        listener.local_addr()?.port()
    };
    sandbox.cache().ensure()?;

    let err = accessor()
        .retrieve(
            &Repository::parse(&format!("http://127.0.0.1:{port}")),
            &Artifact::new("file.zip"),
            &sandbox.base_dir().join("cache/staged"),
        )
        .expect_err("nothing listens on the port");

    ensure!(matches!(err, FetchError::Network { .. }), "unexpected error {err:?}");
    ensure!(err.is_recoverable());
    Ok(())
}

#[rstest]
fn slow_repositories_time_out_as_network_failures(
    sandbox: Sandbox,
    server: HttpRepository,
) -> Result<()> {
    server.serve_slowly("/file.zip", Duration::from_secs(5), "late");
    sandbox.cache().ensure()?;
    let impatient = RepositoryAccessor::with_timeout(Duration::from_millis(200))?;

    let err = impatient
        .retrieve(
            &server.repository(""),
            &Artifact::new("file.zip"),
            &sandbox.base_dir().join("cache/staged"),
        )
        .expect_err("request times out");

    ensure!(matches!(err, FetchError::Network { .. }), "unexpected error {err:?}");
    Ok(())
}

#[rstest]
fn http_errors_fall_back_to_later_repositories(
    sandbox: Sandbox,
    server: HttpRepository,
) -> Result<()> {
    server.serve("/deps/file.zip", 500, "broken");
    let local = sandbox.local_repository("repo", &[("file.zip", "local copy")])?;
    let cache = sandbox.cache();
    cache.ensure()?;

    let outcome = fill_cache(
        &accessor(),
        &Artifact::new("file.zip"),
        &cache,
        &[server.repository("/deps"), local],
    );

    ensure!(outcome == FetchOutcome::Satisfied);
    ensure!(sandbox.cached("file.zip").as_deref() == Some("local copy"));
    ensure!(server.request_count() == 1);
    Ok(())
}

#[test]
fn a_successful_download_is_not_repeated() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let server = HttpRepository::start()?;
    server.serve("/file.zip", 200, "once");
    let cache = sandbox.cache();
    let repositories = [server.repository("")];
    let artifacts = [Artifact::new("file.zip")];

    let first = run(&accessor(), &artifacts, &cache, &repositories)?;
    let forbidden = ForbiddenAccess::default();
    let second = run(&forbidden, &artifacts, &cache, &repositories)?;

    ensure!(first.result() == BatchResult::AllSatisfied);
    ensure!(second.result() == BatchResult::AllSatisfied);
    ensure!(forbidden.calls() == 0);
    ensure!(server.request_count() == 1);
    Ok(())
}

#[rstest]
fn mixed_remote_and_local_repositories_fill_every_dependency(
    sandbox: Sandbox,
    server: HttpRepository,
) -> Result<()> {
    server.serve("/1MB.zip", 200, vec![7_u8; 4096]);
    let local = sandbox.local_repository("repo", &[("file.zip", "Not really a zip")])?;
    let cache = sandbox.cache();

    let report = run(
        &accessor(),
        &[Artifact::new("file.zip"), Artifact::new("1MB.zip")],
        &cache,
        &[server.repository(""), local],
    )?;

    ensure!(report.result() == BatchResult::AllSatisfied);
    ensure!(sandbox.cached("file.zip").as_deref() == Some("Not really a zip"));
    ensure!(cache.contains(&Artifact::new("1MB.zip")));
    Ok(())
}

#[rstest]
fn a_missing_local_artifact_does_not_block_remote_ones(
    sandbox: Sandbox,
    server: HttpRepository,
) -> Result<()> {
    server.serve("/1MB.zip", 200, vec![7_u8; 4096]);
    let local = sandbox.local_repository("repo", &[])?;
    let cache = sandbox.cache();

    let report = run(
        &accessor(),
        &[Artifact::new("file.zip"), Artifact::new("1MB.zip")],
        &cache,
        &[server.repository(""), local],
    )?;

    ensure!(
        report.result()
            == BatchResult::SomeUnsatisfied {
                missing: vec![Artifact::new("file.zip")]
            }
    );
    ensure!(cache.contains(&Artifact::new("1MB.zip")));
    ensure!(!cache.contains(&Artifact::new("file.zip")));
    Ok(())
}

#[test]
fn accessor_reports_fetched_for_remote_hits() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let server = HttpRepository::start()?;
    server.serve("/a.zip", 200, "a");
    sandbox.cache().ensure()?;
    let dest = sandbox.base_dir().join("cache/a.zip");

    let retrieval = accessor().retrieve(&server.repository(""), &Artifact::new("a.zip"), &dest)?;

    ensure!(retrieval == Retrieval::Fetched);
    ensure!(std::fs::read_to_string(&dest)? == "a");
    Ok(())
}
