//! Ensures every dependency listed in `cxxpm.yml` is present in the local
//! cache, fetching missing ones from the configured repositories.
//!
//! Configuration comes from the YAML file plus `CXXPM_`-prefixed environment
//! variables. The binary exits with status code `0` when every dependency is
//! cached and `1` when any is missing or the run could not start.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use color_eyre::eyre::Result;
use cxxpm::observability::{LOG_TARGET, init_tracing};
use cxxpm::{BatchResult, DEFAULT_CONFIG_FILE, Settings, fetch_dependencies};
use tracing::error;

/// Fill the dependency cache from local and HTTP repositories.
#[derive(Debug, Parser)]
#[command(name = "cxxpm", version, about)]
struct Cli {
    /// Configuration file to read.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,
    /// Cache directory, overriding the configuration.
    #[arg(long)]
    cache: Option<Utf8PathBuf>,
    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(&cli.config)?;
    if let Some(cache) = cli.cache {
        settings.cache = cache;
    }

    let report = fetch_dependencies(&settings)?;
    match report.result() {
        BatchResult::AllSatisfied => Ok(ExitCode::SUCCESS),
        BatchResult::SomeUnsatisfied { missing } => {
            let names: Vec<&str> = missing.iter().map(cxxpm::Artifact::name).collect();
            error!(target: LOG_TARGET, missing = ?names, "dependencies could not be fetched");
            Ok(ExitCode::FAILURE)
        }
    }
}
