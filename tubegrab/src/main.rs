//! tubegrab CLI - YouTube/TikTok audio and video downloader

use clap::Parser;
use eyre::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tubegrab::cli::{Cli, run_cli};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    Ok(run_cli(Cli::parse())?.into())
}
