//! Reelcheck - Video compliance audit CLI
//!
//! A terminal client for the Reelcheck audit service: submit a video URL,
//! wait for the compliance report, and read the flagged issues without
//! leaving the shell.

mod api;
mod cli;
mod config;
mod models;
mod reporters;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging. RUST_LOG wins over --log-level, and everything
    // goes to stderr so reports and the alternate screen stay clean.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
