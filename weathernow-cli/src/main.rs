//! `weathernow`: terminal front end for `weathernow-core`.
//!
//! Argument parsing and the interactive `configure` prompt live in [`cli`],
//! rendering in [`output`]. Diagnostics go to stderr through `tracing`;
//! set `RUST_LOG=weathernow_core=debug` for request-level detail.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    cli::Cli::parse().run().await
}
