//! SteepleScout CLI — directory-driven church staff crawler.
//!
//! Enumerates a presbytery directory page, finds each church's
//! staff/leadership page, and persists extracted personnel records.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
