//! # runcgen
//!
//! Compiles a compose project bundle into one OCI runtime spec per
//! service and platform variant, written to stdout.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod bundle;
mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
