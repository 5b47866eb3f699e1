// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! naut - deployment pipeline CLI

mod commands;
mod config;
mod output;
mod wiring;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{step, task};
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Parser)]
#[command(
    name = "naut",
    version,
    about = "naut drives deployments through snapshot and deploy stages"
)]
struct Cli {
    /// Directory holding steps, tasks and logs
    #[arg(long, global = true, env = "NAUT_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Settings file (defaults to naut.toml in the state directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pipeline step management
    Step(step::StepArgs),
    /// Snapshot and deployment task management
    Task(task::TaskArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref(), cli.state_dir)?;
    tracing::debug!(state_dir = %settings.state_dir.display(), "loaded settings");

    match cli.command {
        Commands::Step(args) => step::handle(args.command, &settings).await,
        Commands::Task(args) => task::handle(args.command, &settings).await,
    }
}

/// Diagnostics go to stderr so stdout stays the step log and command output
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("NAUT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
