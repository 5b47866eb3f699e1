// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step commands

use crate::config::Settings;
use crate::output::{self, truncate, OutputFormat};
use crate::wiring::{make_driver, open_spool, open_store};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use naut_core::config::MAX_DURATION_OPTION;
use naut_core::{
    BuildName, Environment, IdGen, PipelineContext, PipelineStep, StepConfig, SystemClock,
    TaskStatus, UuidIdGen,
};
use naut_engine::{Outcome, Poller};
use naut_storage::{StepRecord, StepStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[derive(clap::Args)]
pub struct StepArgs {
    #[command(subcommand)]
    pub command: StepCommand,
}

#[derive(Subcommand)]
pub enum StepCommand {
    /// Create a step deploying a build to an environment
    Create(CreateArgs),
    /// Advance a step by one transition
    Advance {
        /// Step id or unique prefix
        id: String,
    },
    /// Show details of a step
    Show {
        /// Step id or unique prefix
        id: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List all steps
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Advance a step repeatedly until it finishes or fails
    Poll {
        /// Step id or unique prefix
        id: String,
        /// Delay between calls, e.g. 5s
        #[arg(long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
        /// Stop after this many calls
        #[arg(long)]
        max_polls: Option<u32>,
    },
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Target environment name
    #[arg(long)]
    environment: String,
    /// Build archive currently live on the environment
    #[arg(long)]
    current_build: Option<PathBuf>,
    /// Build archive to deploy
    #[arg(long)]
    pending_build: PathBuf,
    /// Who is deploying
    #[arg(long, env = "NAUT_INITIATOR")]
    initiator: String,
    /// Do not snapshot the database first
    #[arg(long)]
    skip_snapshot: bool,
    /// Time allowed per stage, in seconds or as a duration such as 90m
    #[arg(long)]
    max_duration: Option<String>,
    /// Step name used as the log prefix
    #[arg(long)]
    name: Option<String>,
}

pub async fn handle(command: StepCommand, settings: &Settings) -> Result<()> {
    match command {
        StepCommand::Create(args) => create(args, settings),
        StepCommand::Advance { id } => advance(&id, settings).await,
        StepCommand::Show { id, format } => show(&id, format, settings).await,
        StepCommand::List { format } => list(format, settings),
        StepCommand::Poll {
            id,
            interval,
            max_polls,
        } => poll(&id, interval, max_polls, settings).await,
    }
}

fn create(args: CreateArgs, settings: &Settings) -> Result<()> {
    // Configuration problems surface here, before any step exists
    let config = match args.max_duration {
        Some(value) => {
            StepConfig::from_options(&BTreeMap::from([(MAX_DURATION_OPTION.to_string(), value)]))?
        }
        None => StepConfig::new(settings.max_duration)?,
    };

    let mut environment = Environment::new(args.environment)
        .with_pending_build(BuildName::from_filename(&args.pending_build));
    if let Some(current) = &args.current_build {
        environment = environment.with_current_build(BuildName::from_filename(current));
    }
    let context =
        PipelineContext::new(environment, args.initiator).with_skip_snapshot(args.skip_snapshot);
    context.validate()?;

    let id = UuidIdGen::new("step").next();
    let name = args.name.unwrap_or_else(|| settings.step_name.clone());
    let step = PipelineStep::new(id.as_str(), name, config, &SystemClock);

    let store = open_store(settings)?;
    store.save(&StepRecord::new(step, context))?;
    tracing::info!(step = %id, "step created");
    println!("Created step {}", id);
    Ok(())
}

async fn advance(id: &str, settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let mut record = store.resolve(id)?;
    let driver = make_driver(settings, &store, record.id());

    let outcome = driver.advance(&mut record.step, &mut record.context).await?;
    if outcome != Outcome::Terminal {
        store.save(&record)?;
    }

    match outcome {
        Outcome::Terminal => println!("Step {} is already {}", record.id(), record.step.status),
        _ => println!(
            "Step {}: {} ({})",
            record.id(),
            record.step.status,
            record.step.active_stage_name().unwrap_or("-")
        ),
    }
    Ok(())
}

#[derive(Serialize)]
struct TaskView {
    id: String,
    kind: String,
    status: TaskStatus,
    owner: String,
}

#[derive(Serialize)]
struct StepView {
    id: String,
    name: String,
    status: String,
    active_stage: Option<String>,
    timed_out: bool,
    max_duration_secs: u64,
    environment: String,
    current_build: Option<String>,
    pending_build: Option<String>,
    initiator: String,
    skip_snapshot: bool,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    tasks: Vec<TaskView>,
    log: Vec<String>,
}

impl fmt::Display for StepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Step: {}", self.id)?;
        writeln!(f, "  Name: {}", self.name)?;
        writeln!(f, "  Status: {}", self.status)?;
        writeln!(f, "  Stage: {}", self.active_stage.as_deref().unwrap_or("-"))?;
        if self.timed_out {
            writeln!(f, "  Timed out after {}s", self.max_duration_secs)?;
        }
        writeln!(f, "  Environment: {}", self.environment)?;
        if let Some(build) = &self.current_build {
            writeln!(f, "  Current build: {}", build)?;
        }
        if let Some(build) = &self.pending_build {
            writeln!(f, "  Pending build: {}", build)?;
        }
        if self.skip_snapshot {
            writeln!(f, "  Snapshot: skipped by user request")?;
        }
        writeln!(f, "  Initiator: {}", self.initiator)?;
        writeln!(f, "  Created: {}", self.created_at)?;
        if let Some(at) = self.finished_at {
            writeln!(f, "  Finished: {}", at)?;
        }

        if !self.tasks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Tasks:")?;
            for task in &self.tasks {
                writeln!(f, "  {:<20} {:<10} {}", task.id, task.kind, task.status)?;
            }
        }

        if !self.log.is_empty() {
            writeln!(f)?;
            writeln!(f, "Log:")?;
            for line in &self.log {
                writeln!(f, "  {}", line)?;
            }
        }
        Ok(())
    }
}

async fn show(id: &str, format: OutputFormat, settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let record = store.resolve(id)?;
    let spool = open_spool(settings);

    let mut tasks = Vec::new();
    for task in record.context.tasks() {
        // The spool holds the service's latest word on status
        let status = spool.status(&task.id).await.unwrap_or(task.status);
        tasks.push(TaskView {
            id: task.id.to_string(),
            kind: task.kind.to_string(),
            status,
            owner: task.owner.clone(),
        });
    }

    let StepRecord { step, context } = record;
    let env = context.environment;
    let view = StepView {
        log: store.log_for(&step.id).read_lines()?,
        id: step.id.to_string(),
        timed_out: step.is_timed_out(),
        max_duration_secs: step.config.max_duration_secs(),
        name: step.name,
        status: step.status.to_string(),
        active_stage: step.active_stage,
        environment: env.name,
        current_build: env.current_build.map(|b| b.to_string()),
        pending_build: env.pending_build.map(|b| b.to_string()),
        initiator: context.initiator,
        skip_snapshot: context.skip_snapshot,
        created_at: step.created_at,
        started_at: step.started_at,
        finished_at: step.finished_at,
        tasks,
    };

    output::print(&view, format);
    Ok(())
}

#[derive(Serialize)]
struct StepRow {
    id: String,
    name: String,
    environment: String,
    status: String,
    stage: Option<String>,
}

impl fmt::Display for StepRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<18} {:<16} {:<12} {:<10} {}",
            self.id,
            truncate(&self.name, 16),
            truncate(&self.environment, 12),
            self.status,
            self.stage.as_deref().unwrap_or("-")
        )
    }
}

fn list(format: OutputFormat, settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let rows: Vec<_> = store
        .list()?
        .into_iter()
        .map(|r| StepRow {
            id: r.step.id.to_string(),
            name: r.step.name,
            environment: r.context.environment.name,
            status: r.step.status.to_string(),
            stage: r.step.active_stage,
        })
        .collect();

    let header = format!(
        "{:<18} {:<16} {:<12} {:<10} STAGE",
        "ID", "NAME", "ENVIRONMENT", "STATUS"
    );
    output::print_list(&rows, &header, "No steps", format);
    Ok(())
}

async fn poll(
    id: &str,
    interval: Option<Duration>,
    max_polls: Option<u32>,
    settings: &Settings,
) -> Result<()> {
    let store = open_store(settings)?;
    let step_id = store.resolve(id)?.step.id;
    let driver = make_driver(settings, &store, &step_id);

    let mut poller = Poller::new(driver, interval.unwrap_or(settings.poll_interval));
    if let Some(max) = max_polls {
        poller = poller.with_max_polls(max);
    }

    let running = poller.running();
    ctrlc::set_handler(move || {
        eprintln!("\nStopping after the current call...");
        running.store(false, Ordering::SeqCst);
    })?;

    let summary = poller.run(&store, &step_id).await?;
    println!(
        "Step {}: {} after {} calls ({} failed)",
        step_id, summary.status, summary.polls, summary.errors
    );
    Ok(())
}
