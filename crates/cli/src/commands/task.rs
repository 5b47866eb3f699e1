// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task spool commands
//!
//! `task mark` stands in for the worker that executes snapshots and
//! deployments: it is how a task's status moves on.

use crate::config::Settings;
use crate::output::{self, truncate, OutputFormat};
use crate::wiring::open_spool;
use anyhow::Result;
use clap::Subcommand;
use naut_adapters::TaskRecord;
use naut_core::{TaskId, TaskStatus};
use serde::Serialize;
use std::fmt;

#[derive(clap::Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List spooled snapshot and deployment tasks
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Set a task's status (pending, in-progress, finished, failed)
    Mark { id: String, status: TaskStatus },
}

pub async fn handle(command: TaskCommand, settings: &Settings) -> Result<()> {
    let spool = open_spool(settings);
    match command {
        TaskCommand::List { format } => {
            let rows: Vec<_> = spool.list().await?.into_iter().map(TaskRow).collect();
            let header = format!(
                "{:<18} {:<10} {:<12} {:<10} {:<12} BUILD",
                "ID", "KIND", "ENVIRONMENT", "STATUS", "OWNER"
            );
            output::print_list(&rows, &header, "No tasks", format);
        }
        TaskCommand::Mark { id, status } => {
            let task = spool.set_status(&TaskId::from(id), status).await?;
            tracing::info!(task_id = %task.id, %status, "task marked");
            println!("Marked {} {} as {}", task.kind, task.id, task.status);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct TaskRow(TaskRecord);

impl fmt::Display for TaskRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TaskRow(record) = self;
        write!(
            f,
            "{:<18} {:<10} {:<12} {:<10} {:<12} {}",
            record.task.id,
            record.task.kind,
            truncate(&record.environment, 12),
            record.task.status,
            truncate(&record.task.owner, 12),
            record.build.as_deref().unwrap_or("-")
        )
    }
}
