//! Hosts an export job as a child process
//!
//! The runner brackets the child with the decider's lifecycle hooks and keeps
//! metrics flowing to the pushgateway while it runs.

use crate::core::collaborators::RunningJobTracker;
use crate::core::completion::{CompletionDecider, CompletionDecision};
use crate::domain::{JobOutcome, Result, SenderError};
use crate::metrics::spawn_periodic_push;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::watch;
use uuid::Uuid;

/// Program and arguments of the hosted job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl JobCommand {
    /// Splits an argv vector into program and arguments
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SenderError::Job("No job command given".to_string()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

/// What happened during one hosted run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: JobOutcome,
    /// Exit code of the child, if it exited normally
    pub exit_code: Option<i32>,
    pub decision: CompletionDecision,
}

impl RunSummary {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

pub struct JobRunner {
    decider: CompletionDecider,
    tracker: Arc<dyn RunningJobTracker>,
    push_interval: Duration,
}

impl JobRunner {
    /// `tracker` should be the same tracker the decider was built with
    pub fn new(
        decider: CompletionDecider,
        tracker: Arc<dyn RunningJobTracker>,
        push_interval: Duration,
    ) -> Self {
        Self {
            decider,
            tracker,
            push_interval,
        }
    }

    /// Runs `command` to completion, or until `shutdown` turns `true`
    ///
    /// `on_end` is always called exactly once per `run`, including when the
    /// command cannot be spawned.
    pub async fn run(
        &self,
        command: &JobCommand,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(
            %run_id,
            program = %command.program,
            args = ?command.args,
            "Hosting export job"
        );

        self.decider.on_start().await;

        let (stop_tx, stop_rx) = watch::channel(false);
        let pusher = spawn_periodic_push(self.tracker.clone(), self.push_interval, stop_rx);

        let (outcome, exit_code) = execute(command, &mut shutdown).await;

        let _ = stop_tx.send(true);
        if let Err(e) = pusher.await {
            tracing::warn!(error = %e, "Periodic metrics push task ended abnormally");
        }

        let decision = self.decider.on_end(outcome).await;
        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcome,
            exit_code,
            decision,
        };

        tracing::info!(
            %run_id,
            outcome = %summary.outcome,
            exit_code = ?summary.exit_code,
            duration_ms = summary.duration().num_milliseconds(),
            "Export job finished"
        );

        summary
    }
}

async fn execute(
    command: &JobCommand,
    shutdown: &mut watch::Receiver<bool>,
) -> (JobOutcome, Option<i32>) {
    let mut child = match Command::new(&command.program)
        .args(&command.args)
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::error!(program = %command.program, error = %e, "Failed to spawn job");
            return (JobOutcome::Failed, None);
        }
    };

    tokio::select! {
        status = child.wait() => match status {
            Ok(status) => {
                let code = status.code();
                (JobOutcome::from_exit_code(code), code)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for job");
                (JobOutcome::Failed, None)
            }
        },
        _ = wait_for_shutdown(shutdown) => {
            tracing::warn!("Shutdown requested, stopping job");
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "Failed to kill job");
            }
            (JobOutcome::Stopped, None)
        }
    }
}

/// Resolves once `true` is observed; never resolves if the sender goes away
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
