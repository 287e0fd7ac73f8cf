//! Job outcome and export status classifications
//!
//! These are the closed sets of values the completion decider dispatches on.
//! Each one round-trips through the upper-case wire names used by the job
//! runtime and the export status store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal (or in-flight) classification of a batch job run
///
/// The names mirror the exit codes a batch runtime reports. Parsing never
/// fails: any code that is not recognised becomes [`JobOutcome::Unknown`],
/// which the decider routes to the failure branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobOutcome {
    /// Exit code was missing or not recognised
    #[default]
    Unknown,
    /// Job is still running
    Executing,
    /// Job finished successfully
    Completed,
    /// Job had nothing to do
    #[serde(rename = "NOOP")]
    NoOp,
    /// Job failed
    Failed,
    /// Job was stopped before finishing
    Stopped,
}

impl JobOutcome {
    /// Returns the exit code name
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Unknown => "UNKNOWN",
            JobOutcome::Executing => "EXECUTING",
            JobOutcome::Completed => "COMPLETED",
            JobOutcome::NoOp => "NOOP",
            JobOutcome::Failed => "FAILED",
            JobOutcome::Stopped => "STOPPED",
        }
    }

    /// Only `COMPLETED` counts as a successful completion.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed)
    }

    /// Maps a process exit code to an outcome
    ///
    /// `Some(0)` is a completion, any other code is a failure and `None`
    /// (terminated by a signal) is a stop.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => JobOutcome::Completed,
            Some(_) => JobOutcome::Failed,
            None => JobOutcome::Stopped,
        }
    }
}

impl FromStr for JobOutcome {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "EXECUTING" => JobOutcome::Executing,
            "COMPLETED" => JobOutcome::Completed,
            "NOOP" => JobOutcome::NoOp,
            "FAILED" => JobOutcome::Failed,
            "STOPPED" => JobOutcome::Stopped,
            _ => JobOutcome::Unknown,
        })
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the export was produced for the run's collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    /// Every exported file has been sent
    Sent,
    /// Some exported files have not been sent yet
    InProgress,
    /// The export produced no files
    NoFilesExported,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Sent => "SENT",
            CollectionStatus::InProgress => "IN_PROGRESS",
            CollectionStatus::NoFilesExported => "NO_FILES_EXPORTED",
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the exported files were delivered downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendingCompletionStatus {
    /// All collections reached a terminal state without failures
    CompletedSuccessfully,
    /// All collections reached a terminal state, at least one failed
    CompletedUnsuccessfully,
    /// At least one collection is still being sent
    NotCompleted,
}

impl SendingCompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendingCompletionStatus::CompletedSuccessfully => "COMPLETED_SUCCESSFULLY",
            SendingCompletionStatus::CompletedUnsuccessfully => "COMPLETED_UNSUCCESSFULLY",
            SendingCompletionStatus::NotCompleted => "NOT_COMPLETED",
        }
    }

    /// True for the two statuses that close out a run
    pub fn is_complete(&self) -> bool {
        !matches!(self, SendingCompletionStatus::NotCompleted)
    }
}

impl fmt::Display for SendingCompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
