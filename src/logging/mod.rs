//! Logging and observability
//!
//! Structured logging with:
//! - Console output for operators
//! - JSON-formatted local log files with rotation
//! - Configurable log levels
//!
//! # Example
//!
//! ```no_run
//! use snapshot_sender::logging::init_logging;
//! use snapshot_sender::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a job run
///
/// # Example
///
/// ```no_run
/// use snapshot_sender::log_job_start;
///
/// log_job_start!("db.core.toDo", "2020-12-25");
/// ```
#[macro_export]
macro_rules! log_job_start {
    ($topic:expr, $export_date:expr) => {
        tracing::info!(
            topic = %$topic,
            export_date = %$export_date,
            "Job started"
        );
    };
}

/// Log the end of a job run and the branch taken
#[macro_export]
macro_rules! log_job_end {
    ($outcome:expr, $branch:expr) => {
        tracing::info!(
            outcome = %$outcome,
            branch = ?$branch,
            "Job ended"
        );
    };
}

/// Log a collaborator call that failed and was absorbed
///
/// # Example
///
/// ```no_run
/// use snapshot_sender::log_collaborator_failure;
/// use snapshot_sender::domain::SenderError;
///
/// let error = SenderError::Connection("connection refused".to_string());
/// log_collaborator_failure!("publish", &error);
/// ```
#[macro_export]
macro_rules! log_collaborator_failure {
    ($operation:expr, $error:expr) => {
        tracing::warn!(
            operation = $operation,
            error = %$error,
            "Collaborator call failed, continuing"
        );
    };
}
