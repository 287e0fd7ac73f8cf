// Snapshot Sender - Completion hook for batch export jobs
// Copyright (c) 2025 Snapshot Sender Contributors
// Licensed under the MIT License

//! # Snapshot Sender
//!
//! Lifecycle hooks for a batch export job. When a job starts, the running-job
//! gauge is raised and metrics are pushed. When it ends, the gauge is
//! lowered and, depending on how the job finished and how far delivery got,
//! a failure counter is incremented, a success indicator is published, or a
//! monitoring notification is sent. Metrics are pushed once more at the end.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The completion decider, its collaborator traits and the job runner
//! - [`adapters`] - Export status document, NiFi and monitoring integrations
//! - [`metrics`] - Prometheus instruments and pushgateway transport
//! - [`domain`] - Job outcomes, delivery statuses and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snapshot_sender::cli::commands::run::build_runner;
//! use snapshot_sender::config::load_config;
//! use snapshot_sender::core::runner::JobCommand;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("snapshot-sender.toml")?;
//!     let runner = build_runner(&config)?;
//!
//!     let command = JobCommand::from_argv(&["./export.sh".to_string()])?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let summary = runner.run(&command, shutdown_rx).await;
//!
//!     println!("Outcome: {}", summary.outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error is
//! [`domain::SenderError`]. The lifecycle hooks themselves never fail: errors
//! from collaborators are logged and the remaining steps still run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod metrics;
