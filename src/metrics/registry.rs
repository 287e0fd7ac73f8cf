//! Process-wide metric instruments
//!
//! [`JobMetrics`] is created once at startup and shared behind an `Arc`.
//! Every instrument is a `prometheus` atomic, so the decider, the background
//! push task and the encoder can touch them concurrently without locking.

use crate::domain::Result;
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::fmt;

/// Metric name prefix shared by every instrument
const NAMESPACE: &str = "snapshot_sender";

/// The failure counters the completion decider can increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCounter {
    /// Job failed while indicator mode was off
    FailedFiles,
    /// Job failed while indicator mode was on
    FailedSuccessFiles,
    /// Job completed but delivery of some collections failed
    FailedCollections,
}

impl FailureCounter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCounter::FailedFiles => "failed_files",
            FailureCounter::FailedSuccessFiles => "failed_success_files",
            FailureCounter::FailedCollections => "failed_collections",
        }
    }
}

impl fmt::Display for FailureCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handles onto the three failure counters
///
/// Cloning is cheap: prometheus counters share their value.
#[derive(Clone)]
pub struct FailureCounters {
    failed_files: IntCounter,
    failed_success_files: IntCounter,
    failed_collections: IntCounter,
}

impl FailureCounters {
    pub fn increment(&self, counter: FailureCounter) {
        self.counter(counter).inc();
    }

    pub fn get(&self, counter: FailureCounter) -> u64 {
        self.counter(counter).get()
    }

    fn counter(&self, counter: FailureCounter) -> &IntCounter {
        match counter {
            FailureCounter::FailedFiles => &self.failed_files,
            FailureCounter::FailedSuccessFiles => &self.failed_success_files,
            FailureCounter::FailedCollections => &self.failed_collections,
        }
    }
}

/// Registry plus the job gauge and failure counters
pub struct JobMetrics {
    registry: Registry,

    pub running_applications: IntGauge,
    pub failed_files: IntCounter,
    pub failed_success_files: IntCounter,
    pub failed_collections: IntCounter,
}

impl JobMetrics {
    /// Creates and registers all instruments
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SenderError::Metrics`] if an instrument cannot
    /// be created or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let running_applications = IntGauge::with_opts(
            Opts::new("running_applications", "Number of export jobs currently running")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(running_applications.clone()))?;

        let failed_files = IntCounter::with_opts(
            Opts::new("failed_files_total", "Export jobs that failed").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(failed_files.clone()))?;

        let failed_success_files = IntCounter::with_opts(
            Opts::new(
                "failed_success_files_total",
                "Export jobs that failed while publishing success indicators",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(failed_success_files.clone()))?;

        let failed_collections = IntCounter::with_opts(
            Opts::new(
                "failed_collections_total",
                "Completed exports whose collections were not all delivered",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(failed_collections.clone()))?;

        Ok(Self {
            registry,
            running_applications,
            failed_files,
            failed_success_files,
            failed_collections,
        })
    }

    pub fn failure_counters(&self) -> FailureCounters {
        FailureCounters {
            failed_files: self.failed_files.clone(),
            failed_success_files: self.failed_success_files.clone(),
            failed_collections: self.failed_collections.clone(),
        }
    }

    /// Renders every registered metric in the text exposition format
    pub fn encode(&self) -> Result<(Vec<u8>, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((buffer, encoder.format_type().to_string()))
    }
}
