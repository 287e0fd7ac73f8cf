//! Run command implementation
//!
//! Hosts an export job between the completion decider's start and end
//! hooks, wiring the production collaborators from configuration.

use crate::adapters::monitoring::WebhookNotifier;
use crate::adapters::nifi::NifiSuccessPublisher;
use crate::adapters::status::FileStatusReporter;
use crate::config::{load_config, SenderConfig};
use crate::core::collaborators::RunningJobTracker;
use crate::core::completion::CompletionDecider;
use crate::core::runner::{JobCommand, JobRunner};
use crate::domain::Result;
use crate::metrics::{JobMetrics, PushgatewayTracker};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Publish the success indicator instead of checking delivery status
    ///
    /// A bare flag means true; `--send-success-indicator=false` switches off
    /// indicator mode set in the configuration.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub send_success_indicator: Option<bool>,

    /// Override the export date
    #[arg(long)]
    pub export_date: Option<String>,

    /// Override the topic
    #[arg(long)]
    pub topic: Option<String>,

    /// Override the correlation id
    #[arg(long)]
    pub correlation_id: Option<String>,

    /// Export job to run, with its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Invalid configuration after CLI overrides");
            eprintln!("Configuration error: {e}");
            return Ok(2);
        }

        let command = JobCommand::from_argv(&self.command)?;
        let runner = match build_runner(&config) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up collaborators");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let summary = runner.run(&command, shutdown_signal).await;

        println!(
            "Run {} finished: outcome={} branch={:?}",
            summary.run_id, summary.outcome, summary.decision.branch
        );

        Ok(if summary.decision.job_succeeded() { 0 } else { 1 })
    }

    fn apply_overrides(&self, config: &mut SenderConfig) {
        if let Some(flag) = self.send_success_indicator {
            tracing::info!(send_success_indicator = flag, "Overriding indicator mode from CLI");
            config.run.send_success_indicator = flag;
        }
        if let Some(export_date) = &self.export_date {
            tracing::info!(export_date = %export_date, "Overriding export date from CLI");
            config.run.export_date = export_date.clone();
        }
        if let Some(topic) = &self.topic {
            tracing::info!(topic = %topic, "Overriding topic from CLI");
            config.run.topic_name = topic.clone();
        }
        if let Some(correlation_id) = &self.correlation_id {
            config.run.correlation_id = correlation_id.clone();
        }
    }
}

/// Wires the production collaborators into a [`JobRunner`]
///
/// Metrics are grouped on the pushgateway by job name and topic.
pub fn build_runner(config: &SenderConfig) -> Result<JobRunner> {
    let metrics = Arc::new(JobMetrics::new()?);
    let counters = metrics.failure_counters();

    let pushgateway = PushgatewayTracker::new(
        config.pushgateway.clone(),
        metrics,
        &config.application.job_name,
        &[("topic", config.run.topic_name.as_str())],
    )?;
    tracing::debug!(push_url = %pushgateway.push_url(), "Metrics push target");
    let tracker: Arc<dyn RunningJobTracker> = Arc::new(pushgateway);

    let status = Arc::new(FileStatusReporter::from_config(
        &config.export_status,
        &config.run.topic_name,
    ));
    let publisher = Arc::new(NifiSuccessPublisher::new(
        &config.nifi,
        &config.run,
        &config.environment,
    )?);
    let notifier = Arc::new(WebhookNotifier::new(
        config.monitoring.clone(),
        config.run.clone(),
    )?);

    let decider = CompletionDecider::new(
        config.run.clone(),
        tracker.clone(),
        status,
        publisher,
        notifier,
        counters,
    );

    Ok(JobRunner::new(
        decider,
        tracker,
        Duration::from_secs(config.pushgateway.push_interval_seconds),
    ))
}
