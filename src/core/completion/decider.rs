//! The completion decider
//!
//! Maps (job outcome, collection status, sending status, run flags) to the
//! side effects of a finished export. Every collaborator call is awaited in
//! turn and its failure is logged, never propagated: the decider always
//! balances the running-job gauge and always pushes metrics.

use super::decision::{
    CompletionBranch, CompletionDecision, IndicatorAction, NotificationAction,
};
use crate::config::RunConfig;
use crate::core::collaborators::{
    ExportStatusReporter, MonitoringNotifier, RunningJobTracker, SuccessIndicatorPublisher,
};
use crate::domain::{CollectionStatus, JobOutcome, SendingCompletionStatus};
use crate::metrics::{FailureCounter, FailureCounters};
use crate::{log_collaborator_failure, log_job_end, log_job_start};
use std::sync::Arc;

/// Lifecycle hook for a batch export job
pub struct CompletionDecider {
    run: RunConfig,
    tracker: Arc<dyn RunningJobTracker>,
    status: Arc<dyn ExportStatusReporter>,
    publisher: Arc<dyn SuccessIndicatorPublisher>,
    notifier: Arc<dyn MonitoringNotifier>,
    counters: FailureCounters,
}

impl CompletionDecider {
    pub fn new(
        run: RunConfig,
        tracker: Arc<dyn RunningJobTracker>,
        status: Arc<dyn ExportStatusReporter>,
        publisher: Arc<dyn SuccessIndicatorPublisher>,
        notifier: Arc<dyn MonitoringNotifier>,
        counters: FailureCounters,
    ) -> Self {
        Self {
            run,
            tracker,
            status,
            publisher,
            notifier,
            counters,
        }
    }

    /// Records that a run is in progress
    ///
    /// Increments the running-job gauge and pushes current metrics. Nothing
    /// else is touched.
    pub async fn on_start(&self) {
        log_job_start!(&self.run.topic_name, &self.run.export_date);

        self.tracker.increment();
        if let Err(e) = self.tracker.push_metrics().await {
            log_collaborator_failure!("push_metrics", &e);
        }
    }

    /// Handles job termination
    ///
    /// Not memoized: calling it twice re-runs the branch, including the
    /// gauge decrement.
    pub async fn on_end(&self, outcome: JobOutcome) -> CompletionDecision {
        self.tracker.decrement();

        let mut decision = match outcome {
            JobOutcome::Completed if self.run.send_success_indicator => {
                self.publish_indicator(outcome).await
            }
            JobOutcome::Completed => self.check_delivery(outcome).await,
            // Any non-success value, recognised or not, takes the failure
            // branch so the gauge stays balanced.
            JobOutcome::Unknown
            | JobOutcome::Executing
            | JobOutcome::NoOp
            | JobOutcome::Failed
            | JobOutcome::Stopped => self.record_failure(outcome),
        };

        decision.final_push_succeeded = match self.tracker.push_final_metrics().await {
            Ok(()) => true,
            Err(e) => {
                log_collaborator_failure!("push_final_metrics", &e);
                false
            }
        };

        log_job_end!(outcome, decision.branch);
        decision.log();
        decision
    }

    fn record_failure(&self, outcome: JobOutcome) -> CompletionDecision {
        let counter = if self.run.send_success_indicator {
            FailureCounter::FailedSuccessFiles
        } else {
            FailureCounter::FailedFiles
        };
        self.count(counter);

        let mut decision = CompletionDecision::new(outcome, CompletionBranch::JobFailed);
        decision.counter = Some(counter);
        decision
    }

    async fn publish_indicator(&self, outcome: JobOutcome) -> CompletionDecision {
        let mut decision = CompletionDecision::new(outcome, CompletionBranch::IndicatorMode);
        decision.indicator = self.publish().await;
        decision
    }

    async fn check_delivery(&self, outcome: JobOutcome) -> CompletionDecision {
        let mut decision = CompletionDecision::new(outcome, CompletionBranch::DeliveryCheck);

        // An empty export still has to signal completion downstream.
        match self.status.current_collection_status().await {
            Ok(status) => {
                decision.collection_status = Some(status);
                if status == CollectionStatus::NoFilesExported {
                    decision.indicator = self.publish().await;
                }
            }
            Err(e) => {
                log_collaborator_failure!("current_collection_status", &e);
            }
        }

        match self.status.current_sending_status().await {
            Ok(status) => {
                decision.sending_status = Some(status);
                match status {
                    SendingCompletionStatus::NotCompleted => {}
                    SendingCompletionStatus::CompletedSuccessfully => {
                        decision.notification = self.notify(status).await;
                    }
                    SendingCompletionStatus::CompletedUnsuccessfully => {
                        self.count(FailureCounter::FailedCollections);
                        decision.counter = Some(FailureCounter::FailedCollections);
                        decision.notification = self.notify(status).await;
                    }
                }
            }
            Err(e) => {
                log_collaborator_failure!("current_sending_status", &e);
            }
        }

        decision
    }

    fn count(&self, counter: FailureCounter) {
        self.counters.increment(counter);
        tracing::info!(
            counter = %counter,
            total = self.counters.get(counter),
            "Failure counter incremented"
        );
    }

    async fn publish(&self) -> IndicatorAction {
        match self.publisher.publish().await {
            Ok(()) => IndicatorAction::Published,
            Err(e) => {
                log_collaborator_failure!("publish", &e);
                IndicatorAction::PublishFailed
            }
        }
    }

    async fn notify(&self, status: SendingCompletionStatus) -> NotificationAction {
        if self.run.is_heartbeat() {
            tracing::info!(
                sending_status = %status,
                "Heartbeat run, suppressing monitoring notification"
            );
            return NotificationAction::SuppressedHeartbeat(status);
        }

        match self.notifier.notify(status).await {
            Ok(()) => NotificationAction::Sent(status),
            Err(e) => {
                log_collaborator_failure!("notify", &e);
                NotificationAction::Failed(status)
            }
        }
    }
}
