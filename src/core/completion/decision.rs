//! Record of what an `on_end` call decided and did

use crate::domain::{CollectionStatus, JobOutcome, SendingCompletionStatus};
use crate::metrics::FailureCounter;

/// Which of the three end-path branches ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBranch {
    /// The job did not complete successfully
    JobFailed,
    /// The job completed and indicator mode is on
    IndicatorMode,
    /// The job completed and delivery status decided the follow-up
    DeliveryCheck,
}

/// What happened to the success indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorAction {
    NotRequired,
    Published,
    /// Publishing was attempted and failed
    PublishFailed,
}

/// What happened to the monitoring notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    NotRequired,
    Sent(SendingCompletionStatus),
    /// Sending was attempted and failed
    Failed(SendingCompletionStatus),
    /// Heartbeat runs never notify
    SuppressedHeartbeat(SendingCompletionStatus),
}

impl NotificationAction {
    /// True when the notifier was called, whatever the result
    pub fn attempted(&self) -> bool {
        matches!(
            self,
            NotificationAction::Sent(_) | NotificationAction::Failed(_)
        )
    }
}

/// Outcome of a single `on_end` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionDecision {
    pub outcome: JobOutcome,
    pub branch: CompletionBranch,
    /// Failure counter incremented, if any
    pub counter: Option<FailureCounter>,
    pub indicator: IndicatorAction,
    pub notification: NotificationAction,
    /// Collection status as queried; `None` if not queried or the query failed
    pub collection_status: Option<CollectionStatus>,
    /// Sending status as queried; `None` if not queried or the query failed
    pub sending_status: Option<SendingCompletionStatus>,
    /// Whether the final metrics push succeeded
    pub final_push_succeeded: bool,
}

impl CompletionDecision {
    pub(crate) fn new(outcome: JobOutcome, branch: CompletionBranch) -> Self {
        Self {
            outcome,
            branch,
            counter: None,
            indicator: IndicatorAction::NotRequired,
            notification: NotificationAction::NotRequired,
            collection_status: None,
            sending_status: None,
            final_push_succeeded: false,
        }
    }

    /// True when the job itself completed successfully
    pub fn job_succeeded(&self) -> bool {
        self.outcome.is_success()
    }

    /// Log the decision
    pub fn log(&self) {
        tracing::info!(
            outcome = %self.outcome,
            branch = ?self.branch,
            counter = self.counter.map(|c| c.as_str()),
            indicator = ?self.indicator,
            notification = ?self.notification,
            notifier_called = self.notification.attempted(),
            collection_status = self.collection_status.map(|s| s.as_str()),
            sending_status = self.sending_status.map(|s| s.as_str()),
            final_push_succeeded = self.final_push_succeeded,
            "Job completion handled"
        );
    }
}
