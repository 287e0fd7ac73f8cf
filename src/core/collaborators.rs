//! Interfaces the completion decider drives
//!
//! Each trait is a seam onto an externally owned subsystem. The decider only
//! decides *whether* to call them; concrete implementations live in
//! [`crate::metrics`] and [`crate::adapters`].

use crate::domain::{CollectionStatus, Result, SendingCompletionStatus};
use async_trait::async_trait;

/// In-flight job gauge plus the push of current metric values
#[async_trait]
pub trait RunningJobTracker: Send + Sync {
    /// Adds one running job
    fn increment(&self);

    /// Removes one running job
    fn decrement(&self);

    /// Pushes current values while the job is running
    async fn push_metrics(&self) -> Result<()>;

    /// Pushes values once the job has terminated
    async fn push_final_metrics(&self) -> Result<()>;
}

/// Reports how far the export and its delivery got
///
/// Implementations must compute a fresh answer on every call.
#[async_trait]
pub trait ExportStatusReporter: Send + Sync {
    async fn current_collection_status(&self) -> Result<CollectionStatus>;

    async fn current_sending_status(&self) -> Result<SendingCompletionStatus>;
}

/// Marks the export as complete and trustworthy for downstream consumers
#[async_trait]
pub trait SuccessIndicatorPublisher: Send + Sync {
    async fn publish(&self) -> Result<()>;
}

/// Reports the delivery outcome to an external monitoring channel
#[async_trait]
pub trait MonitoringNotifier: Send + Sync {
    async fn notify(&self, status: SendingCompletionStatus) -> Result<()>;
}
