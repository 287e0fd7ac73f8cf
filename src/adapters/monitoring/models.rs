//! Monitoring notification payload

use crate::config::RunConfig;
use crate::domain::SendingCompletionStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    Information,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomElement {
    pub key: String,
    pub value: String,
}

impl CustomElement {
    fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Body posted to the monitoring webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringPayload {
    pub severity: Severity,
    pub notification_type: NotificationType,
    pub slack_username: String,
    pub title_text: String,
    pub custom_elements: Vec<CustomElement>,
}

impl MonitoringPayload {
    /// Builds the payload for a completed delivery
    ///
    /// Returns `None` for [`SendingCompletionStatus::NotCompleted`], which is
    /// never reported.
    pub fn for_status(
        status: SendingCompletionStatus,
        run: &RunConfig,
        slack_username: &str,
    ) -> Option<Self> {
        let (severity, notification_type, title_text) = match status {
            SendingCompletionStatus::CompletedSuccessfully => {
                (Severity::Critical, NotificationType::Information, "All files sent")
            }
            SendingCompletionStatus::CompletedUnsuccessfully => (
                Severity::High,
                NotificationType::Warning,
                "Some files failed to send",
            ),
            SendingCompletionStatus::NotCompleted => return None,
        };

        Some(Self {
            severity,
            notification_type,
            slack_username: slack_username.to_string(),
            title_text: title_text.to_string(),
            custom_elements: vec![
                CustomElement::new("Export date", &run.export_date),
                CustomElement::new("Topic", &run.topic_name),
                CustomElement::new("Correlation Id", &run.correlation_id),
            ],
        })
    }
}
