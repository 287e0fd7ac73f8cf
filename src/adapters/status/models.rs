//! Export status document and its classification rules

use crate::domain::{CollectionStatus, SendingCompletionStatus};
use serde::{Deserialize, Serialize};

/// Status document written by the export pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub collections: Vec<CollectionRecord>,
}

impl StatusDocument {
    /// Finds the record for `topic`
    pub fn collection(&self, topic: &str) -> Option<&CollectionRecord> {
        self.collections.iter().find(|c| c.topic == topic)
    }
}

/// Progress of a single collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub topic: String,
    #[serde(default)]
    pub files_exported: u64,
    #[serde(default)]
    pub files_received: u64,
    #[serde(default)]
    pub files_sent: u64,
    pub status: CollectionState,
}

/// Lifecycle state recorded for a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionState {
    Exporting,
    Exported,
    Sent,
    Received,
    Success,
    #[serde(rename = "No_Files_Exported")]
    NoFilesExported,
    #[serde(rename = "Export_Failed")]
    ExportFailed,
    #[serde(rename = "Blocked_Topic")]
    BlockedTopic,
    #[serde(rename = "Table_Unavailable")]
    TableUnavailable,
    /// Any state this version does not know; never terminal
    #[serde(other)]
    Unrecognized,
}

impl CollectionState {
    /// No further progress is expected
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CollectionState::Sent
                | CollectionState::Received
                | CollectionState::Success
                | CollectionState::NoFilesExported
                | CollectionState::ExportFailed
                | CollectionState::BlockedTopic
                | CollectionState::TableUnavailable
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CollectionState::ExportFailed
                | CollectionState::BlockedTopic
                | CollectionState::TableUnavailable
        )
    }
}

/// Export-side status of one collection
pub fn classify_collection(record: &CollectionRecord) -> CollectionStatus {
    if record.files_exported == 0 {
        CollectionStatus::NoFilesExported
    } else if record.files_sent >= record.files_exported {
        CollectionStatus::Sent
    } else {
        CollectionStatus::InProgress
    }
}

/// Delivery status across every collection in the export
pub fn classify_sending(records: &[CollectionRecord]) -> SendingCompletionStatus {
    if records.is_empty() || !records.iter().all(|r| r.status.is_terminal()) {
        return SendingCompletionStatus::NotCompleted;
    }

    if records.iter().any(|r| r.status.is_failure()) {
        SendingCompletionStatus::CompletedUnsuccessfully
    } else {
        SendingCompletionStatus::CompletedSuccessfully
    }
}
