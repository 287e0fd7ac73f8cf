//! File-backed export status reporter

use super::models::{classify_collection, classify_sending, StatusDocument};
use crate::config::ExportStatusConfig;
use crate::core::collaborators::ExportStatusReporter;
use crate::domain::{CollectionStatus, Result, SendingCompletionStatus, SenderError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the status document from disk on every query
pub struct FileStatusReporter {
    path: PathBuf,
    topic: String,
}

impl FileStatusReporter {
    pub fn new(path: impl Into<PathBuf>, topic: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            topic: topic.into(),
        }
    }

    pub fn from_config(config: &ExportStatusConfig, topic: &str) -> Self {
        Self::new(&config.path, topic)
    }

    async fn load(&self) -> Result<StatusDocument> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SenderError::Status(format!(
                "Failed to read status document {}: {e}",
                self.path.display()
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SenderError::Status(format!(
                "Invalid status document {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl ExportStatusReporter for FileStatusReporter {
    async fn current_collection_status(&self) -> Result<CollectionStatus> {
        let document = self.load().await?;
        let record = document.collection(&self.topic).ok_or_else(|| {
            SenderError::Status(format!("No status record for topic '{}'", self.topic))
        })?;

        let status = classify_collection(record);
        tracing::debug!(
            topic = %self.topic,
            files_exported = record.files_exported,
            files_sent = record.files_sent,
            status = %status,
            "Collection status"
        );
        Ok(status)
    }

    async fn current_sending_status(&self) -> Result<SendingCompletionStatus> {
        let document = self.load().await?;
        let status = classify_sending(&document.collections);
        tracing::debug!(
            collections = document.collections.len(),
            status = %status,
            complete = status.is_complete(),
            "Sending status"
        );
        Ok(status)
    }
}
