//! Webhook-based monitoring notifier

use super::models::MonitoringPayload;
use crate::config::{MonitoringConfig, RunConfig};
use crate::core::collaborators::MonitoringNotifier;
use crate::domain::{Result, SenderError, SendingCompletionStatus};
use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Posts a [`MonitoringPayload`] as JSON to the configured webhook
pub struct WebhookNotifier {
    client: Client,
    config: MonitoringConfig,
    run: RunConfig,
}

impl WebhookNotifier {
    /// Creates a new notifier
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: MonitoringConfig, run: RunConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                SenderError::Configuration(format!("Failed to build monitoring client: {e}"))
            })?;

        Ok(Self { client, config, run })
    }
}

#[async_trait]
impl MonitoringNotifier for WebhookNotifier {
    async fn notify(&self, status: SendingCompletionStatus) -> Result<()> {
        if !self.config.enabled {
            tracing::debug!(status = %status, "Monitoring disabled, skipping notification");
            return Ok(());
        }

        let url = self.config.url.as_deref().ok_or_else(|| {
            SenderError::Configuration("monitoring.url is not configured".to_string())
        })?;

        let Some(payload) =
            MonitoringPayload::for_status(status, &self.run, &self.config.slack_username)
        else {
            tracing::debug!(status = %status, "No notification for status");
            return Ok(());
        };

        let mut request = self.client.post(url).json(&payload);
        if let Some(token) = &self.config.token {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request
            .send()
            .await
            .map_err(|e| SenderError::Notification(format!("Failed to reach {url}: {e}")))?;

        let code = response.status();
        if !code.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SenderError::Notification(format!(
                "Monitoring webhook returned {code}: {body}"
            )));
        }

        tracing::info!(
            status = %status,
            title = %payload.title_text,
            "Sent monitoring notification"
        );
        Ok(())
    }
}
