//! Prometheus pushgateway client
//!
//! Batch jobs are too short-lived to be scraped, so the current registry is
//! pushed to a pushgateway instead. Pushes use `POST`, which replaces only the
//! metrics with matching names inside the grouping key.

use super::registry::JobMetrics;
use crate::config::PushgatewayConfig;
use crate::core::collaborators::RunningJobTracker;
use crate::domain::{Result, SenderError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{header, Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// [`RunningJobTracker`] backed by the shared [`JobMetrics`] gauge and a
/// pushgateway
pub struct PushgatewayTracker {
    metrics: Arc<JobMetrics>,
    client: Client,
    config: PushgatewayConfig,
    push_url: Url,
}

impl PushgatewayTracker {
    /// Creates a tracker pushing under `job_name` and the given grouping labels
    ///
    /// Labels with empty values are dropped since the pushgateway cannot
    /// address them by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(
        config: PushgatewayConfig,
        metrics: Arc<JobMetrics>,
        job_name: &str,
        grouping: &[(&str, &str)],
    ) -> Result<Self> {
        let push_url = grouping_url(&config.url, job_name, grouping)?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                SenderError::Configuration(format!("Failed to build pushgateway client: {e}"))
            })?;

        Ok(Self {
            metrics,
            client,
            config,
            push_url,
        })
    }

    /// URL the registry is pushed to
    pub fn push_url(&self) -> &Url {
        &self.push_url
    }

    fn auth_header_value(&self) -> Option<String> {
        match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => {
                let credentials = format!("{username}:{}", password.expose_secret());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            _ => None,
        }
    }

    async fn push(&self, phase: &'static str) -> Result<()> {
        if !self.config.enabled {
            tracing::debug!(phase, "Pushgateway disabled, skipping metrics push");
            return Ok(());
        }

        let (body, content_type) = self.metrics.encode()?;

        let mut request = self
            .client
            .post(self.push_url.clone())
            .header(header::CONTENT_TYPE, content_type)
            .body(body);

        if let Some(auth) = self.auth_header_value() {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = request.send().await.map_err(|e| {
            SenderError::Metrics(format!("Failed to push metrics to {}: {e}", self.push_url))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SenderError::Metrics(format!(
                "Pushgateway rejected {phase} push with status {status}: {body}"
            )));
        }

        tracing::debug!(
            phase,
            url = %self.push_url,
            running_applications = self.metrics.running_applications.get(),
            "Pushed metrics"
        );

        Ok(())
    }
}

#[async_trait]
impl RunningJobTracker for PushgatewayTracker {
    fn increment(&self) {
        self.metrics.running_applications.inc();
    }

    fn decrement(&self) {
        self.metrics.running_applications.dec();
    }

    async fn push_metrics(&self) -> Result<()> {
        self.push("running").await
    }

    async fn push_final_metrics(&self) -> Result<()> {
        self.push("final").await
    }
}

/// Builds `{base}/metrics/job/{job}/{label}/{value}...`
fn grouping_url(base: &str, job_name: &str, grouping: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| {
        SenderError::Configuration(format!("Invalid pushgateway url '{base}': {e}"))
    })?;

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            SenderError::Configuration(format!("Pushgateway url '{base}' cannot be a base"))
        })?;
        segments.pop_if_empty().extend(["metrics", "job", job_name]);
        for (label, value) in grouping.iter().filter(|(_, value)| !value.is_empty()) {
            segments.extend([*label, *value]);
        }
    }

    Ok(url)
}
