//! Success indicator publisher for the NiFi collection endpoint
//!
//! The indicator is an empty body; everything NiFi needs to route it travels
//! in headers.

use crate::config::{Environment, NifiConfig, RunConfig};
use crate::core::collaborators::SuccessIndicatorPublisher;
use crate::domain::{PublishError, Result, SenderError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Publishes `_{topic}_successful.gz` to NiFi
pub struct NifiSuccessPublisher {
    client: Client,
    url: String,
    headers: IndicatorHeaders,
}

/// Header values attached to every indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorHeaders {
    pub filename: String,
    pub export_date: String,
    pub topic: String,
    pub correlation_id: String,
    pub environment: String,
}

impl IndicatorHeaders {
    pub fn new(run: &RunConfig, environment: &Environment) -> Self {
        Self {
            filename: indicator_filename(&run.topic_name),
            export_date: run.export_date.clone(),
            topic: run.topic_name.clone(),
            correlation_id: run.correlation_id.clone(),
            environment: environment.as_str().to_string(),
        }
    }
}

/// Name of the indicator file for `topic`
pub fn indicator_filename(topic: &str) -> String {
    format!("_{topic}_successful.gz")
}

impl NifiSuccessPublisher {
    /// Creates a new publisher
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &NifiConfig, run: &RunConfig, environment: &Environment) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            SenderError::Configuration(format!("Failed to build NiFi client: {e}"))
        })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            headers: IndicatorHeaders::new(run, environment),
        })
    }
}

#[async_trait]
impl SuccessIndicatorPublisher for NifiSuccessPublisher {
    async fn publish(&self) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header("filename", &self.headers.filename)
            .header("export_date", &self.headers.export_date)
            .header("topic", &self.headers.topic)
            .header("correlation_id", &self.headers.correlation_id)
            .header("environment", &self.headers.environment)
            .body(Vec::<u8>::new())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PublishError::Timeout(format!("{}: {e}", self.url))
                } else {
                    PublishError::ConnectionFailed(format!("{}: {e}", self.url))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        tracing::info!(
            filename = %self.headers.filename,
            topic = %self.headers.topic,
            "Published success indicator"
        );
        Ok(())
    }
}
