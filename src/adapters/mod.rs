//! External system integrations
//!
//! Concrete implementations of the collaborator traits in
//! [`crate::core::collaborators`]:
//!
//! - [`status`] - export status document ([`ExportStatusReporter`](crate::core::collaborators::ExportStatusReporter))
//! - [`nifi`] - success indicator ([`SuccessIndicatorPublisher`](crate::core::collaborators::SuccessIndicatorPublisher))
//! - [`monitoring`] - delivery notifications ([`MonitoringNotifier`](crate::core::collaborators::MonitoringNotifier))
//!
//! The running-job tracker lives in [`crate::metrics`].
//!
//! # Example
//!
//! ```rust,no_run
//! use snapshot_sender::adapters::nifi::NifiSuccessPublisher;
//! use snapshot_sender::config::load_config;
//! use snapshot_sender::core::collaborators::SuccessIndicatorPublisher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("snapshot-sender.toml")?;
//! let publisher = NifiSuccessPublisher::new(&config.nifi, &config.run, &config.environment)?;
//! publisher.publish().await?;
//! # Ok(())
//! # }
//! ```

pub mod monitoring;
pub mod nifi;
pub mod status;
