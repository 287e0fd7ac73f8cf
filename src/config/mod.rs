//! Configuration management for snapshot-sender.
//!
//! Configuration is a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Overrides from `SNAPSHOT_SENDER_<SECTION>_<KEY>` variables
//! - The run topic taken from `TOPIC_NAME`
//! - Default values for optional settings and validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and pushgateway job name
//! - [`RunConfig`] - per-run flags read by the completion decider
//! - [`PushgatewayConfig`] - where metrics are pushed
//! - [`NifiConfig`] - where success indicators are posted
//! - [`MonitoringConfig`] - where delivery notifications are posted
//! - [`ExportStatusConfig`] - where the export status document lives
//! - [`LoggingConfig`] - local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [run]
//! send_success_indicator = false
//! export_date = "2024-01-31"
//! correlation_id = "${EXPORT_CORRELATION_ID}"
//!
//! [pushgateway]
//! url = "http://pushgateway:9091"
//!
//! [nifi]
//! url = "https://nifi:8091/collection"
//!
//! [monitoring]
//! enabled = true
//! url = "https://monitoring.example.com/notify"
//! token = "${MONITORING_TOKEN}"
//!
//! [export_status]
//! path = "/var/lib/snapshot-sender/status.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Environment, ExportStatusConfig, LoggingConfig, MonitoringConfig,
    NifiConfig, PushgatewayConfig, RunConfig, SenderConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
