//! Configuration schema types
//!
//! This module defines the configuration structure for snapshot-sender. Every
//! section validates itself; [`SenderConfig::validate`] runs them all.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Deserializer, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Root configuration, mapped from the TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Per-run settings the completion decider reads
    pub run: RunConfig,

    /// Prometheus pushgateway settings
    #[serde(default)]
    pub pushgateway: PushgatewayConfig,

    /// Success indicator endpoint
    pub nifi: NifiConfig,

    /// Monitoring notification endpoint
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Export status document location
    pub export_status: ExportStatusConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SenderConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.run.validate()?;
        self.pushgateway.validate()?;
        self.nifi.validate(&self.environment)?;
        self.monitoring.validate()?;
        self.export_status.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Job name used as the pushgateway grouping key
    #[serde(default = "default_job_name")]
    pub job_name: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.job_name.trim().is_empty() {
            return Err("application.job_name cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            job_name: default_job_name(),
        }
    }
}

/// Static per-run configuration
///
/// Read once at startup and never changed while the job runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Publish a success indicator instead of checking delivery status.
    /// Accepts a TOML bool or the strings "true"/"false" in any case.
    #[serde(default, deserialize_with = "bool_or_string")]
    pub send_success_indicator: bool,

    /// Export date carried into indicator and notification payloads
    pub export_date: String,

    /// Topic the export was produced for
    #[serde(default)]
    pub topic_name: String,

    /// Correlation id shared by every collection of one export
    #[serde(default)]
    pub correlation_id: String,

    /// Reserved value marking a non-production heartbeat run
    #[serde(default = "default_heartbeat_marker")]
    pub heartbeat_marker: String,
}

impl RunConfig {
    /// True when this run is a heartbeat probe rather than a real export.
    ///
    /// Heartbeat runs are recognised by either the topic or the export date
    /// carrying the marker value. Monitoring notifications are suppressed for
    /// them; everything else about the run is unchanged.
    pub fn is_heartbeat(&self) -> bool {
        self.topic_name == self.heartbeat_marker || self.export_date == self.heartbeat_marker
    }

    fn validate(&self) -> Result<(), String> {
        if self.export_date.trim().is_empty() {
            return Err("run.export_date cannot be empty".to_string());
        }

        if self.heartbeat_marker.trim().is_empty() {
            return Err("run.heartbeat_marker cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Prometheus pushgateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushgatewayConfig {
    /// Push metrics at all; when false pushes are logged and skipped
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the pushgateway
    #[serde(default = "default_pushgateway_url")]
    pub url: String,

    /// Interval for the background push while a job runs
    #[serde(default = "default_push_interval_seconds")]
    pub push_interval_seconds: u64,

    /// Request timeout in seconds
    #[serde(default = "default_pushgateway_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Basic auth username (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password (optional)
    #[serde(default)]
    pub password: Option<SecretString>,
}

impl PushgatewayConfig {
    fn validate(&self) -> Result<(), String> {
        // The periodic push task runs whether or not pushes are enabled.
        if self.push_interval_seconds == 0 {
            return Err("pushgateway.push_interval_seconds must be > 0".to_string());
        }

        if !self.enabled {
            return Ok(());
        }

        validate_http_url("pushgateway.url", &self.url)?;

        if self.username.is_some() != self.password.is_some() {
            return Err(
                "pushgateway.username and pushgateway.password must be set together".to_string(),
            );
        }

        if let Some(password) = &self.password {
            if password.expose_secret().is_empty() {
                return Err("pushgateway.password cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

impl Default for PushgatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_pushgateway_url(),
            push_interval_seconds: default_push_interval_seconds(),
            timeout_seconds: default_pushgateway_timeout_seconds(),
            username: None,
            password: None,
        }
    }
}

/// NiFi endpoint receiving success indicators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NifiConfig {
    /// Full URL indicators are posted to
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_nifi_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Must stay `true` in production (enforced by validation).
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl NifiConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        validate_http_url("nifi.url", &self.url)?;

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'nifi.tls_verify = true' or use environment = \"development\"."
                    .to_string(),
            );
        }

        Ok(())
    }
}

/// Monitoring notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Send notifications at all; when false they are logged and skipped
    #[serde(default)]
    pub enabled: bool,

    /// Webhook URL notifications are posted to (required when enabled)
    #[serde(default)]
    pub url: Option<String>,

    /// Bearer token (optional)
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Display name attached to each notification
    #[serde(default = "default_slack_username")]
    pub slack_username: String,

    /// Request timeout in seconds
    #[serde(default = "default_monitoring_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        match &self.url {
            Some(url) => validate_http_url("monitoring.url", url),
            None => Err("monitoring.url is required when monitoring is enabled".to_string()),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            token: None,
            slack_username: default_slack_username(),
            timeout_seconds: default_monitoring_timeout_seconds(),
        }
    }
}

/// Location of the export status document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStatusConfig {
    /// Path to the JSON status document
    pub path: String,
}

impl ExportStatusConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("export_status.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let parsed =
        url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL ({value}): {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("{field} must start with http:// or https://"));
    }

    Ok(())
}

/// Parses a boolean flag given as text, ignoring case and surrounding space
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Accepts a TOML bool or the strings "true"/"false" in any case
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => parse_flag(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("expected \"true\" or \"false\", got \"{s}\""))
        }),
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_job_name() -> String {
    "snapshot-sender".to_string()
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_heartbeat_marker() -> String {
    "NIFI_HEARTBEAT".to_string()
}

fn default_pushgateway_url() -> String {
    "http://localhost:9091".to_string()
}

fn default_push_interval_seconds() -> u64 {
    60
}

fn default_pushgateway_timeout_seconds() -> u64 {
    10
}

fn default_nifi_timeout_seconds() -> u64 {
    30
}

fn default_slack_username() -> String {
    "Snapshot Sender".to_string()
}

fn default_monitoring_timeout_seconds() -> u64 {
    10
}

fn default_local_path() -> String {
    "/var/log/snapshot-sender".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn run_config() -> RunConfig {
        RunConfig {
            send_success_indicator: false,
            export_date: "2024-01-31".to_string(),
            topic_name: "db.core.toDo".to_string(),
            correlation_id: "export-1".to_string(),
            heartbeat_marker: default_heartbeat_marker(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_level = "debug".to_string();
        config.job_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_config_heartbeat_by_topic() {
        let mut config = run_config();
        assert!(!config.is_heartbeat());

        config.topic_name = "NIFI_HEARTBEAT".to_string();
        assert!(config.is_heartbeat());
    }

    #[test]
    fn test_run_config_heartbeat_by_export_date() {
        let mut config = run_config();
        config.export_date = "NIFI_HEARTBEAT".to_string();
        assert!(config.is_heartbeat());
    }

    #[test]
    fn test_run_config_custom_heartbeat_marker() {
        let mut config = run_config();
        config.heartbeat_marker = "PROBE".to_string();
        config.topic_name = "NIFI_HEARTBEAT".to_string();
        assert!(!config.is_heartbeat());

        config.topic_name = "PROBE".to_string();
        assert!(config.is_heartbeat());
    }

    #[test]
    fn test_run_config_validation() {
        let mut config = run_config();
        assert!(config.validate().is_ok());

        config.export_date = String::new();
        assert!(config.validate().is_err());

        config.export_date = "2024-01-31".to_string();
        config.heartbeat_marker = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_send_success_indicator_accepts_string_and_bool() {
        let config: RunConfig = toml::from_str(
            r#"
send_success_indicator = "true"
export_date = "2024-01-31"
"#,
        )
        .unwrap();
        assert!(config.send_success_indicator);

        let config: RunConfig = toml::from_str(
            r#"
send_success_indicator = false
export_date = "2024-01-31"
"#,
        )
        .unwrap();
        assert!(!config.send_success_indicator);

        let config: RunConfig = toml::from_str(
            r#"
send_success_indicator = " TRUE "
export_date = "2024-01-31"
"#,
        )
        .unwrap();
        assert!(config.send_success_indicator);

        let config: RunConfig = toml::from_str(
            r#"
send_success_indicator = "False"
export_date = "2024-01-31"
"#,
        )
        .unwrap();
        assert!(!config.send_success_indicator);

        let result: Result<RunConfig, _> = toml::from_str(
            r#"
send_success_indicator = "yes"
export_date = "2024-01-31"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_run_config_defaults() {
        let config: RunConfig = toml::from_str(r#"export_date = "2024-01-31""#).unwrap();
        assert!(!config.send_success_indicator);
        assert_eq!(config.topic_name, "");
        assert_eq!(config.heartbeat_marker, "NIFI_HEARTBEAT");
    }

    #[test]
    fn test_pushgateway_config_validation() {
        let mut config = PushgatewayConfig::default();
        assert!(config.validate().is_ok());

        config.url = "pushgateway:9091".to_string();
        assert!(config.validate().is_err());

        config.url = "http://pushgateway:9091".to_string();
        config.push_interval_seconds = 0;
        assert!(config.validate().is_err());

        config.push_interval_seconds = 30;
        config.username = Some("metrics".to_string());
        assert!(config.validate().is_err());

        config.password = Some(secret_string(String::new()));
        assert!(config.validate().is_err());

        config.password = Some(secret_string("secret".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pushgateway_disabled_still_requires_push_interval() {
        let config: PushgatewayConfig = toml::from_str(
            r#"
enabled = false
push_interval_seconds = 0
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.contains("push_interval_seconds"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" FALSE\n"), Some(false));
        assert_eq!(parse_flag("yes"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_pushgateway_disabled_skips_validation() {
        let config = PushgatewayConfig {
            enabled: false,
            url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nifi_tls_verification_in_production() {
        let mut config = NifiConfig {
            url: "https://nifi:8091/collection".to_string(),
            timeout_seconds: 30,
            tls_verify: false,
        };

        let result = config.validate(&Environment::Production);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .contains("TLS certificate verification cannot be disabled in production"));

        assert!(config.validate(&Environment::Development).is_ok());
        assert!(config.validate(&Environment::Staging).is_ok());

        config.tls_verify = true;
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_monitoring_config_requires_url_when_enabled() {
        let mut config = MonitoringConfig::default();
        assert!(!config.enabled);
        assert!(config.validate().is_ok());

        config.enabled = true;
        assert!(config.validate().is_err());

        config.url = Some("https://monitoring.example.com/notify".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "/var/log/snapshot-sender");
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_names() {
        assert_eq!(Environment::Production.as_str(), "production");
        assert_eq!(Environment::default(), Environment::Development);
    }
}
