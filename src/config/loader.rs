//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{parse_flag, SenderConfig};
use super::secret::secret_string;
use crate::domain::errors::SenderError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Process environment variables the topic name is read from, in order
const TOPIC_ENV_VARS: [&str; 2] = ["TOPIC_NAME", "topic_name"];

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into [`SenderConfig`]
/// 4. Applies environment variable overrides (SNAPSHOT_SENDER_* prefix, plus
///    `TOPIC_NAME` for the run topic)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SenderError::Configuration`] if any step fails. Configuration
/// errors are fatal at startup.
///
/// # Examples
///
/// ```no_run
/// use snapshot_sender::config::load_config;
///
/// let config = load_config("snapshot-sender.toml").expect("Failed to load config");
/// println!("export date: {}", config.run.export_date);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SenderConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SenderError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SenderError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SenderConfig = toml::from_str(&contents)
        .map_err(|e| SenderError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SenderError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| SenderError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SenderError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// Variables follow the pattern SNAPSHOT_SENDER_<SECTION>_<KEY>, for example
/// SNAPSHOT_SENDER_RUN_EXPORT_DATE. The run topic is additionally taken from
/// `TOPIC_NAME` (or `topic_name`) since the export job publishes it there.
///
/// # Errors
///
/// Returns [`SenderError::Configuration`] when a boolean override is not
/// "true" or "false"
fn apply_env_overrides(config: &mut SenderConfig) -> Result<()> {
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_APPLICATION_JOB_NAME") {
        config.application.job_name = val;
    }

    // Run overrides
    if let Some(flag) = env_flag("SNAPSHOT_SENDER_RUN_SEND_SUCCESS_INDICATOR")? {
        config.run.send_success_indicator = flag;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_RUN_EXPORT_DATE") {
        config.run.export_date = val;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_RUN_CORRELATION_ID") {
        config.run.correlation_id = val;
    }
    if let Some(topic) = TOPIC_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok())
    {
        config.run.topic_name = topic;
    }

    // Pushgateway overrides
    if let Some(flag) = env_flag("SNAPSHOT_SENDER_PUSHGATEWAY_ENABLED")? {
        config.pushgateway.enabled = flag;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_PUSHGATEWAY_URL") {
        config.pushgateway.url = val;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_PUSHGATEWAY_PASSWORD") {
        config.pushgateway.password = Some(secret_string(val));
    }

    // NiFi overrides
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_NIFI_URL") {
        config.nifi.url = val;
    }

    // Monitoring overrides
    if let Some(flag) = env_flag("SNAPSHOT_SENDER_MONITORING_ENABLED")? {
        config.monitoring.enabled = flag;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_MONITORING_URL") {
        config.monitoring.url = Some(val);
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_MONITORING_TOKEN") {
        config.monitoring.token = Some(secret_string(val));
    }

    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_EXPORT_STATUS_PATH") {
        config.export_status.path = val;
    }

    // Logging overrides
    if let Some(flag) = env_flag("SNAPSHOT_SENDER_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = flag;
    }
    if let Ok(val) = std::env::var("SNAPSHOT_SENDER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Reads a boolean override, failing on anything but "true" or "false"
fn env_flag(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(val) => parse_flag(&val).map(Some).ok_or_else(|| {
            SenderError::Configuration(format!(
                "{name} must be \"true\" or \"false\", got \"{val}\""
            ))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOADER_TEST_TOKEN", "token_value");
        let input = "token = \"${LOADER_TEST_TOKEN}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "token = \"token_value\"\n");
        std::env::remove_var("LOADER_TEST_TOKEN");
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LOADER_TEST_COMMENTED");
        let input = "# token = \"${LOADER_TEST_COMMENTED}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${LOADER_TEST_COMMENTED}"));
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOADER_TEST_MISSING");
        let input = "password = \"${LOADER_TEST_MISSING}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("LOADER_TEST_MISSING"));
    }

    #[test]
    fn test_env_flag() {
        std::env::set_var("LOADER_TEST_FLAG", "TRUE");
        assert_eq!(env_flag("LOADER_TEST_FLAG").unwrap(), Some(true));

        std::env::set_var("LOADER_TEST_FLAG", "no");
        let err = env_flag("LOADER_TEST_FLAG").unwrap_err();
        assert!(err.to_string().contains("LOADER_TEST_FLAG"));

        std::env::remove_var("LOADER_TEST_FLAG");
        assert_eq!(env_flag("LOADER_TEST_FLAG").unwrap(), None);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(SenderError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[run]
send_success_indicator = "false"
export_date = "2024-01-31"
topic_name = "db.core.claimant"

[pushgateway]
url = "http://pushgateway:9091"

[nifi]
url = "https://nifi:8091/collection"

[export_status]
path = "/tmp/status.json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.run.export_date, "2024-01-31");
        assert!(!config.run.send_success_indicator);
        assert_eq!(config.nifi.url, "https://nifi:8091/collection");
        assert_eq!(config.application.job_name, "snapshot-sender");
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
[run]
export_date = ""

[nifi]
url = "https://nifi:8091/collection"

[export_status]
path = "/tmp/status.json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("run.export_date"));
    }
}
