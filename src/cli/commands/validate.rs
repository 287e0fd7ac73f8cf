//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Job Name: {}", config.application.job_name);
        println!("  Environment: {}", config.environment.as_str());
        println!("  Log Level: {}", config.application.log_level);
        println!("  Topic: {}", config.run.topic_name);
        println!("  Export Date: {}", config.run.export_date);
        println!(
            "  Success Indicator Mode: {}",
            config.run.send_success_indicator
        );
        if config.run.is_heartbeat() {
            println!("  Heartbeat Run: notifications will be suppressed");
        }
        if config.pushgateway.enabled {
            println!("  Pushgateway: {}", config.pushgateway.url);
        } else {
            println!("  Pushgateway: disabled");
        }
        println!("  NiFi: {}", config.nifi.url);
        match (&config.monitoring.url, config.monitoring.enabled) {
            (Some(url), true) => println!("  Monitoring: {url}"),
            _ => println!("  Monitoring: disabled"),
        }
        println!("  Status Document: {}", config.export_status.path);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[run]
export_date = "2020-12-25"
topic_name = "db.core.toDo"

[nifi]
url = "http://localhost:8091/collection"

[export_status]
path = "/tmp/status.json"
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_missing_config_exits_two() {
        let code = ValidateArgs {}
            .execute("/nonexistent/snapshot-sender.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
