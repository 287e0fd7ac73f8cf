//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "snapshot-sender.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your endpoints", self.output);
                println!("  2. Set SNAPSHOT_SENDER_MONITORING_TOKEN in .env if the webhook needs one");
                println!("  3. Validate configuration: snapshot-sender validate-config");
                println!("  4. Host a job: snapshot-sender run -- ./export.sh");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn generate_config() -> String {
        r#"# Snapshot Sender Configuration File

# development | staging | production
environment = "development"

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"
# Pushgateway job name
job_name = "snapshot-sender"

[run]
# Publish the success indicator instead of checking delivery status
send_success_indicator = false
export_date = "2024-01-31"
topic_name = "db.core.toDo"
correlation_id = "export-1"
# Runs whose topic or export date equal this value never notify monitoring
heartbeat_marker = "NIFI_HEARTBEAT"

[pushgateway]
enabled = true
url = "http://localhost:9091"
push_interval_seconds = 60
timeout_seconds = 10
# username = "metrics"
# password = "${SNAPSHOT_SENDER_PUSHGATEWAY_PASSWORD}"

[nifi]
url = "https://nifi:8091/collection"
timeout_seconds = 30
tls_verify = true

[monitoring]
enabled = false
# url = "https://monitoring.example.com/notify"
# token = "${SNAPSHOT_SENDER_MONITORING_TOKEN}"
slack_username = "Snapshot Sender"

[export_status]
path = "/var/lib/snapshot-sender/status.json"

[logging]
local_enabled = false
local_path = "/var/log/snapshot-sender"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SenderConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_parses_and_validates() {
        let config: SenderConfig = toml::from_str(&InitArgs::generate_config()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.run.topic_name, "db.core.toDo");
        assert!(!config.monitoring.enabled);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("snapshot-sender.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let args = InitArgs {
            force: true,
            ..args
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[run]"));
    }
}
