//! End-to-end tests of the job runner with the production adapters
//!
//! The pushgateway, NiFi and monitoring endpoints are mockito servers and the
//! export status document is a temp file.

#![cfg(unix)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use snapshot_sender::cli::commands::run::build_runner;
use snapshot_sender::config::SenderConfig;
use snapshot_sender::core::completion::{CompletionBranch, IndicatorAction, NotificationAction};
use snapshot_sender::core::runner::JobCommand;
use snapshot_sender::domain::{JobOutcome, SendingCompletionStatus};
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::sync::watch;

const PUSH_PATH: &str = "/metrics/job/snapshot-sender/topic/db.core.toDo";

struct Endpoints {
    server: ServerGuard,
    status_file: NamedTempFile,
}

impl Endpoints {
    async fn new(status_document: &str) -> Self {
        let mut status_file = NamedTempFile::new().unwrap();
        status_file.write_all(status_document.as_bytes()).unwrap();
        status_file.flush().unwrap();

        Self {
            server: Server::new_async().await,
            status_file,
        }
    }

    fn config(&self, send_success_indicator: bool, export_date: &str) -> SenderConfig {
        let url = self.server.url();
        let toml = format!(
            r#"
environment = "staging"

[run]
send_success_indicator = {send_success_indicator}
export_date = "{export_date}"
topic_name = "db.core.toDo"
correlation_id = "export-1"

[pushgateway]
url = "{url}"
push_interval_seconds = 3600

[nifi]
url = "{url}/collection"

[monitoring]
enabled = true
url = "{url}/notify"

[export_status]
path = "{path}"
"#,
            path = self.status_file.path().display()
        );

        let config: SenderConfig = toml::from_str(&toml).unwrap();
        config.validate().unwrap();
        config
    }

    async fn push_mock(&mut self, metric_line: &str) -> Mock {
        self.server
            .mock("POST", PUSH_PATH)
            .match_body(Matcher::Regex(format!("(?m)^{metric_line}$")))
            .with_status(200)
            .create_async()
            .await
    }

    async fn nifi_mock(&mut self, hits: usize) -> Mock {
        self.server
            .mock("POST", "/collection")
            .match_header("filename", "_db.core.toDo_successful.gz")
            .match_header("environment", "staging")
            .with_status(200)
            .expect(hits)
            .create_async()
            .await
    }

    async fn notify_mock(&mut self, title: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", "/notify")
            .match_body(Matcher::PartialJson(
                serde_json::json!({ "title_text": title }),
            ))
            .with_status(200)
            .expect(hits)
            .create_async()
            .await
    }
}

fn command(argv: &[&str]) -> JobCommand {
    let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
    JobCommand::from_argv(&argv).unwrap()
}

const ALL_SENT: &str = r#"{"collections": [
    {"topic": "db.core.toDo", "files_exported": 3, "files_received": 3, "files_sent": 3, "status": "Sent"}
]}"#;

const NOTHING_EXPORTED: &str = r#"{"collections": [
    {"topic": "db.core.toDo", "files_exported": 0, "status": "No_Files_Exported"},
    {"topic": "db.core.claimant", "files_exported": 2, "files_sent": 2, "status": "Success"}
]}"#;

const PARTIAL_FAILURE: &str = r#"{"collections": [
    {"topic": "db.core.toDo", "files_exported": 3, "files_sent": 3, "status": "Sent"},
    {"topic": "db.core.claimant", "files_exported": 2, "files_sent": 0, "status": "Export_Failed"}
]}"#;

#[tokio::test]
async fn test_indicator_mode_publishes_and_pushes_twice() {
    let mut endpoints = Endpoints::new(ALL_SENT).await;
    let start_push = endpoints
        .push_mock("snapshot_sender_running_applications 1")
        .await;
    let final_push = endpoints
        .push_mock("snapshot_sender_running_applications 0")
        .await;
    let nifi = endpoints.nifi_mock(1).await;
    let notify = endpoints.notify_mock("All files sent", 0).await;

    let runner = build_runner(&endpoints.config(true, "2020-12-25")).unwrap();
    let (_tx, rx) = watch::channel(false);
    let summary = runner.run(&command(&["true"]), rx).await;

    assert_eq!(summary.outcome, JobOutcome::Completed);
    assert_eq!(summary.decision.branch, CompletionBranch::IndicatorMode);
    assert_eq!(summary.decision.indicator, IndicatorAction::Published);
    assert!(summary.decision.final_push_succeeded);

    start_push.assert_async().await;
    final_push.assert_async().await;
    nifi.assert_async().await;
    notify.assert_async().await;
}

#[tokio::test]
async fn test_empty_export_publishes_indicator_and_notifies() {
    let mut endpoints = Endpoints::new(NOTHING_EXPORTED).await;
    let _pushes = endpoints
        .push_mock("snapshot_sender_failed_files_total 0")
        .await;
    let nifi = endpoints.nifi_mock(1).await;
    let notify = endpoints.notify_mock("All files sent", 1).await;

    let runner = build_runner(&endpoints.config(false, "2020-12-25")).unwrap();
    let (_tx, rx) = watch::channel(false);
    let summary = runner.run(&command(&["true"]), rx).await;

    assert_eq!(summary.decision.branch, CompletionBranch::DeliveryCheck);
    assert_eq!(summary.decision.indicator, IndicatorAction::Published);
    assert_eq!(
        summary.decision.notification,
        NotificationAction::Sent(SendingCompletionStatus::CompletedSuccessfully)
    );

    nifi.assert_async().await;
    notify.assert_async().await;
}

#[tokio::test]
async fn test_partial_failure_counts_collection_and_warns() {
    let mut endpoints = Endpoints::new(PARTIAL_FAILURE).await;
    let _start_push = endpoints
        .push_mock("snapshot_sender_running_applications 1")
        .await;
    let final_push = endpoints
        .push_mock("snapshot_sender_failed_collections_total 1")
        .await;
    let nifi = endpoints.nifi_mock(0).await;
    let notify = endpoints.notify_mock("Some files failed to send", 1).await;

    let runner = build_runner(&endpoints.config(false, "2020-12-25")).unwrap();
    let (_tx, rx) = watch::channel(false);
    let summary = runner.run(&command(&["true"]), rx).await;

    assert_eq!(
        summary.decision.sending_status,
        Some(SendingCompletionStatus::CompletedUnsuccessfully)
    );

    final_push.assert_async().await;
    nifi.assert_async().await;
    notify.assert_async().await;
}

#[tokio::test]
async fn test_heartbeat_run_never_notifies() {
    let mut endpoints = Endpoints::new(PARTIAL_FAILURE).await;
    let _start_push = endpoints
        .push_mock("snapshot_sender_running_applications 1")
        .await;
    let final_push = endpoints
        .push_mock("snapshot_sender_failed_collections_total 1")
        .await;
    let notify = endpoints.notify_mock("Some files failed to send", 0).await;

    let runner = build_runner(&endpoints.config(false, "NIFI_HEARTBEAT")).unwrap();
    let (_tx, rx) = watch::channel(false);
    let summary = runner.run(&command(&["true"]), rx).await;

    assert_eq!(
        summary.decision.notification,
        NotificationAction::SuppressedHeartbeat(SendingCompletionStatus::CompletedUnsuccessfully)
    );

    final_push.assert_async().await;
    notify.assert_async().await;
}

#[tokio::test]
async fn test_failed_job_only_counts() {
    let mut endpoints = Endpoints::new(ALL_SENT).await;
    let _start_push = endpoints
        .push_mock("snapshot_sender_running_applications 1")
        .await;
    let final_push = endpoints
        .push_mock("snapshot_sender_failed_files_total 1")
        .await;
    let nifi = endpoints.nifi_mock(0).await;
    let notify = endpoints.notify_mock("All files sent", 0).await;

    let runner = build_runner(&endpoints.config(false, "2020-12-25")).unwrap();
    let (_tx, rx) = watch::channel(false);
    let summary = runner.run(&command(&["false"]), rx).await;

    assert_eq!(summary.outcome, JobOutcome::Failed);
    assert_eq!(summary.decision.branch, CompletionBranch::JobFailed);
    assert!(summary.decision.final_push_succeeded);

    final_push.assert_async().await;
    nifi.assert_async().await;
    notify.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoints_do_not_break_completion() {
    let status_file = {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(NOTHING_EXPORTED.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    };
    let toml = format!(
        r#"
[run]
export_date = "2020-12-25"
topic_name = "db.core.toDo"

[pushgateway]
url = "http://127.0.0.1:1"

[nifi]
url = "http://127.0.0.1:1/collection"

[monitoring]
enabled = true
url = "http://127.0.0.1:1/notify"

[export_status]
path = "{}"
"#,
        status_file.path().display()
    );
    let config: SenderConfig = toml::from_str(&toml).unwrap();

    let runner = build_runner(&config).unwrap();
    let (_tx, rx) = watch::channel(false);
    let summary = runner.run(&command(&["true"]), rx).await;

    assert_eq!(summary.outcome, JobOutcome::Completed);
    assert_eq!(summary.decision.indicator, IndicatorAction::PublishFailed);
    assert_eq!(
        summary.decision.notification,
        NotificationAction::Failed(SendingCompletionStatus::CompletedSuccessfully)
    );
    assert!(!summary.decision.final_push_succeeded);
}
