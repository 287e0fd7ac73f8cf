//! Monitoring notifications for finished deliveries

pub mod models;
pub mod notifier;

pub use models::{CustomElement, MonitoringPayload, NotificationType, Severity};
pub use notifier::WebhookNotifier;
