//! Job metrics and their transport
//!
//! - [`registry`] - the running-applications gauge and failure counters
//! - [`pushgateway`] - [`PushgatewayTracker`], the production
//!   [`RunningJobTracker`](crate::core::collaborators::RunningJobTracker)
//! - [`scheduler`] - periodic push while a job runs

pub mod pushgateway;
pub mod registry;
pub mod scheduler;

pub use pushgateway::PushgatewayTracker;
pub use registry::{FailureCounter, FailureCounters, JobMetrics};
pub use scheduler::spawn_periodic_push;
