//! Job lifecycle hooks
//!
//! [`CompletionDecider`] is called once when a job starts and once when it
//! ends. The end hook returns a [`CompletionDecision`] describing which
//! branch ran and which collaborators were invoked.

pub mod decider;
pub mod decision;

pub use decider::CompletionDecider;
pub use decision::{CompletionBranch, CompletionDecision, IndicatorAction, NotificationAction};
