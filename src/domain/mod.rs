//! Domain types for snapshot-sender.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Lifecycle classifications** ([`JobOutcome`], [`CollectionStatus`],
//!   [`SendingCompletionStatus`])
//! - **Error types** ([`SenderError`], [`PublishError`])
//! - **Result type alias** ([`Result`])
//!
//! ```rust
//! use snapshot_sender::domain::JobOutcome;
//!
//! let outcome: JobOutcome = "COMPLETED".parse().unwrap();
//! assert!(outcome.is_success());
//!
//! // Unrecognised exit codes never fail to parse
//! let outcome: JobOutcome = "ABANDONED".parse().unwrap();
//! assert_eq!(outcome, JobOutcome::Unknown);
//! ```

pub mod errors;
pub mod result;
pub mod status;

pub use errors::{PublishError, SenderError};
pub use result::Result;
pub use status::{CollectionStatus, JobOutcome, SendingCompletionStatus};
