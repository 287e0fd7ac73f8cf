//! Core job lifecycle logic
//!
//! - [`collaborators`] - traits for the systems the decider drives
//! - [`completion`] - the completion decider and its decision record
//! - [`runner`] - hosts the export job as a child process
//!
//! # Lifecycle
//!
//! 1. **Start**: increment the running-job gauge and push metrics
//! 2. **Run**: the export job executes; metrics are pushed periodically
//! 3. **End**: decrement the gauge, then exactly one of
//!    - count a failure (job did not complete)
//!    - publish the success indicator (indicator mode)
//!    - check delivery status, publishing or notifying as needed
//! 4. **Final push**: metrics are pushed once more
//!
//! # Example
//!
//! ```rust,no_run
//! use snapshot_sender::core::completion::CompletionDecider;
//! use snapshot_sender::domain::JobOutcome;
//!
//! # async fn example(decider: CompletionDecider) {
//! decider.on_start().await;
//! // ... run the export ...
//! let decision = decider.on_end(JobOutcome::Completed).await;
//! println!("Branch: {:?}", decision.branch);
//! # }
//! ```

pub mod collaborators;
pub mod completion;
pub mod runner;
