//! NiFi success indicator

pub mod publisher;

pub use publisher::{indicator_filename, IndicatorHeaders, NifiSuccessPublisher};
