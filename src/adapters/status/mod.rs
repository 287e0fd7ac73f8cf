//! Export status document
//!
//! The export pipeline records per-collection progress in a JSON document:
//!
//! ```json
//! {"collections": [{"topic": "db.core.toDo", "files_exported": 3,
//!   "files_received": 3, "files_sent": 3, "status": "Sent"}]}
//! ```

pub mod models;
pub mod reporter;

pub use models::{
    classify_collection, classify_sending, CollectionRecord, CollectionState, StatusDocument,
};
pub use reporter::FileStatusReporter;
