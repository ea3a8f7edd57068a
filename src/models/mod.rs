//! Wire and persisted models for the todo API
//!
//! Defines the todo payload clients send, the record kept in the table,
//! and the envelope wrapped around every response.

pub mod responses;
pub mod todo;


// Re-export commonly used types
pub use responses::{Envelope, HealthResponse};
pub use todo::{Todo, TodoRecord, TODO_PARTITION_KEY, WILDCARD_ETAG};
