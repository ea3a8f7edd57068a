//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Completed todo cleanup: deletes finished todos at configured intervals

mod cleanup;


pub use cleanup::{run_cleanup, spawn_cleanup_task, CleanupReport};
