//! Todo Table - a small todo API over a table store
//!
//! Provides create, update and lookup of todos over HTTP, plus a periodic
//! sweep that deletes completed todos.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use storage::{MemoryTable, TableStore};
pub use tasks::spawn_cleanup_task;
