//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::storage::MAX_PAGE_SIZE;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between completed todo cleanup sweeps
    pub cleanup_interval: u64,
    /// Name of the table holding the todos
    pub table_name: String,
    /// Rows returned per partition query page
    pub query_page_size: usize,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 120)
    /// - `TODO_TABLE_NAME` - Table name (default: "todo")
    /// - `QUERY_PAGE_SIZE` - Rows per query page (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            table_name: env::var("TODO_TABLE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.table_name),
            query_page_size: env_or("QUERY_PAGE_SIZE", defaults.query_page_size),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 120,
            table_name: "todo".to_string(),
            query_page_size: MAX_PAGE_SIZE,
        }
    }
}
