//! Error types for the todo API
//!
//! Provides unified error handling using thiserror. Every failure is rendered
//! as the same envelope the handlers use for success.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::Envelope;
use crate::storage::StoreError;

/// Message returned when an id does not resolve to a stored todo.
pub const TODO_NOT_FOUND: &str = "Todo not found.";

/// Message returned when a create request carries no usable description.
pub const MISSING_DESCRIPTION: &str = "The request must have a Task Description";

// == Todo Error Enum ==
/// Unified error type for the todo API.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Required input is missing or empty
    #[error("{0}")]
    Validation(String),

    /// Request body could not be decoded into a todo
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The referenced id has no record in the table
    #[error("Todo not found.")]
    NotFound,

    /// Any failure reported by the table store
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl TodoError {
    /// HTTP status for this error.
    ///
    /// Unknown ids answer 400 rather than 404; clients of the API rely on it.
    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::Validation(_) | TodoError::InvalidBody(_) | TodoError::NotFound => {
                StatusCode::BAD_REQUEST
            }
            TodoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            TodoError::Store(err) => {
                error!("Table store failure: {}", err);
                "Internal storage error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the todo API.
pub type Result<T> = std::result::Result<T, TodoError>;
