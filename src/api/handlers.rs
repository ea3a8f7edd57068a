//! API Handlers
//!
//! HTTP request handlers for the todo endpoints. Each handler parses its
//! input, makes one or two sequential store calls, and answers with an
//! [`Envelope`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Result, TodoError};
use crate::models::{Envelope, HealthResponse, Todo, TodoRecord, TODO_PARTITION_KEY};
use crate::storage::{MemoryTable, TableStore};

/// Application state shared across all handlers.
///
/// Holds only the table store; all todo state lives there.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
}

impl AppState {
    /// Creates a new AppState over the given store.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Backs the API with an in-memory table named and paged per the Config.
    pub fn from_config(config: &Config) -> Self {
        let table =
            MemoryTable::with_page_size(config.table_name.clone(), config.query_page_size);
        Self::new(Arc::new(table))
    }
}

/// Decodes a todo payload. An empty or `null` body decodes to `None`.
fn parse_body(body: &Bytes) -> Result<Option<Todo>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map_err(|err| TodoError::InvalidBody(err.to_string()))
}

/// Handler for POST /todo
///
/// Stores a new todo under a fresh id. The todo always starts open.
pub async fn create_todo_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Envelope<TodoRecord>>> {
    info!("Received a new todo.");

    let todo = parse_body(&body)?.unwrap_or_default();
    if let Err(err) = todo.validate_create() {
        warn!("Rejected todo without a description");
        return Err(err);
    }

    let record = TodoRecord::create(&todo, Uuid::new_v4(), Utc::now());
    let stored = state.store.insert(record).await?;

    let message = "New todo stored in table";
    info!(id = %stored.row_key, "{}", message);

    Ok(Json(Envelope::success(message, stored)))
}

/// Handler for PUT /todo/:id
///
/// Sets the completion flag and, when given, the description of a todo.
pub async fn update_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<TodoRecord>>> {
    info!("Update for todo: {}, received", id);

    let update = parse_body(&body)?
        .ok_or_else(|| TodoError::InvalidBody("request body is empty".to_string()))?;

    let Some(existing) = state.store.retrieve(TODO_PARTITION_KEY, &id).await? else {
        warn!("Update for unknown todo: {}", id);
        return Err(TodoError::NotFound);
    };

    let stored = state.store.replace(existing.with_update(&update)).await?;

    let message = format!("Todo: {}, updated in table", id);
    info!("{}", message);

    Ok(Json(Envelope::success(message, stored)))
}

/// Handler for GET /todo
///
/// Returns every todo in the partition, in store order.
pub async fn get_all_todos_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<TodoRecord>>>> {
    info!("Get all todos received");

    let todos = state.store.query_all(TODO_PARTITION_KEY).await?;

    let message = "Retrieved all todos";
    info!(count = todos.len(), "{}", message);

    Ok(Json(Envelope::success(message, todos)))
}

/// Handler for GET /todo/:id
pub async fn get_todo_by_id_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<TodoRecord>>> {
    info!("Get todo by id: {}, received", id);

    let record = state
        .store
        .retrieve(TODO_PARTITION_KEY, &id)
        .await?
        .ok_or(TodoError::NotFound)?;

    let message = format!("Todo {}, retrieved", id);
    info!("{}", message);

    Ok(Json(Envelope::success(message, record)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
