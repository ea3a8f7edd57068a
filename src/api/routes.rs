//! API Routes
//!
//! Configures the Axum router with the todo endpoints.

use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_todo_handler, get_all_todos_handler, get_todo_by_id_handler, health_handler,
    update_todo_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /todo` - Create a todo
/// - `GET /todo` - List every todo
/// - `GET /todo/:id` - Fetch one todo
/// - `PUT /todo/:id` - Update a todo
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/todo", get(get_all_todos_handler).post(create_todo_handler))
        .route("/todo/:id", get(get_todo_by_id_handler).put(update_todo_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
