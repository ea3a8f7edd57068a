//! API Module
//!
//! HTTP handlers and routing for the todo REST API.
//!
//! # Endpoints
//! - `POST /todo` - Create a todo
//! - `GET /todo` - List every todo
//! - `GET /todo/:id` - Fetch one todo
//! - `PUT /todo/:id` - Update a todo
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
