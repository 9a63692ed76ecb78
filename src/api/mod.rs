//! API Module
//!
//! HTTP handlers and routing for the user service.
//!
//! # Endpoints
//! - `GET /users`, `POST /users` - List and create users
//! - `GET /users/:id`, `PUT /users/:id`, `DELETE /users/:id` - Single user
//! - `POST /cache/flush` - Drop every cached entry
//! - `GET /health` - Cache health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
