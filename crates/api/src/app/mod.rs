//! HTTP API application wiring (Axum router + session wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and user-facing messages
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;
use crate::session::SessionRegistry;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(registry: Arc<SessionRegistry>) -> Router {
    // Session-scoped routes: require a resolvable session header.
    let scoped = routes::router().layer(axum::middleware::from_fn(middleware::session_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/sessions", post(routes::sessions::start_session))
        .merge(scoped)
        .layer(ServiceBuilder::new().layer(Extension(registry)))
}
