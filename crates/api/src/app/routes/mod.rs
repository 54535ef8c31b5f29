use axum::{routing::delete, Router};

pub mod inventory;
pub mod sessions;
pub mod system;

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/session", delete(sessions::end_session))
        .merge(inventory::router())
}
