use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::{dto, errors};
use crate::context::SessionContext;
use crate::session::SessionRegistry;

pub async fn start_session(
    Extension(registry): Extension<Arc<SessionRegistry>>,
) -> axum::response::Response {
    match registry.start() {
        Ok((session_id, started_at)) => (
            StatusCode::CREATED,
            Json(dto::SessionStarted {
                session_id,
                started_at,
            }),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn end_session(
    Extension(registry): Extension<Arc<SessionRegistry>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match registry.end(session.session_id()) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}
