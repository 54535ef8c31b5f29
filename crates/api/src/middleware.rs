use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use stockroom_core::SessionId;

use crate::app::errors;
use crate::context::SessionContext;

pub const SESSION_HEADER: &str = "x-session-id";

pub async fn session_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let session_id = extract_session_id(req.headers())?;

    req.extensions_mut().insert(SessionContext::new(session_id));

    Ok(next.run(req).await)
}

fn extract_session_id(headers: &HeaderMap) -> Result<SessionId, Response> {
    let header = headers.get(SESSION_HEADER).ok_or_else(|| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_session",
            format!("{SESSION_HEADER} header is required"),
        )
    })?;

    let header = header.to_str().map_err(|_| invalid_session("header is not valid text"))?;

    header.parse().map_err(|e: stockroom_core::DomainError| {
        tracing::debug!(error = %e, "rejected session header");
        invalid_session(e.to_string())
    })
}

fn invalid_session(message: impl Into<String>) -> Response {
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_session", message)
}
