use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::DomainError;

use crate::session::SessionError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

/// Body extraction failures, reported in the same JSON shape as every other error.
///
/// Well-formed JSON that does not fit the request type (e.g. a quantity beyond
/// the integer range) is a validation failure; anything else is a bad body.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    tracing::debug!(error = %rejection.body_text(), "request body rejected");
    match rejection {
        JsonRejection::JsonDataError(e) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", e.body_text())
        }
        JsonRejection::MissingJsonContentType(e) => {
            json_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "invalid_body", e.body_text())
        }
        other => json_error(StatusCode::BAD_REQUEST, "invalid_body", other.body_text()),
    }
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    tracing::error!(error = %err, "session state unavailable");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "session_unavailable",
        err.to_string(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
