use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_core::DomainError;

use crate::app::{dto, errors};
use crate::context::SessionContext;
use crate::session::SessionRegistry;

pub fn router() -> Router {
    Router::new()
        .route("/inventory", get(get_inventory))
        .route("/inventory/items", axum::routing::post(add_item).delete(remove_items))
        .route("/inventory/names", get(get_names))
}

pub async fn get_inventory(
    Extension(registry): Extension<Arc<SessionRegistry>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match registry.with_store(session.session_id(), |store| {
        dto::InventoryView::render(store, None)
    }) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn get_names(
    Extension(registry): Extension<Arc<SessionRegistry>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match registry.with_store(session.session_id(), |store| dto::NamesView::render(store)) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn add_item(
    Extension(registry): Extension<Arc<SessionRegistry>>,
    Extension(session): Extension<SessionContext>,
    body: Result<Json<dto::AddItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let session_id = session.session_id();
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let quantity = body.quantity.unwrap_or(1);

    let outcome = registry.with_store(session_id, |store| -> Result<_, DomainError> {
        let message = dto::added_message(store.add(&body.name, quantity)?);
        Ok(dto::InventoryView::render(store, Some(message)))
    });

    match outcome {
        Ok(Ok(view)) => {
            tracing::info!(
                session_id = %session_id,
                name = body.name.trim(),
                quantity,
                "item added"
            );
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Ok(Err(e)) => {
            tracing::debug!(session_id = %session_id, error = %e, "add rejected");
            if body.name.trim().is_empty() {
                errors::json_error(StatusCode::BAD_REQUEST, "validation_error", dto::NAME_REQUIRED)
            } else {
                errors::domain_error_to_response(e)
            }
        }
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn remove_items(
    Extension(registry): Extension<Arc<SessionRegistry>>,
    Extension(session): Extension<SessionContext>,
    body: Result<Json<dto::RemoveItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let session_id = session.session_id();
    // A bodiless DELETE is how a client says nothing was selected.
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => dto::RemoveItemRequest::default(),
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "not_selected", dto::NOT_SELECTED);
    };

    let outcome = registry.with_store(session_id, |store| -> Result<_, DomainError> {
        let removal = store.remove_by_name(&name)?;
        let message = dto::removed_message(&removal);
        Ok((removal.removed, dto::InventoryView::render(store, Some(message))))
    });

    match outcome {
        Ok(Ok((removed, view))) => {
            tracing::info!(session_id = %session_id, name = name.trim(), removed, "items removed");
            Json(view).into_response()
        }
        Ok(Err(e)) => errors::domain_error_to_response(e),
        Err(e) => errors::session_error_to_response(e),
    }
}
