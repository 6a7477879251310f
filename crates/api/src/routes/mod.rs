//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};
use ledgerly_shared::AppError;

pub mod debts;
pub mod expenses;
pub mod health;
pub mod loans;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(loans::routes())
        .merge(debts::routes())
        .merge(expenses::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Maps an operation error onto an HTTP response.
///
/// Server-side failures are logged and answered with a generic message so
/// storage details never reach the caller; everything else carries its own
/// description.
pub(crate) fn error_response(error: impl Into<AppError>) -> Response {
    let error: AppError = error.into();
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %error, "Request failed");
        "An error occurred".to_string()
    } else {
        error.to_string()
    };

    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": message
        })),
    )
        .into_response()
}

/// Shorthand for a 400 validation response outside the repository layer.
pub(crate) fn validation_response(message: String) -> Response {
    error_response(AppError::Validation(message))
}
