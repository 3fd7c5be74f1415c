use crate::state::ServerState;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Checks the `Authorization` header against the configured verifier.
///
/// Used as an `auth_request` target by reverse proxies, so both `GET` and
/// `POST` are accepted.
///
/// # Response
///
/// ```json
/// {"authenticated": true, "user": "test-user"}
/// ```
///
/// or, with status 401:
///
/// ```json
/// {"authenticated": false, "error": "Invalid token"}
/// ```
pub async fn authenticate(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    if state.verifier.verify(header) {
        tracing::info!(user = %state.config.auth_user, "authentication succeeded");
        (
            StatusCode::OK,
            Json(json!({
                "authenticated": true,
                "user": state.config.auth_user,
            })),
        )
            .into_response()
    } else {
        tracing::info!(header_present = header.is_some(), "authentication failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "authenticated": false,
                "error": "Invalid token",
            })),
        )
            .into_response()
    }
}
