use crate::error::ServerResult;
use crate::state::ServerState;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Ingest a `multipart/form-data` upload.
///
/// The body is streamed into the upload processor; nothing is written to
/// disk. Scalar fields come back under `form` (first value per name wins),
/// every file part comes back as a descriptor under `files`.
///
/// # Example
///
/// ```json
/// {
///   "message": "upload processed successfully",
///   "status": "success",
///   "files": [{"name": "report.pdf", "size": 3, "content_type": "application/pdf"}],
///   "form": {"title": "hello"}
/// }
/// ```
///
/// # Errors
///
/// Plain-text body with the status of the underlying
/// [`ProcessingError`](upload::ProcessingError): 400 for a bad content type
/// or corrupt framing and over the size ceiling (told apart by the
/// `x-error-code` header), 500 if encoding fails.
pub async fn upload_files(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Body,
) -> ServerResult<Response> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let declared_len = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    tracing::debug!(content_type, declared_len = ?declared_len, "upload request received");

    let result = upload::process_stream(
        body.into_data_stream(),
        content_type,
        declared_len,
        &state.upload,
    )
    .await?;

    let encoded = upload::encode(&result)?;
    Ok(([(CONTENT_TYPE, "application/json")], encoded).into_response())
}
