//! Workspace umbrella crate for formgate.
//!
//! Re-exports the upload processor so callers get one entry point, and the
//! HTTP server behind the default `server` feature.

pub use upload::{
    ConfigError, DEFAULT_MAX_BODY_BYTES, FileDescriptor, ProcessingError, SUCCESS_MESSAGE,
    UploadConfig, UploadResult, UploadStatus, check_declared_len, encode, parse_boundary,
    process, process_stream,
};

#[cfg(feature = "server")]
pub use server::{
    CredentialVerifier, ServerConfig, ServerError, ServerState, StaticTokenVerifier,
    build_router, start_server,
};

use bytes::Bytes;

/// Processes a buffered body and encodes the outcome in one step.
///
/// This is what the upload endpoint does, minus the HTTP plumbing.
pub async fn process_and_encode(
    body: Bytes,
    content_type: &str,
    cfg: &UploadConfig,
) -> Result<Vec<u8>, ProcessingError> {
    let result = process(body, content_type, cfg).await?;
    encode(&result)
}
