use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use upload::ProcessingError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Header carrying the machine-readable error code on error responses
pub const ERROR_CODE_HEADER: &str = "x-error-code";

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("method not allowed")]
    UnsupportedMethod,

    #[error(transparent)]
    Upload(#[from] ProcessingError),

    #[error("not found")]
    NotFound,

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::UnsupportedMethod => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Upload(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::UnsupportedMethod => "UNSUPPORTED_METHOD",
            ServerError::Upload(err) => err.error_code(),
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Errors are answered in plain text; the code travels in [`ERROR_CODE_HEADER`].
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        } else {
            tracing::debug!(code, error = %self, "request rejected");
        }

        let mut response = (status, self.to_string()).into_response();
        response
            .headers_mut()
            .insert(ERROR_CODE_HEADER, HeaderValue::from_static(code));
        response
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
