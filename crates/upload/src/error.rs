//! Error types produced by the upload crate.
//!
//! Every failure is terminal for the request being processed: nothing is
//! retried and no partial [`UploadResult`](crate::UploadResult) escapes.
//!
//! # HTTP Status Code Mapping
//!
//! | Error | Status |
//! |-------|--------|
//! | [`MalformedContentType`](ProcessingError::MalformedContentType) | 400 |
//! | [`MalformedMultipartBody`](ProcessingError::MalformedMultipartBody) | 400 |
//! | [`BodyReadAborted`](ProcessingError::BodyReadAborted) | 400 |
//! | [`BodyTooLarge`](ProcessingError::BodyTooLarge) | 400 |
//! | [`EncodingFailure`](ProcessingError::EncodingFailure) | 500 |
//!
//! ```rust
//! use upload::ProcessingError;
//!
//! let err = ProcessingError::BodyTooLarge { limit: 10, actual: Some(11) };
//! assert_eq!(err.http_status_code(), 400);
//! assert_eq!(err.error_code(), "BODY_TOO_LARGE");
//! ```
use thiserror::Error;

/// Errors that can occur while turning a request body into an upload result.
///
/// The enum is `#[non_exhaustive]`; include a catch-all arm when matching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProcessingError {
    /// The `Content-Type` header is missing, is not `multipart/form-data`, or
    /// carries no boundary parameter.
    #[error("malformed content type: {0}")]
    MalformedContentType(String),

    /// The body is larger than the configured ceiling.
    ///
    /// `actual` is the declared or buffered length when it was known up front;
    /// it is `None` when the ceiling was hit while streaming.
    #[error("request body exceeds the {limit} byte limit")]
    BodyTooLarge {
        /// Configured ceiling, in bytes.
        limit: u64,
        /// Length that tripped the ceiling, when known.
        actual: Option<u64>,
    },

    /// The multipart framing is corrupt: truncated boundary, invalid part
    /// headers, incomplete part data.
    #[error("malformed multipart body: {0}")]
    MalformedMultipartBody(String),

    /// The underlying body stream failed before it was fully read, typically
    /// because the client aborted the request.
    #[error("request body read aborted: {0}")]
    BodyReadAborted(String),

    /// The result could not be serialized.
    #[error("failed to encode upload result: {0}")]
    EncodingFailure(String),
}

impl ProcessingError {
    /// Returns true if the caller sent something we refuse to process.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ProcessingError::EncodingFailure(_))
    }

    /// Returns a suggested HTTP status code for this error.
    ///
    /// Every rejected request shape is a 400, oversize bodies included;
    /// [`error_code`](Self::error_code) tells them apart.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ProcessingError::EncodingFailure(_) => 500,
            _ => 400,
        }
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProcessingError::MalformedContentType(_) => "MALFORMED_CONTENT_TYPE",
            ProcessingError::BodyTooLarge { .. } => "BODY_TOO_LARGE",
            ProcessingError::MalformedMultipartBody(_) => "MALFORMED_MULTIPART_BODY",
            ProcessingError::BodyReadAborted(_) => "BODY_READ_ABORTED",
            ProcessingError::EncodingFailure(_) => "ENCODING_FAILURE",
        }
    }
}

impl From<multer::Error> for ProcessingError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::StreamSizeExceeded { limit } => ProcessingError::BodyTooLarge {
                limit,
                actual: None,
            },
            // multer wraps its own buffer errors (size limit included) in
            // StreamReadFailed, so unwrap before deciding.
            multer::Error::StreamReadFailed(cause) => match cause.downcast::<multer::Error>() {
                Ok(inner) => ProcessingError::from(*inner),
                Err(cause) => ProcessingError::BodyReadAborted(cause.to_string()),
            },
            multer::Error::NoMultipart
            | multer::Error::DecodeContentType(_)
            | multer::Error::NoBoundary => ProcessingError::MalformedContentType(err.to_string()),
            other => ProcessingError::MalformedMultipartBody(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(
            ProcessingError::MalformedContentType("text/plain".into()).http_status_code(),
            400
        );
        assert_eq!(
            ProcessingError::MalformedMultipartBody("eof".into()).http_status_code(),
            400
        );
        assert_eq!(
            ProcessingError::BodyReadAborted("reset".into()).http_status_code(),
            400
        );
        assert_eq!(
            ProcessingError::BodyTooLarge {
                limit: 1,
                actual: None
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            ProcessingError::EncodingFailure("boom".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn only_encoding_failure_is_server_side() {
        assert!(ProcessingError::MalformedContentType(String::new()).is_client_error());
        assert!(!ProcessingError::EncodingFailure(String::new()).is_client_error());
    }

    #[test]
    fn multer_size_error_maps_to_body_too_large() {
        let err = ProcessingError::from(multer::Error::StreamSizeExceeded { limit: 64 });
        assert_eq!(
            err,
            ProcessingError::BodyTooLarge {
                limit: 64,
                actual: None
            }
        );
    }

    #[test]
    fn wrapped_size_error_is_unwrapped() {
        let inner = multer::Error::StreamSizeExceeded { limit: 8 };
        let err = ProcessingError::from(multer::Error::StreamReadFailed(Box::new(inner)));
        assert!(matches!(err, ProcessingError::BodyTooLarge { limit: 8, .. }));
    }

    #[test]
    fn transport_error_is_read_abort() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = ProcessingError::from(multer::Error::StreamReadFailed(Box::new(cause)));
        assert!(matches!(err, ProcessingError::BodyReadAborted(_)));
    }

    #[test]
    fn multer_framing_error_maps_to_malformed_body() {
        let err = ProcessingError::from(multer::Error::IncompleteStream);
        assert!(matches!(err, ProcessingError::MalformedMultipartBody(_)));
    }
}
