//! formgate upload processing
//!
//! This is where `multipart/form-data` request bodies get turned into
//! something a handler can answer with. We take the body, the `Content-Type`
//! header and a size ceiling, and hand back the scalar form fields plus one
//! descriptor per uploaded file.
//!
//! ## What we do here
//!
//! - **Check the content type** - it must be `multipart/form-data` with a
//!   boundary, otherwise nothing is read.
//! - **Enforce the ceiling** - declared or buffered lengths over
//!   [`UploadConfig::max_body_bytes`] are rejected up front; streams are
//!   capped while reading too.
//! - **Sort the parts** - parts with a `filename` attribute (even an empty
//!   one) become a [`FileDescriptor`]; everything else is a scalar field.
//! - **First value wins** - a repeated scalar field keeps its first value,
//!   later ones are dropped. This is deliberate and tested.
//! - **Keep nothing** - file payloads are counted and discarded. No disk, no
//!   shared state, same input gives the same result.
//!
//! ## Main entry points
//!
//! [`process`] for a fully buffered body, [`process_stream`] for a body that
//! is still arriving. Both return a [`ProcessingError`] on failure and never a
//! partial result. [`encode`] turns the result into JSON.
//!
//! ## Example
//!
//! ```
//! use upload::{process, UploadConfig};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let body = "--X\r\n\
//!     Content-Disposition: form-data; name=\"title\"\r\n\r\n\
//!     hello\r\n\
//!     --X\r\n\
//!     Content-Disposition: form-data; name=\"doc\"; filename=\"report.pdf\"\r\n\
//!     Content-Type: application/pdf\r\n\r\n\
//!     abc\r\n\
//!     --X--\r\n";
//!
//! let result = process(body.into(), "multipart/form-data; boundary=X", &UploadConfig::default())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.fields["title"], "hello");
//! assert_eq!(result.files[0].name, "report.pdf");
//! assert_eq!(result.files[0].size, 3);
//! # });
//! ```
use std::convert::Infallible;
use std::time::Instant;

use bytes::Bytes;
use futures_util::stream::{self, Stream};
use tracing::{info, warn, Instrument, Level};

mod boundary;
mod config;
mod disposition;
mod encode;
mod error;
mod form;
mod types;

pub use crate::boundary::parse_boundary;
pub use crate::config::{ConfigError, UploadConfig, DEFAULT_MAX_BODY_BYTES};
pub use crate::encode::encode;
pub use crate::error::ProcessingError;
pub use crate::types::{FileDescriptor, UploadResult, UploadStatus, SUCCESS_MESSAGE};

/// Processes a fully buffered multipart body.
pub async fn process(
    body: Bytes,
    content_type: &str,
    cfg: &UploadConfig,
) -> Result<UploadResult, ProcessingError> {
    let declared_len = Some(body.len() as u64);
    let body_stream = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    process_stream(body_stream, content_type, declared_len, cfg).await
}

/// Processes a multipart body that is read from `body_stream`.
///
/// `declared_len` is the request's `Content-Length`, when the transport knows
/// it. A declared length over the ceiling is rejected before the stream is
/// polled; a stream that turns out longer than the ceiling fails with
/// [`ProcessingError::BodyTooLarge`] while reading. A stream error (client
/// abort) yields [`ProcessingError::BodyReadAborted`].
pub async fn process_stream<S, O, E>(
    body_stream: S,
    content_type: &str,
    declared_len: Option<u64>,
    cfg: &UploadConfig,
) -> Result<UploadResult, ProcessingError>
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "upload.process", declared_len = ?declared_len);

    let outcome = process_inner(body_stream, content_type, declared_len, cfg)
        .instrument(span)
        .await;

    let elapsed_micros = start.elapsed().as_micros();
    match &outcome {
        Ok(result) => info!(
            fields = result.fields.len(),
            files = result.files.len(),
            file_bytes = result.total_file_bytes(),
            elapsed_micros,
            "upload_success"
        ),
        Err(err) => warn!(
            error = %err,
            code = err.error_code(),
            elapsed_micros,
            "upload_failure"
        ),
    }
    outcome
}

async fn process_inner<S, O, E>(
    body_stream: S,
    content_type: &str,
    declared_len: Option<u64>,
    cfg: &UploadConfig,
) -> Result<UploadResult, ProcessingError>
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let boundary = parse_boundary(content_type)?;
    check_declared_len(declared_len, cfg)?;

    let multipart = form::multipart_for(body_stream, boundary, cfg.max_body_bytes);
    form::collect_parts(multipart).await
}

/// Rejects a declared body length over the configured ceiling.
///
/// ```rust
/// use upload::{check_declared_len, ProcessingError, UploadConfig};
///
/// let cfg = UploadConfig::with_max_body_bytes(10);
/// assert!(check_declared_len(Some(10), &cfg).is_ok());
/// assert!(check_declared_len(None, &cfg).is_ok());
/// assert_eq!(
///     check_declared_len(Some(11), &cfg),
///     Err(ProcessingError::BodyTooLarge { limit: 10, actual: Some(11) })
/// );
/// ```
pub fn check_declared_len(
    declared_len: Option<u64>,
    cfg: &UploadConfig,
) -> Result<(), ProcessingError> {
    match declared_len {
        Some(len) if len > cfg.max_body_bytes => Err(ProcessingError::BodyTooLarge {
            limit: cfg.max_body_bytes,
            actual: Some(len),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    const CT: &str = "multipart/form-data; boundary=X-BOUNDARY";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(name: &str, file_name: &str, content_type: Option<&str>, data: &str) -> String {
        let ct = content_type
            .map(|ct| format!("Content-Type: {ct}\r\n"))
            .unwrap_or_default();
        format!(
            "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n{ct}\r\n{data}\r\n"
        )
    }

    fn body(parts: &[String]) -> Bytes {
        let mut body = parts.concat();
        body.push_str("--X-BOUNDARY--\r\n");
        Bytes::from(body)
    }

    #[tokio::test]
    async fn zero_parts_is_success() {
        let result = process(body(&[]), CT, &UploadConfig::default()).await.unwrap();
        assert!(result.is_success());
        assert!(result.fields.is_empty());
        assert!(result.files.is_empty());
    }

    #[tokio::test]
    async fn duplicate_field_keeps_first() {
        let parts = [text_part("a", "x"), text_part("a", "y")];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        assert_eq!(result.fields["a"], "x");
        assert_eq!(result.fields.len(), 1);
    }

    #[tokio::test]
    async fn files_under_one_name_keep_order() {
        let parts = [
            file_part("f", "p.txt", Some("text/plain"), "12345"),
            file_part("f", "q.txt", Some("text/plain"), "1234567"),
        ];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        let got: Vec<_> = result
            .files
            .iter()
            .map(|f| (f.name.as_str(), f.size))
            .collect();
        assert_eq!(got, [("p.txt", 5), ("q.txt", 7)]);
    }

    #[tokio::test]
    async fn file_size_counts_crlf_inside_payload() {
        let parts = [file_part("f", "a.bin", None, "Hello\r\nWorld\rAgain")];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        assert_eq!(result.files[0].size, 18);
        assert_eq!(result.files[0].content_type, "");
    }

    #[tokio::test]
    async fn empty_file_name_is_a_file() {
        let parts = [file_part("f", "", Some("application/octet-stream"), "")];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        assert!(result.fields.is_empty());
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].name, "");
        assert_eq!(result.files[0].size, 0);
    }

    #[tokio::test]
    async fn content_type_is_taken_verbatim() {
        let parts = [file_part("f", "x.png", Some("image/weird; v=1"), "abc")];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        assert_eq!(result.files[0].content_type, "image/weird; v=1");
    }

    #[tokio::test]
    async fn nameless_part_is_skipped() {
        let parts = [
            "--X-BOUNDARY\r\nContent-Disposition: form-data\r\n\r\nlost\r\n".to_string(),
            text_part("kept", "yes"),
        ];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.fields["kept"], "yes");
    }

    #[tokio::test]
    async fn empty_name_is_skipped() {
        let parts = [
            text_part("", "v"),
            file_part("", "orphan.txt", None, "data"),
            text_part("kept", "yes"),
        ];
        let result = process(body(&parts), CT, &UploadConfig::default())
            .await
            .unwrap();
        assert!(!result.fields.contains_key(""));
        assert_eq!(result.fields.len(), 1);
        assert!(result.files.is_empty());
    }

    #[tokio::test]
    async fn wrong_content_type_rejected() {
        let err = process(body(&[]), "text/plain", &UploadConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedContentType(_)));
    }

    #[tokio::test]
    async fn oversize_body_rejected() {
        let parts = [text_part("a", "0123456789")];
        let body = body(&parts);
        let len = body.len() as u64;
        let cfg = UploadConfig::with_max_body_bytes(len - 1);
        let err = process(body, CT, &cfg).await.unwrap_err();
        assert_eq!(
            err,
            ProcessingError::BodyTooLarge {
                limit: len - 1,
                actual: Some(len)
            }
        );
    }

    #[tokio::test]
    async fn undeclared_stream_over_ceiling_rejected() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from(text_part("a", &"x".repeat(64)))),
            Ok(Bytes::from(text_part("b", &"y".repeat(64)))),
            Ok(Bytes::from_static(b"--X-BOUNDARY--\r\n")),
        ];
        let cfg = UploadConfig::with_max_body_bytes(32);
        let err = process_stream(stream::iter(chunks), CT, None, &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::BodyTooLarge { limit: 32, .. }));
    }

    #[tokio::test]
    async fn truncated_body_is_malformed() {
        let mut raw = text_part("a", "x");
        raw.push_str("--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\nunfinished");
        let err = process(Bytes::from(raw), CT, &UploadConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedMultipartBody(_)));
    }

    #[tokio::test]
    async fn empty_body_is_malformed() {
        let err = process(Bytes::new(), CT, &UploadConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedMultipartBody(_)));
    }

    #[tokio::test]
    async fn aborted_stream_yields_no_result() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from(text_part("a", "x"))),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
        ];
        let err = process_stream(stream::iter(chunks), CT, None, &UploadConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::BodyReadAborted(_)));
    }

    #[tokio::test]
    async fn same_body_same_result() {
        let parts = [
            text_part("title", "hello"),
            file_part("doc", "report.pdf", Some("application/pdf"), "abc"),
        ];
        let body = body(&parts);
        let cfg = UploadConfig::default();
        let first = process(body.clone(), CT, &cfg).await.unwrap();
        let second = process(body, CT, &cfg).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(encode(&first).unwrap(), encode(&second).unwrap());
    }
}
