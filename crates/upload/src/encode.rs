//! JSON encoding of upload results.
use crate::{ProcessingError, UploadResult};

/// Serializes `result` to the JSON wire format.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use upload::{encode, UploadResult};
///
/// let body = encode(&UploadResult::success(BTreeMap::new(), Vec::new())).unwrap();
/// assert_eq!(
///     String::from_utf8(body).unwrap(),
///     r#"{"message":"upload processed successfully","status":"success"}"#
/// );
/// ```
pub fn encode(result: &UploadResult) -> Result<Vec<u8>, ProcessingError> {
    serde_json::to_vec(result).map_err(|err| ProcessingError::EncodingFailure(err.to_string()))
}
