use crate::ProcessingError;

/// Extracts the multipart boundary from a `Content-Type` header value.
///
/// The value must parse as `multipart/form-data` and carry a non-empty
/// `boundary` parameter.
///
/// ```rust
/// use upload::parse_boundary;
///
/// assert_eq!(parse_boundary("multipart/form-data; boundary=X").unwrap(), "X");
/// assert!(parse_boundary("text/plain").is_err());
/// ```
pub fn parse_boundary(content_type: &str) -> Result<String, ProcessingError> {
    let m = content_type.parse::<mime::Mime>().map_err(|err| {
        ProcessingError::MalformedContentType(format!("unparsable content type: {err}"))
    })?;

    if !(m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA) {
        return Err(ProcessingError::MalformedContentType(format!(
            "expected multipart/form-data, got {}",
            m.essence_str()
        )));
    }

    match m.get_param(mime::BOUNDARY) {
        Some(boundary) if !boundary.as_str().is_empty() => Ok(boundary.as_str().to_owned()),
        _ => Err(ProcessingError::MalformedContentType(
            "multipart boundary not found in content type".to_string(),
        )),
    }
}
