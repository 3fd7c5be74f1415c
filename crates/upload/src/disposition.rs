use http::header::{self, HeaderMap};

/// The `name` and `filename` attributes of a part's `Content-Disposition`.
///
/// `file_name` is `Some("")` when the attribute is present but empty; that
/// still marks the part as a file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ContentDisposition {
    pub(crate) name: Option<String>,
    pub(crate) file_name: Option<String>,
}

impl ContentDisposition {
    pub(crate) fn from_headers(headers: &HeaderMap) -> ContentDisposition {
        headers
            .get(header::CONTENT_DISPOSITION)
            .map(|val| ContentDisposition::parse(&String::from_utf8_lossy(val.as_bytes())))
            .unwrap_or_default()
    }

    pub(crate) fn parse(value: &str) -> ContentDisposition {
        let mut disposition = ContentDisposition::default();
        let mut extended_file_name = None;

        for (key, val) in split_params(value) {
            match key.to_ascii_lowercase().as_str() {
                "name" if disposition.name.is_none() => disposition.name = Some(val),
                "filename" if disposition.file_name.is_none() => {
                    disposition.file_name = Some(val)
                }
                "filename*" if extended_file_name.is_none() => {
                    extended_file_name = decode_ext_value(&val)
                }
                _ => {}
            }
        }

        if disposition.file_name.is_none() {
            disposition.file_name = extended_file_name;
        }
        disposition
    }
}

/// Splits `form-data; a=b; c="d; e"` into `[(a, b), (c, "d; e")]`, skipping
/// the leading disposition type.
fn split_params(value: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = value.chars().peekable();

    // disposition type
    for ch in chars.by_ref() {
        if ch == ';' {
            break;
        }
    }

    loop {
        let mut key = String::new();
        let mut has_value = false;
        while let Some(ch) = chars.next() {
            match ch {
                '=' => {
                    has_value = true;
                    break;
                }
                ';' => break,
                _ => key.push(ch),
            }
        }
        let key = key.trim().to_string();

        let mut val = String::new();
        if has_value {
            while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                chars.next();
            }
            if chars.peek() == Some(&'"') {
                chars.next();
                while let Some(ch) = chars.next() {
                    match ch {
                        '"' => break,
                        '\\' if matches!(chars.peek(), Some('"') | Some('\\')) => {
                            if let Some(escaped) = chars.next() {
                                val.push(escaped);
                            }
                        }
                        _ => val.push(ch),
                    }
                }
                // anything between the closing quote and the next ';' is junk
                for ch in chars.by_ref() {
                    if ch == ';' {
                        break;
                    }
                }
            } else {
                for ch in chars.by_ref() {
                    if ch == ';' {
                        break;
                    }
                    val.push(ch);
                }
                val = val.trim_end().to_string();
            }
        }

        if !key.is_empty() {
            params.push((key, val));
        }
        if chars.peek().is_none() {
            break;
        }
    }

    params
}

/// Decodes an RFC 5987 `charset'lang'value`. Only UTF-8 and ASCII are
/// understood; anything else yields `None`.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut pieces = value.splitn(3, '\'');
    let charset = pieces.next()?;
    let _lang = pieces.next()?;
    let encoded = pieces.next()?;

    if !(charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("us-ascii")) {
        return None;
    }

    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let hex = std::str::from_utf8(hex).ok()?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
