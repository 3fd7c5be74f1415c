use std::collections::BTreeMap;

use futures_util::stream::Stream;
use http::header::CONTENT_TYPE;
use multer::Multipart;
use tracing::debug;

use crate::disposition::ContentDisposition;
use crate::types::{FileDescriptor, UploadResult};
use crate::ProcessingError;

/// Accumulates scalar fields and file descriptors while parts are decoded.
///
/// Scalar fields follow a first-wins policy: once a name has a value, later
/// parts with the same name are ignored. Files are kept in arrival order.
#[derive(Debug, Default)]
pub(crate) struct FormCollector {
    fields: BTreeMap<String, String>,
    files: Vec<FileDescriptor>,
}

impl FormCollector {
    /// Records a scalar field. Returns `false` when the name was already taken.
    pub(crate) fn push_field(&mut self, name: String, value: String) -> bool {
        if self.fields.contains_key(&name) {
            return false;
        }
        self.fields.insert(name, value);
        true
    }

    pub(crate) fn push_file(&mut self, file: FileDescriptor) {
        self.files.push(file);
    }

    pub(crate) fn finish(self) -> UploadResult {
        UploadResult::success(self.fields, self.files)
    }
}

/// Drives `multipart` to the end, sorting every part into `collector`.
pub(crate) async fn collect_parts(
    mut multipart: Multipart<'_>,
) -> Result<UploadResult, ProcessingError> {
    let mut collector = FormCollector::default();
    let mut part_idx = 0usize;

    while let Some(mut field) = multipart.next_field().await? {
        let disposition = ContentDisposition::from_headers(field.headers());
        let idx = part_idx;
        part_idx += 1;

        let Some(name) = disposition.name.filter(|name| !name.is_empty()) else {
            debug!(part = idx, "skipping part without a form name");
            continue;
        };

        match disposition.file_name {
            Some(file_name) => {
                let content_type = field
                    .headers()
                    .get(CONTENT_TYPE)
                    .map(|val| String::from_utf8_lossy(val.as_bytes()).into_owned())
                    .unwrap_or_default();

                let mut size = 0u64;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len() as u64;
                }

                debug!(part = idx, field = %name, size, "file part");
                collector.push_file(FileDescriptor {
                    name: file_name,
                    size,
                    content_type,
                });
            }
            None => {
                let value = field.text().await?;
                if !collector.push_field(name.clone(), value) {
                    debug!(part = idx, field = %name, "duplicate field ignored");
                }
            }
        }
    }

    Ok(collector.finish())
}

/// Builds a size-capped multer parser over `stream`.
pub(crate) fn multipart_for<S, O, E>(stream: S, boundary: String, limit: u64) -> Multipart<'static>
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<bytes::Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let constraints =
        multer::Constraints::new().size_limit(multer::SizeLimit::new().whole_stream(limit));
    Multipart::with_constraints(stream, boundary, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins() {
        let mut form = FormCollector::default();
        assert!(form.push_field("a".into(), "x".into()));
        assert!(!form.push_field("a".into(), "y".into()));
        let result = form.finish();
        assert_eq!(result.fields.get("a").map(String::as_str), Some("x"));
    }

    #[test]
    fn files_keep_order() {
        let mut form = FormCollector::default();
        for (name, size) in [("b.txt", 2), ("a.txt", 1)] {
            form.push_file(FileDescriptor {
                name: name.into(),
                size,
                content_type: String::new(),
            });
        }
        let names: Vec<_> = form.finish().files.into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["b.txt", "a.txt"]);
    }
}
