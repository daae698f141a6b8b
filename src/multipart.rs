//! `multipart/form-data` encoding for field sets containing binary parts.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::body::{Field, FieldValue};

/// Name given to stream fields added without one.
pub(crate) const UNNAMED_FIELD: &str = "file";

const DEFAULT_BINARY_TYPE: &str = "application/octet-stream";

/// `Content-Type` header value announcing `boundary`.
pub(crate) fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Encode `fields` into a multipart body delimited by `boundary`.
pub(crate) fn encode(boundary: &str, fields: &[Field]) -> Vec<u8> {
    let mut body = Vec::new();

    for field in fields {
        let name = escape(field.name().unwrap_or(UNNAMED_FIELD));
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match field.value() {
            FieldValue::Text(text) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(text.as_bytes());
            }
            FieldValue::Binary(part) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"{}\r\n",
                        name,
                        part.filename()
                            .map(|filename| format!("; filename=\"{}\"", escape(filename)))
                            .unwrap_or_default()
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(
                    format!(
                        "Content-Type: {}\r\n\r\n",
                        part.content_type().unwrap_or(DEFAULT_BINARY_TYPE)
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(part.data());
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// A boundary unique within the process.
pub(crate) fn boundary() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let sequence = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("unirest-{:#x}-{sequence}", monotonic_suffix())
}

fn monotonic_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or_else(|_| 0, |duration| duration.as_micros())
}

// Quotes and line breaks would end the header parameter early.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
