//! `Authorization` header values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// HTTP Basic credentials. A missing password is sent as empty.
#[must_use]
pub fn basic(username: &str, password: Option<&str>) -> String {
    let credentials = format!("{username}:{}", password.unwrap_or_default());
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

/// A Bearer token.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
