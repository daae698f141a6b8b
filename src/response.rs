//! Typed response envelope.
//!
//! A [`Response`] pairs the untouched [`RawResponse`] returned by the backend
//! with a body decoded exactly once, at construction. Which decoding is
//! applied depends on the executor that produced it: text, a binary stream,
//! or JSON.

use core::pin::Pin;
use core::task::{Context, Poll};
use std::io::{self, Cursor, Read};

use http::{HeaderMap, StatusCode, header};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// The response exactly as the backend returned it.
pub type RawResponse = http::Response<Vec<u8>>;

/// Response payload exposed as a readable byte stream.
///
/// Implements both [`std::io::Read`] and [`futures_io::AsyncRead`].
#[derive(Debug, Clone, Default)]
pub struct Binary {
    inner: Cursor<Vec<u8>>,
}

impl Binary {
    /// Wrap `bytes` in a stream positioned at the start.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(bytes),
        }
    }

    /// Total length of the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// Give back the whole payload, regardless of read position.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for Binary {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl futures_io::AsyncRead for Binary {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(self.get_mut().inner.read(buf))
    }
}

/// Body types a [`Response`] can be decoded into without JSON.
pub trait FromRawResponse: Sized {
    /// Decode the payload of `raw`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be represented as `Self`.
    fn from_raw(raw: &RawResponse) -> Result<Self>;
}

impl FromRawResponse for String {
    fn from_raw(raw: &RawResponse) -> Result<Self> {
        Ok(decode_text(raw.headers(), raw.body()))
    }
}

impl FromRawResponse for Binary {
    fn from_raw(raw: &RawResponse) -> Result<Self> {
        Ok(Self::new(raw.body().clone()))
    }
}

/// A decoded response together with the raw response it came from.
#[derive(Debug)]
pub struct Response<T> {
    raw: RawResponse,
    body: T,
}

impl<T: FromRawResponse> Response<T> {
    /// Decode `raw` as text or as a binary stream.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn new(raw: RawResponse) -> Result<Self> {
        let body = T::from_raw(&raw)?;
        Ok(Self { raw, body })
    }
}

impl<T: DeserializeOwned> Response<T> {
    /// Decode the payload of `raw` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deserialization`] if the payload is not valid JSON
    /// for `T`.
    pub fn from_json(raw: RawResponse) -> Result<Self> {
        let body = serde_json::from_slice(raw.body()).map_err(Error::Deserialization)?;
        Ok(Self { raw, body })
    }
}

impl<T> Response<T> {
    /// The decoded body.
    pub const fn body(&self) -> &T {
        &self.body
    }

    /// Consume the response and return the decoded body.
    pub fn into_body(self) -> T {
        self.body
    }

    /// The untouched response from the backend.
    pub const fn raw_response(&self) -> &RawResponse {
        &self.raw
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.raw.status()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.raw.headers()
    }

    /// Turn a 4xx/5xx response into [`Error::Http`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] carrying the status and the body text.
    pub fn error_for_status(self) -> Result<Self> {
        let status = self.raw.status();
        if status.is_client_error() || status.is_server_error() {
            let body_text = String::from_utf8(self.raw.body().clone()).ok();
            return Err(Error::Http { status, body_text });
        }
        Ok(self)
    }
}

/// Decode `bytes` with the charset declared in `Content-Type`, UTF-8 otherwise.
fn decode_text(headers: &HeaderMap, bytes: &[u8]) -> String {
    match charset(headers).as_deref() {
        Some("iso-8859-1" | "latin1" | "l1" | "us-ascii" | "ascii")
            if !bytes.is_ascii() =>
        {
            bytes.iter().copied().map(char::from).collect()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}
