//! # Fluent HTTP request builder
//! Unirest builds a request through chained calls and then sends it, either
//! blocking or as a future, returning the body as text, as a byte stream or
//! as a JSON-decoded value.
//! - One entry point per verb (`get`, `post`, `put`, `patch`, `delete`)
//! - Headers, query pairs and Basic/Bearer authentication
//! - Form fields (URL-encoded, or multipart once a file-like field is added)
//!   or a single raw text/JSON body, never both
//! - Pluggable transport through [`ClientBackend`]
//!
//! # Quick start
//! ```rust,no_run
//! # fn example() -> Result<(), unirest::Error> {
//! let response = unirest::get("https://example.com/")?.as_string()?;
//! println!("{} {}", response.status(), response.body());
//! # Ok(())
//! # }
//! ```
//!
//! # Body rules
//! A `GET` never carries a body. Any other request may receive either form
//! fields or a raw body; whichever comes first seals the request against the
//! other, and the losing call fails with [`Error::InvalidOperation`].
//!
//! # Status codes
//! Executors never turn a status code into an error. Inspect
//! [`Response::status`] or call [`Response::error_for_status`].

pub mod auth;
pub mod backend;
mod body;
mod client;
pub mod error;
mod method;
mod multipart;
mod request;
mod response;

pub use backend::ClientBackend;
#[cfg(feature = "curl-backend")]
pub use backend::DefaultBackend;
pub use body::{Field, FieldValue, FilePart};
pub use client::Client;
pub use error::{Error, ErrorKind, Result};
pub use method::Verb;
pub use request::{DEFAULT_USER_AGENT, Request};
pub use response::{Binary, FromRawResponse, RawResponse, Response};

/// The default backend.
#[cfg(feature = "curl-backend")]
#[must_use]
pub fn client() -> DefaultBackend {
    DefaultBackend::default()
}

/// Start a `GET` request on the default backend.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `url` is not an absolute
/// `http`/`https` URL.
#[cfg(feature = "curl-backend")]
pub fn get(url: impl Into<String>) -> Result<Request<DefaultBackend>> {
    client().get(url)
}

/// Start a `POST` request on the default backend.
///
/// # Errors
///
/// See [`get`].
#[cfg(feature = "curl-backend")]
pub fn post(url: impl Into<String>) -> Result<Request<DefaultBackend>> {
    client().post(url)
}

/// Start a `PUT` request on the default backend.
///
/// # Errors
///
/// See [`get`].
#[cfg(feature = "curl-backend")]
pub fn put(url: impl Into<String>) -> Result<Request<DefaultBackend>> {
    client().put(url)
}

/// Start a `PATCH` request on the default backend.
///
/// # Errors
///
/// See [`get`].
#[cfg(feature = "curl-backend")]
pub fn patch(url: impl Into<String>) -> Result<Request<DefaultBackend>> {
    client().patch(url)
}

/// Start a `DELETE` request on the default backend.
///
/// # Errors
///
/// See [`get`].
#[cfg(feature = "curl-backend")]
pub fn delete(url: impl Into<String>) -> Result<Request<DefaultBackend>> {
    client().delete(url)
}
