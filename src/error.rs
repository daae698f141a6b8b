//! Unified error type for unirest.
//!
//! Every fallible operation in the crate returns [`Error`]. The variants fall
//! into three groups:
//! - construction errors raised synchronously by the builder
//!   ([`Error::InvalidArgument`], [`Error::InvalidOperation`])
//! - encode/decode errors ([`Error::Serialization`], [`Error::Deserialization`],
//!   [`Error::Io`])
//! - errors produced while talking to the backend ([`Error::Transport`]) or
//!   requested explicitly by the caller ([`Error::Http`])
//!
//! Transport errors are never reclassified: the backend's own error is kept
//! as the [`source`](std::error::Error::source) of [`Error::Transport`].

use http::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for all unirest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL is malformed, not absolute, uses a scheme other than
    /// `http`/`https`, or a header name/value is not a legal HTTP token.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A body mutation is not allowed in the request's current state.
    ///
    /// Raised when adding fields or a body to a `GET`, adding fields after a
    /// raw body was set, or setting a raw body after fields were added.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The response payload is not valid JSON for the requested type.
    #[error("failed to deserialize response body: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// A request body value could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Reading a stream field failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend failed to deliver the request.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The server answered with a 4xx/5xx status.
    ///
    /// Only produced by [`Response::error_for_status`](crate::Response::error_for_status);
    /// executors never interpret status codes.
    #[error("HTTP error {status}")]
    Http {
        /// HTTP status code
        status: StatusCode,
        /// Response body as text (if it was valid UTF-8)
        body_text: Option<String>,
    },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Wrap a backend error without altering it.
    pub fn transport(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Transport(error.into())
    }

    /// Check if this error was raised while building the request.
    pub const fn is_builder_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidOperation(_))
    }

    /// Check if this is a transport error.
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a client error (4xx HTTP status).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if status.is_client_error())
    }

    /// Check if this is a server error (5xx HTTP status).
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if status.is_server_error())
    }

    /// Get the HTTP status (if this is an HTTP error).
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the response body text (if this is an HTTP error).
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Http { body_text, .. } => body_text.as_deref(),
            _ => None,
        }
    }

    /// Get the error category.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Self::Deserialization(_) => ErrorKind::Deserialization,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Io(_) => ErrorKind::Io,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
        }
    }
}

/// Error category labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed URL, unsupported scheme or illegal header
    InvalidArgument,
    /// Body-mode violation
    InvalidOperation,
    /// Response JSON decoding error
    Deserialization,
    /// Request JSON encoding error
    Serialization,
    /// I/O error
    Io,
    /// Backend error
    Transport,
    /// 4xx/5xx status surfaced on request
    Http,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid_argument"),
            Self::InvalidOperation => write!(f, "invalid_operation"),
            Self::Deserialization => write!(f, "deserialization"),
            Self::Serialization => write!(f, "serialization"),
            Self::Io => write!(f, "io"),
            Self::Transport => write!(f, "transport"),
            Self::Http => write!(f, "http"),
        }
    }
}
