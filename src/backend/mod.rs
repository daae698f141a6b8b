//! HTTP client backends.
//!
//! This module defines the [`ClientBackend`] trait, the transport capability
//! every request is sent through, and the default implementation for the
//! enabled features.

#[cfg(feature = "curl-backend")]
mod curl;
#[cfg(feature = "curl-backend")]
pub use curl::{CurlBackend, CurlError};

use crate::{Result, response::RawResponse};

/// Trait for HTTP client backends.
///
/// A backend receives a fully built request and returns the response as it
/// arrived. It must not interpret the status code; failures to deliver the
/// request are reported as [`Error::Transport`](crate::Error::Transport).
pub trait ClientBackend: Clone + Send + Sync + 'static {
    /// Send `request` and return the raw response.
    fn send(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// The default HTTP client backend.
#[cfg(feature = "curl-backend")]
pub type DefaultBackend = CurlBackend;
