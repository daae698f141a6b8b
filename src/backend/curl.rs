use std::str;

use anyhow::anyhow;
use curl::easy::{Easy2, Handler, List, ReadError, WriteError};
use http::{
    HeaderMap, StatusCode,
    header::{HeaderName, HeaderValue},
};
use thiserror::Error;

use crate::{ClientBackend, Error, response::RawResponse};

/// HTTP backend implemented with libcurl.
///
/// Each request runs on the `blocking` thread pool, so the returned future
/// never blocks the executor polling it.
#[derive(Debug, Clone, Default)]
pub struct CurlBackend {
    _private: (),
}

/// Errors raised by [`CurlBackend`], carried as the source of
/// [`Error::Transport`].
#[derive(Debug, Error)]
pub enum CurlError {
    /// The request could not be handed to libcurl.
    #[error("bad request: {0}")]
    BadRequest(#[source] anyhow::Error),
    /// libcurl failed to complete the exchange.
    #[error("bad gateway: {0}")]
    BadGateway(#[source] anyhow::Error),
}

impl CurlError {
    fn bad_request(error: impl Into<anyhow::Error>) -> Self {
        Self::BadRequest(error.into())
    }

    fn bad_gateway(error: impl Into<anyhow::Error>) -> Self {
        Self::BadGateway(error.into())
    }
}

impl From<CurlError> for Error {
    fn from(error: CurlError) -> Self {
        Self::transport(error)
    }
}

impl CurlBackend {
    /// Create a new backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientBackend for CurlBackend {
    async fn send(&self, request: http::Request<Vec<u8>>) -> crate::Result<RawResponse> {
        let prepared = prepare(request)?;
        log::trace!("curl: {} {}", prepared.method, prepared.url);
        let response = blocking::unblock(move || perform(prepared)).await?;
        Ok(response)
    }
}

fn prepare(request: http::Request<Vec<u8>>) -> Result<PreparedRequest, CurlError> {
    let (parts, body) = request.into_parts();
    let mut headers = Vec::with_capacity(parts.headers.len());
    for (name, value) in &parts.headers {
        let value_str = value.to_str().map_err(CurlError::bad_request)?;
        headers.push((name.as_str().to_string(), value_str.to_string()));
    }

    Ok(PreparedRequest {
        method: parts.method.as_str().to_owned(),
        url: parts.uri.to_string(),
        headers,
        body,
    })
}

fn perform(request: PreparedRequest) -> Result<RawResponse, CurlError> {
    let handler = CurlHandler::new(request.body);
    let upload_len = handler.request_body_len();

    let mut easy = Easy2::new(handler);
    easy.url(&request.url).map_err(map_curl_error)?;
    easy.custom_request(&request.method)
        .map_err(map_curl_error)?;

    if upload_len > 0 {
        easy.upload(true).map_err(map_curl_error)?;
        easy.in_filesize(upload_len as u64)
            .map_err(map_curl_error)?;
    }

    let mut list = List::new();
    for (name, value) in &request.headers {
        list.append(&format!("{name}: {value}"))
            .map_err(map_curl_error)?;
    }
    // Uploads would otherwise wait for a `100 Continue` round-trip.
    list.append("Expect:").map_err(map_curl_error)?;
    easy.http_headers(list).map_err(map_curl_error)?;

    easy.perform().map_err(map_curl_error)?;

    let handler = easy.get_mut();
    let response = handler.take_response().map_err(CurlError::bad_gateway)?;
    log::trace!(
        "curl: received {} ({} bytes)",
        response.status,
        response.body.len()
    );

    let mut http_response = http::Response::new(response.body);
    *http_response.status_mut() = response.status;
    *http_response.headers_mut() = response.headers;

    Ok(http_response)
}

fn map_curl_error(error: curl::Error) -> CurlError {
    CurlError::bad_gateway(error)
}

#[derive(Debug)]
struct PreparedRequest {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

#[derive(Debug)]
struct CurlHandler {
    request_body: Option<Vec<u8>>,
    offset: usize,
    response_body: Vec<u8>,
    headers: HeaderMap,
    status: Option<StatusCode>,
}

impl CurlHandler {
    fn new(body: Vec<u8>) -> Self {
        let request_body = if body.is_empty() { None } else { Some(body) };
        Self {
            request_body,
            offset: 0,
            response_body: Vec::new(),
            headers: HeaderMap::new(),
            status: None,
        }
    }

    fn request_body_len(&self) -> usize {
        self.request_body.as_ref().map_or(0, Vec::len)
    }

    fn take_response(&mut self) -> anyhow::Result<SessionResponse> {
        let status = self
            .status
            .ok_or_else(|| anyhow!("curl response missing HTTP status line"))?;
        Ok(SessionResponse {
            status,
            headers: std::mem::take(&mut self.headers),
            body: std::mem::take(&mut self.response_body),
        })
    }

    fn parse_header_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }

        // A new status line starts a new header block (e.g. after `100 Continue`).
        if let Some(rest) = line.strip_prefix("HTTP/")
            && let Some(code) = rest.split_whitespace().nth(1)
            && let Ok(value) = code.parse::<u16>()
            && let Ok(status) = StatusCode::from_u16(value)
        {
            self.status = Some(status);
            self.headers.clear();
            return;
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                return;
            }

            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                self.headers.append(header_name, header_value);
            }
        }
    }
}

impl Handler for CurlHandler {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.response_body.extend_from_slice(data);
        Ok(data.len())
    }

    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(line) = str::from_utf8(data) {
            self.parse_header_line(line.trim());
        }
        true
    }

    fn read(&mut self, data: &mut [u8]) -> Result<usize, ReadError> {
        if let Some(body) = &self.request_body {
            if self.offset >= body.len() {
                return Ok(0);
            }
            let remaining = &body[self.offset..];
            let len = remaining.len().min(data.len());
            data[..len].copy_from_slice(&remaining[..len]);
            self.offset += len;
            Ok(len)
        } else {
            Ok(0)
        }
    }
}

#[derive(Debug)]
struct SessionResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}
