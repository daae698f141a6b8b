//! The request builder.
//!
//! A [`Request`] is created for one [`Verb`] and an absolute `http`/`https`
//! URL, then shaped with chainable mutators and finally sent with one of the
//! terminal executors:
//!
//! | async                 | blocking        | body type        |
//! |-----------------------|-----------------|------------------|
//! | [`as_string_async`]   | [`as_string`]   | `String`         |
//! | [`as_binary_async`]   | [`as_binary`]   | [`Binary`]       |
//! | [`as_json_async`]     | [`as_json`]     | any `Deserialize`|
//!
//! Executors borrow the request, so it can be sent more than once.
//!
//! [`as_string_async`]: Request::as_string_async
//! [`as_string`]: Request::as_string
//! [`as_binary_async`]: Request::as_binary_async
//! [`as_binary`]: Request::as_binary
//! [`as_json_async`]: Request::as_json_async
//! [`as_json`]: Request::as_json

use core::fmt::Display;
use std::io::Read;

use http::{
    HeaderMap, Method, Uri,
    header::{self, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::{
    ClientBackend, Error, Result, Verb, auth,
    body::{BodyMode, Field, FieldValue, FilePart, RawBody},
    response::{Binary, RawResponse, Response},
};

/// `User-Agent` sent when the caller does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("unirest-rs/", env!("CARGO_PKG_VERSION"));

/// A request under construction.
///
/// Mutators take `&mut self`; a request belongs to a single flow of control
/// until it is sent. A mutator that fails leaves the request unchanged.
#[derive(Debug, Clone)]
pub struct Request<B> {
    backend: B,
    verb: Verb,
    url: Url,
    original_url: String,
    headers: HeaderMap,
    body: BodyMode,
}

impl<B: ClientBackend> Request<B> {
    /// Create a request sent through `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `url` is not an absolute URL
    /// with a host, or if its scheme is not `http` or `https`.
    pub fn new(backend: B, verb: Verb, url: impl Into<String>) -> Result<Self> {
        let original_url = url.into();
        let url = parse_url(&original_url)?;
        Ok(Self {
            backend,
            verb,
            url,
            original_url,
            headers: HeaderMap::new(),
            body: BodyMode::Empty,
        })
    }

    /// The request verb.
    pub const fn method(&self) -> Verb {
        self.verb
    }

    /// The parsed target URL, including any query pairs added later.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// The URL string the request was created with, unchanged.
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// Headers set so far.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The currently encoded payload, `None` when the request has no body.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.payload()
    }

    /// Content type of the current payload.
    pub fn content_type(&self) -> Option<&str> {
        self.body.content_type()
    }

    /// Form fields accumulated so far.
    pub fn fields(&self) -> &[Field] {
        self.body.fields()
    }

    /// The backend the request will be sent through.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Insert a header, replacing any previous value for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the name or value is not a legal
    /// HTTP header token.
    pub fn with_header<K, V>(&mut self, name: K, value: V) -> Result<&mut Self>
    where
        K: TryInto<HeaderName>,
        K::Error: Display,
        V: TryInto<HeaderValue>,
        V::Error: Display,
    {
        let (name, value) = header_pair(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Insert every header of `headers`. An empty iterator is a no-op.
    ///
    /// Either all headers are applied or, on error, none are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any name or value is not a legal
    /// HTTP header token.
    pub fn with_headers<I, K, V>(&mut self, headers: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: TryInto<HeaderName>,
        K::Error: Display,
        V: TryInto<HeaderValue>,
        V::Error: Display,
    {
        let pairs = headers
            .into_iter()
            .map(|(name, value)| header_pair(name, value))
            .collect::<Result<Vec<_>>>()?;
        for (name, value) in pairs {
            self.headers.insert(name, value);
        }
        Ok(self)
    }

    /// Set `Authorization` to HTTP Basic credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the credentials produce an
    /// illegal header value.
    pub fn with_basic_auth(
        &mut self,
        username: &str,
        password: Option<&str>,
    ) -> Result<&mut Self> {
        self.with_header(header::AUTHORIZATION, auth::basic(username, password))
    }

    /// Set `Authorization` to a Bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the token is not a legal header
    /// value.
    pub fn with_bearer_auth(&mut self, token: &str) -> Result<&mut Self> {
        self.with_header(header::AUTHORIZATION, auth::bearer(token))
    }

    /// Append a query pair to the target URL.
    pub fn with_query(&mut self, name: &str, value: &str) -> &mut Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Add a named form field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a `GET` request or if a raw
    /// body was already set.
    pub fn with_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self> {
        self.ensure_fields_allowed()?;
        self.body.add_fields([Field::named(name, value)]);
        Ok(self)
    }

    /// Add an unnamed file-like field with the whole content of `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a `GET` request or if a raw
    /// body was already set, and [`Error::Io`] if reading fails.
    pub fn with_stream_field(&mut self, reader: impl Read) -> Result<&mut Self> {
        self.ensure_fields_allowed()?;
        let part = FilePart::from_reader(reader)?;
        self.body.add_fields([Field::unnamed(part)]);
        Ok(self)
    }

    /// Add a named file-like field with the whole content of `reader`.
    ///
    /// # Errors
    ///
    /// Same as [`Request::with_stream_field`].
    pub fn with_named_stream_field(
        &mut self,
        name: impl Into<String>,
        reader: impl Read,
    ) -> Result<&mut Self> {
        self.ensure_fields_allowed()?;
        let part = FilePart::from_reader(reader)?;
        self.body.add_fields([Field::named(name, part)]);
        Ok(self)
    }

    /// Add a named file field with an explicit filename and content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a `GET` request or if a raw
    /// body was already set.
    pub fn with_file_field(
        &mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<&mut Self> {
        self.ensure_fields_allowed()?;
        let part = FilePart::new(bytes)
            .with_filename(filename)
            .with_content_type(content_type);
        self.body.add_fields([Field::named(name, part)]);
        Ok(self)
    }

    /// Add every field of `fields`. An empty iterator leaves the request
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a `GET` request or if a raw
    /// body was already set.
    pub fn with_fields<I, K, V>(&mut self, fields: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.ensure_fields_allowed()?;
        let fields: Vec<Field> = fields
            .into_iter()
            .map(|(name, value)| Field::named(name, value))
            .collect();
        if !fields.is_empty() {
            self.body.add_fields(fields);
        }
        Ok(self)
    }

    /// Set a text body, replacing any previous raw body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a `GET` request or if form
    /// fields were already added.
    pub fn with_body(&mut self, text: impl Into<String>) -> Result<&mut Self> {
        self.ensure_raw_body_allowed()?;
        self.body.set_raw(RawBody::text(text));
        Ok(self)
    }

    /// Set a JSON body encoded from `value`, replacing any previous raw body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a `GET` request or if form
    /// fields were already added, and [`Error::Serialization`] if `value`
    /// cannot be encoded.
    pub fn with_json_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.ensure_raw_body_allowed()?;
        let bytes = serde_json::to_vec(value).map_err(Error::Serialization)?;
        self.body.set_raw(RawBody::json(bytes));
        Ok(self)
    }

    fn ensure_fields_allowed(&self) -> Result<()> {
        if !self.verb.accepts_body() {
            return Err(Error::invalid_operation(format!(
                "{} requests cannot carry form fields",
                self.verb
            )));
        }
        if self.body.has_raw_body() {
            return Err(Error::invalid_operation(
                "cannot add form fields to a request that already has a raw body",
            ));
        }
        Ok(())
    }

    fn ensure_raw_body_allowed(&self) -> Result<()> {
        if !self.verb.accepts_body() {
            return Err(Error::invalid_operation(format!(
                "{} requests cannot carry a body",
                self.verb
            )));
        }
        if self.body.has_fields() {
            return Err(Error::invalid_operation(
                "cannot set a raw body on a request that already has form fields",
            ));
        }
        Ok(())
    }

    /// Build the request handed to the backend.
    ///
    /// Adds `Content-Type` for the body and a default `User-Agent` unless
    /// the caller set them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the URL cannot be represented as
    /// an [`http::Uri`].
    pub fn to_http(&self) -> Result<http::Request<Vec<u8>>> {
        let uri: Uri = self
            .url
            .as_str()
            .parse()
            .map_err(|error| Error::invalid_argument(format!("invalid URL: {error}")))?;

        let mut headers = self.headers.clone();
        if let Some(content_type) = self.body.content_type()
            && !headers.contains_key(header::CONTENT_TYPE)
        {
            let value = HeaderValue::from_str(content_type)
                .map_err(|error| Error::invalid_argument(format!("invalid content type: {error}")))?;
            headers.insert(header::CONTENT_TYPE, value);
        }
        if !headers.contains_key(header::USER_AGENT) {
            headers.insert(
                header::USER_AGENT,
                HeaderValue::from_static(DEFAULT_USER_AGENT),
            );
        }

        let mut request = http::Request::new(self.body().map(<[u8]>::to_vec).unwrap_or_default());
        *request.method_mut() = Method::from(self.verb);
        *request.uri_mut() = uri;
        *request.headers_mut() = headers;
        Ok(request)
    }

    /// Send the request and return the raw response.
    ///
    /// Status codes are not interpreted; backend failures are returned as
    /// they are.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`Error::Transport`] if sending fails.
    pub async fn execute(&self) -> Result<RawResponse> {
        let request = self.to_http()?;
        log::debug!(
            "sending {} {} ({} byte body)",
            self.verb,
            self.url,
            request.body().len()
        );
        let response = self.backend.send(request).await?;
        log::debug!(
            "received {} for {} {} ({} bytes)",
            response.status(),
            self.verb,
            self.url,
            response.body().len()
        );
        Ok(response)
    }

    /// Send the request and decode the payload as text.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if sending fails.
    pub async fn as_string_async(&self) -> Result<Response<String>> {
        Response::new(self.execute().await?)
    }

    /// Send the request and expose the payload as a binary stream.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if sending fails.
    pub async fn as_binary_async(&self) -> Result<Response<Binary>> {
        Response::new(self.execute().await?)
    }

    /// Send the request and decode the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if sending fails, and
    /// [`Error::Deserialization`] if the payload is not valid JSON for `T`.
    pub async fn as_json_async<T: DeserializeOwned>(&self) -> Result<Response<T>> {
        Response::from_json(self.execute().await?)
    }

    /// Blocking version of [`Request::as_string_async`].
    ///
    /// # Errors
    ///
    /// Same as [`Request::as_string_async`].
    pub fn as_string(&self) -> Result<Response<String>> {
        async_io::block_on(self.as_string_async())
    }

    /// Blocking version of [`Request::as_binary_async`].
    ///
    /// # Errors
    ///
    /// Same as [`Request::as_binary_async`].
    pub fn as_binary(&self) -> Result<Response<Binary>> {
        async_io::block_on(self.as_binary_async())
    }

    /// Blocking version of [`Request::as_json_async`].
    ///
    /// # Errors
    ///
    /// Same as [`Request::as_json_async`].
    pub fn as_json<T: DeserializeOwned>(&self) -> Result<Response<T>> {
        async_io::block_on(self.as_json_async())
    }
}

fn header_pair<K, V>(name: K, value: V) -> Result<(HeaderName, HeaderValue)>
where
    K: TryInto<HeaderName>,
    K::Error: Display,
    V: TryInto<HeaderValue>,
    V::Error: Display,
{
    let name = name
        .try_into()
        .map_err(|error| Error::invalid_argument(format!("invalid header name: {error}")))?;
    let value: HeaderValue = value
        .try_into()
        .map_err(|error| Error::invalid_argument(format!("invalid header value: {error}")))?;
    // Backends hand header values over as text; obs-text bytes would only fail at send time.
    if value.to_str().is_err() {
        return Err(Error::invalid_argument(format!(
            "header `{name}` has a value that is not visible ASCII"
        )));
    }
    Ok((name, value))
}

/// Parse an absolute `http`/`https` URL with a non-empty authority.
///
/// The WHATWG parser accepts forms such as `http:///host` or `http:host`
/// by repairing them; those are rejected here before parsing. So is `\`,
/// which the parser reads as `/` for special schemes.
fn parse_url(input: &str) -> Result<Url> {
    if input.contains('\\') || input.chars().any(char::is_control) {
        return Err(Error::invalid_argument(format!(
            "`{input}` is not a well-formed absolute URL"
        )));
    }

    let (scheme, rest) = input
        .split_once(':')
        .ok_or_else(|| Error::invalid_argument(format!("`{input}` is not an absolute URL")))?;

    if !(scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) {
        return Err(Error::invalid_argument(format!(
            "unsupported URL scheme `{scheme}`, expected http or https"
        )));
    }

    let authority = rest
        .strip_prefix("//")
        .map(|after| after.split(['/', '?', '#']).next().unwrap_or_default())
        .unwrap_or_default();
    if authority.is_empty() || input.trim() != input {
        return Err(Error::invalid_argument(format!(
            "`{input}` is not a well-formed absolute URL"
        )));
    }

    let url = Url::parse(input)
        .map_err(|error| Error::invalid_argument(format!("`{input}` is not a valid URL: {error}")))?;
    if url.host().is_none() {
        return Err(Error::invalid_argument(format!("`{input}` has no host")));
    }
    Ok(url)
}
