use crate::{ClientBackend, Request, Result, Verb};

/// Verb entry points, available on every backend.
///
/// ```rust,no_run
/// # fn example() -> Result<(), unirest::Error> {
/// use unirest::{Client, client};
///
/// let response = client()
///     .post("https://example.com/items")?
///     .with_header("Accept", "application/json")?
///     .with_field("name", "widget")?
///     .as_string()?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
pub trait Client: ClientBackend {
    /// Start a request with an arbitrary verb.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `url` is not an absolute `http`/`https` URL.
    fn method(&self, verb: Verb, url: impl Into<String>) -> Result<Request<Self>> {
        Request::new(self.clone(), verb, url)
    }

    /// Start a `GET` request.
    ///
    /// # Errors
    ///
    /// See [`Client::method`].
    fn get(&self, url: impl Into<String>) -> Result<Request<Self>> {
        self.method(Verb::Get, url)
    }

    /// Start a `POST` request.
    ///
    /// # Errors
    ///
    /// See [`Client::method`].
    fn post(&self, url: impl Into<String>) -> Result<Request<Self>> {
        self.method(Verb::Post, url)
    }

    /// Start a `PUT` request.
    ///
    /// # Errors
    ///
    /// See [`Client::method`].
    fn put(&self, url: impl Into<String>) -> Result<Request<Self>> {
        self.method(Verb::Put, url)
    }

    /// Start a `PATCH` request.
    ///
    /// # Errors
    ///
    /// See [`Client::method`].
    fn patch(&self, url: impl Into<String>) -> Result<Request<Self>> {
        self.method(Verb::Patch, url)
    }

    /// Start a `DELETE` request.
    ///
    /// # Errors
    ///
    /// See [`Client::method`].
    fn delete(&self, url: impl Into<String>) -> Result<Request<Self>> {
        self.method(Verb::Delete, url)
    }
}

impl<T: ClientBackend> Client for T {}
