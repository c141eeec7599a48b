//! Fluent construction of `TypedRequest` values.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::http::HttpMethod;
use crate::listener::RequestListener;
use crate::payload::Payload;
use crate::request::{JsonBody, TypedRequest};

/// Collects the descriptor of a request expecting a `T` response.
///
/// Nothing is validated until `build`, which is also the only place a
/// `TypedRequest` is created. Maps passed to `headers` and `parameters` are
/// copied, so later changes by the caller are not observed.
pub struct RequestBuilder<T> {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) listener: Option<Arc<dyn RequestListener<T>>>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) parameters: Option<BTreeMap<String, String>>,
    pub(crate) body_object: Option<Arc<dyn JsonBody>>,
    pub(crate) config: RequestConfig,
}

impl<T: Payload> RequestBuilder<T> {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            listener: None,
            headers: BTreeMap::new(),
            parameters: None,
            body_object: None,
            config: RequestConfig::default(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn listener(mut self, listener: impl RequestListener<T> + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Set or clear a listener that may be shared between requests.
    pub fn shared_listener(mut self, listener: Option<Arc<dyn RequestListener<T>>>) -> Self {
        self.listener = listener;
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Parameters go to the query string for GET and to the body otherwise.
    pub fn parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters = Some(parameters.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Object serialized as the JSON body of a POST, PUT or PATCH request.
    ///
    /// Serialization is deferred until the body is requested.
    pub fn object<B>(mut self, object: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        self.body_object = Some(Arc::new(object));
        self
    }

    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the descriptor and produce the request.
    ///
    /// Fails with `InvalidArgument` when the url is empty or when a GET
    /// request carries a body object.
    pub fn build(self) -> Result<TypedRequest<T>, RequestError> {
        if self.url.is_empty() {
            return Err(RequestError::InvalidArgument("url must not be empty".to_string()));
        }
        if self.method == HttpMethod::Get && self.body_object.is_some() {
            return Err(RequestError::InvalidArgument(
                "cannot use a json body with a GET request".to_string(),
            ));
        }
        Ok(TypedRequest::from_builder(self))
    }
}
