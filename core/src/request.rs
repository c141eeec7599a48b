//! A built request: descriptor plus the behavior around one HTTP exchange.
//!
//! # Design
//! `TypedRequest` is immutable apart from two things. The accepted status
//! codes can be extended before the request is dispatched, and the raw
//! response is recorded once, by whichever of parse or error delivery sees
//! it first. The latter lives in a `OnceLock` because the transport may parse
//! on a worker thread and deliver on another.
//!
//! Body and url construction are pure functions of the descriptor and never
//! fail: a body object that cannot be serialized degrades to a JSON body built
//! from the parameters, and a pair the charset cannot encode is dropped from
//! the query string or form body. Both are logged. JSON bodies are always
//! UTF-8; the configured charset only applies to form-encoded parameters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::builder::RequestBuilder;
use crate::config::{RequestConfig, RetryPolicy};
use crate::encoding::{encode_pairs, ParamsEncoding};
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::listener::RequestListener;
use crate::payload::{Payload, PayloadShape};

pub const DEFAULT_ACCEPTED_STATUS_CODES: [u16; 4] = [200, 201, 202, 204];

const CONTENT_TYPE: &str = "Content-Type";

/// A body object whose serialization is deferred until the body is built.
pub(crate) trait JsonBody: Send + Sync {
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;
}

impl<B: Serialize + Send + Sync> JsonBody for B {
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A request expecting a `T` response, created by `RequestBuilder::build`.
pub struct TypedRequest<T> {
    method: HttpMethod,
    url: String,
    headers: BTreeMap<String, String>,
    parameters: Option<BTreeMap<String, String>>,
    body_object: Option<Arc<dyn JsonBody>>,
    listener: Option<Arc<dyn RequestListener<T>>>,
    config: RequestConfig,
    accepted_status_codes: Vec<u16>,
    network_response: OnceLock<HttpResponse>,
}

impl<T: Payload> TypedRequest<T> {
    pub(crate) fn from_builder(builder: RequestBuilder<T>) -> Self {
        Self {
            method: builder.method,
            url: builder.url,
            headers: builder.headers,
            parameters: builder.parameters,
            body_object: builder.body_object,
            listener: builder.listener,
            config: builder.config,
            accepted_status_codes: DEFAULT_ACCEPTED_STATUS_CODES.to_vec(),
            network_response: OnceLock::new(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The url as given to the builder, without query parameters.
    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub fn parameters(&self) -> Option<&BTreeMap<String, String>> {
        self.parameters.as_ref()
    }

    pub fn has_body_object(&self) -> bool {
        self.body_object.is_some()
    }

    pub fn params_encoding(&self) -> ParamsEncoding {
        self.config.params_encoding
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.config.retry_policy
    }

    /// Only GET responses may be served from the transport's cache.
    pub fn should_cache(&self) -> bool {
        self.method == HttpMethod::Get
    }

    pub fn accepted_status_codes(&self) -> &[u16] {
        &self.accepted_status_codes
    }

    pub fn add_accepted_status_code(&mut self, status: u16) {
        self.accepted_status_codes.push(status);
    }

    pub fn add_accepted_status_codes(&mut self, statuses: &[u16]) {
        self.accepted_status_codes.extend_from_slice(statuses);
    }

    /// Raw response recorded during parse or error delivery.
    pub fn network_response(&self) -> Option<&HttpResponse> {
        self.network_response.get()
    }

    /// Default headers overlaid with the request's own headers.
    ///
    /// `Content-Type` is dropped when the request has no body content type.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.config.default_headers.clone();
        headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        if self.body_content_type().is_none() {
            headers.retain(|k, _| !k.eq_ignore_ascii_case(CONTENT_TYPE));
        }
        headers
    }

    /// JSON bodies are always UTF-8, whatever the parameter charset.
    pub fn json_content_type(&self) -> String {
        "application/json; charset=UTF-8".to_string()
    }

    pub fn form_content_type(&self) -> String {
        format!(
            "application/x-www-form-urlencoded; charset={}",
            self.config.params_encoding.charset()
        )
    }

    /// Content type of the body this request would send, if any.
    pub fn body_content_type(&self) -> Option<String> {
        if self.method == HttpMethod::Get {
            return None;
        }
        if self.method.accepts_json_body() && self.body_object.is_some() {
            return Some(self.json_content_type());
        }
        self.has_form_parameters().then(|| self.form_content_type())
    }

    fn has_form_parameters(&self) -> bool {
        self.parameters.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn body(&self) -> Option<Vec<u8>> {
        if self.method == HttpMethod::Get {
            return None;
        }
        if self.body_content_type() == Some(self.json_content_type()) {
            return Some(self.json_body());
        }
        self.form_body()
    }

    /// The body object as UTF-8 JSON.
    ///
    /// If the object cannot be serialized, the parameters are sent as a JSON
    /// object instead (`{}` when there are none).
    pub fn json_body(&self) -> Vec<u8> {
        let serialized = match &self.body_object {
            Some(object) => object.to_json(),
            None => serde_json::to_vec(&serde_json::Value::Null),
        };
        match serialized {
            Ok(bytes) => {
                tracing::debug!(body = %String::from_utf8_lossy(&bytes), "sending json body");
                bytes
            }
            Err(e) => {
                let text = self.parameters_as_json();
                tracing::debug!(error = %e, body = %text, "body object failed to serialize, sending json from parameters");
                text.into_bytes()
            }
        }
    }

    fn parameters_as_json(&self) -> String {
        let object: serde_json::Map<String, serde_json::Value> = self
            .parameters
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(object).to_string()
    }

    fn form_body(&self) -> Option<Vec<u8>> {
        let parameters = self.parameters.as_ref().filter(|p| !p.is_empty())?;
        Some(encode_pairs(parameters, self.config.params_encoding).into_bytes())
    }

    /// The url to send, with parameters in the query string for GET.
    pub fn url(&self) -> String {
        match &self.parameters {
            Some(parameters) if self.method == HttpMethod::Get && !parameters.is_empty() => {
                let query = encode_pairs(parameters, self.config.params_encoding);
                if query.is_empty() {
                    self.url.clone()
                } else {
                    format!("{}?{}", self.url, query)
                }
            }
            _ => self.url.clone(),
        }
    }

    /// Render the request as plain data for the transport.
    pub fn to_http_request(&self) -> HttpRequest {
        let mut headers: Vec<(String, String)> = self.headers().into_iter().collect();
        if let Some(content_type) = self.body_content_type() {
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(CONTENT_TYPE)) {
                headers.push((CONTENT_TYPE.to_string(), content_type));
            }
        }
        HttpRequest {
            method: self.method,
            url: self.url(),
            headers,
            body: self.body(),
        }
    }

    /// Interpret the raw response as a `T`.
    ///
    /// Statuses outside the accepted list are rejected before decoding.
    /// `NoContent` requests never decode and always yield `Ok(None)`. For
    /// every other payload a body that does not decode is a `Parse` error
    /// carrying the raw content.
    pub fn parse_network_response(&self, response: &HttpResponse) -> Result<Option<T>, RequestError> {
        let _ = self.network_response.set(response.clone());

        if !self.accepted_status_codes.contains(&response.status) {
            return Err(RequestError::UnacceptedStatus {
                status: response.status,
                body: response.body_text(),
            });
        }

        let data = match T::SHAPE {
            PayloadShape::NoContent => None,
            shape => match decode::<T>(&response.body) {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!(error = %e, ?shape, "an error occurred while parsing network response");
                    None
                }
            },
        };

        if data.is_none() && T::SHAPE != PayloadShape::NoContent {
            let content = response.body_text();
            tracing::error!(content = %content, "return data is empty");
            return Err(RequestError::Parse { content });
        }
        Ok(data)
    }

    pub fn deliver_response(&self, data: Option<T>) {
        if let Some(listener) = &self.listener {
            listener.on_success(self, self.network_response(), data);
        }
    }

    /// Record the error's raw response unless one is already recorded, then
    /// hand the error to the listener.
    pub fn deliver_error(&self, error: RequestError) {
        if let Some(response) = error.network_response() {
            let _ = self.network_response.set(response.clone());
        }
        if let Some(listener) = &self.listener {
            listener.on_failure(self, self.network_response(), &error);
        }
    }
}

impl<T> fmt::Debug for TypedRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("parameters", &self.parameters)
            .field("has_body_object", &self.body_object.is_some())
            .field("has_listener", &self.listener.is_some())
            .field("accepted_status_codes", &self.accepted_status_codes)
            .finish()
    }
}

/// Decode a response body, treating a JSON `null` document as no result.
fn decode<T: Payload>(body: &[u8]) -> serde_json::Result<Option<T>> {
    match serde_json::from_slice::<serde_json::Value>(body)? {
        serde_json::Value::Null => Ok(None),
        value => serde_json::from_value(value).map(Some),
    }
}
