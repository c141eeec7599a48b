//! The seam between typed requests and the host's HTTP client.
//!
//! # Design
//! The core ships no `Transport` implementation. The host wires in whatever
//! client it already runs (with its own pooling, retry and caching) and
//! `dispatch` drives one request through execute, parse and delivery.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::payload::Payload;
use crate::request::TypedRequest;

/// Performs one HTTP exchange.
///
/// Non-2xx statuses should be returned as responses, not errors; the typed
/// request decides which statuses it accepts.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<R: Transport + ?Sized> Transport for &R {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Execute `request` and deliver its outcome to the request's listener,
/// exactly once.
pub fn dispatch<T: Payload, R: Transport + ?Sized>(transport: &R, request: &TypedRequest<T>) {
    let http = request.to_http_request();
    tracing::debug!(method = %http.method, url = %http.url, "dispatching request");

    match transport.execute(http) {
        Ok(response) => match request.parse_network_response(&response) {
            Ok(data) => request.deliver_response(data),
            Err(e) => request.deliver_error(e),
        },
        Err(e) => {
            tracing::debug!(error = %e, "transport failed");
            request.deliver_error(e.into())
        }
    }
}
