//! Response delivery.
//!
//! # Design
//! A request delivers to at most one `RequestListener`. Hosts that want
//! broadcast semantics attach an `EnvelopeListener`, which republishes each
//! delivery as a `ResponseEnvelope` on a channel; there is no global bus.

use tokio::sync::mpsc;

use crate::envelope::ResponseEnvelope;
use crate::error::RequestError;
use crate::http::HttpResponse;
use crate::request::TypedRequest;

/// Receives the outcome of a request, exactly once.
///
/// `response` is the raw response recorded for the request, when the
/// transport got that far.
pub trait RequestListener<T>: Send + Sync {
    fn on_success(&self, request: &TypedRequest<T>, response: Option<&HttpResponse>, data: Option<T>);

    fn on_failure(&self, request: &TypedRequest<T>, response: Option<&HttpResponse>, error: &RequestError);
}

/// Listener built from a pair of closures.
pub struct FnListener<S, F> {
    on_success: S,
    on_failure: F,
}

impl<S, F> FnListener<S, F> {
    pub fn new(on_success: S, on_failure: F) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }
}

impl<T, S, F> RequestListener<T> for FnListener<S, F>
where
    S: Fn(&TypedRequest<T>, Option<&HttpResponse>, Option<T>) + Send + Sync,
    F: Fn(&TypedRequest<T>, Option<&HttpResponse>, &RequestError) + Send + Sync,
{
    fn on_success(&self, request: &TypedRequest<T>, response: Option<&HttpResponse>, data: Option<T>) {
        (self.on_success)(request, response, data)
    }

    fn on_failure(&self, request: &TypedRequest<T>, response: Option<&HttpResponse>, error: &RequestError) {
        (self.on_failure)(request, response, error)
    }
}

/// Publishes every delivery as a `ResponseEnvelope`.
pub struct EnvelopeListener<T> {
    tx: mpsc::UnboundedSender<ResponseEnvelope<T>>,
}

impl<T: Send> EnvelopeListener<T> {
    pub fn new(tx: mpsc::UnboundedSender<ResponseEnvelope<T>>) -> Self {
        Self { tx }
    }

    /// A listener together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ResponseEnvelope<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn publish(&self, envelope: ResponseEnvelope<T>) {
        if self.tx.send(envelope).is_err() {
            tracing::debug!("response envelope dropped, receiver closed");
        }
    }
}

fn status_of(response: Option<&HttpResponse>) -> u16 {
    response.map(|r| r.status).unwrap_or(0)
}

impl<T: Send> RequestListener<T> for EnvelopeListener<T> {
    fn on_success(&self, _request: &TypedRequest<T>, response: Option<&HttpResponse>, data: Option<T>) {
        self.publish(ResponseEnvelope::new(data, None, status_of(response)));
    }

    fn on_failure(&self, _request: &TypedRequest<T>, response: Option<&HttpResponse>, error: &RequestError) {
        self.publish(ResponseEnvelope::new(None, Some(error.clone()), status_of(response)));
    }
}
