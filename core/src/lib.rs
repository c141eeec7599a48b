//! Typed HTTP requests over a host-supplied transport.
//!
//! # Overview
//! `RequestBuilder` collects a method, url, headers, parameters and an
//! optional JSON body object, and builds a `TypedRequest<T>` that knows how
//! to render itself as a plain-data `HttpRequest` and how to parse the
//! matching `HttpResponse` into a `T`. Outcomes go to a `RequestListener`.
//!
//! # Design
//! - The core never touches the network. A `Transport` supplied by the host
//!   executes requests, and owns retries, caching and scheduling.
//! - Configuration (default headers, charset, retry settings) is passed in
//!   through `RequestConfig`; there is no global state.
//! - The expected payload type carries its decoding shape via `Payload`,
//!   with `NoContent` for requests whose body is ignored.
//! - Broadcast-style consumers use `EnvelopeListener`, which publishes each
//!   outcome as a `ResponseEnvelope` on a channel.

pub mod builder;
pub mod config;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod http;
pub mod listener;
pub mod payload;
pub mod request;
pub mod transport;

pub use builder::RequestBuilder;
pub use config::{RequestConfig, RetryPolicy};
pub use encoding::ParamsEncoding;
pub use envelope::ResponseEnvelope;
pub use error::{RequestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use listener::{EnvelopeListener, FnListener, RequestListener};
pub use payload::{NoContent, Payload, PayloadShape};
pub use request::{TypedRequest, DEFAULT_ACCEPTED_STATUS_CODES};
pub use transport::{dispatch, Transport};
