//! Error types for typed requests.
//!
//! # Design
//! Construction misuse is reported immediately by `RequestBuilder::build`.
//! Encoding failures never appear here: body and query construction recover
//! locally. What reaches a listener is either a parse-time failure or a
//! transport failure forwarded unchanged.

use thiserror::Error;

use crate::http::HttpResponse;

/// Failure reported by the host transport, optionally with the raw response
/// it received before giving up.
#[derive(Debug, Clone, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
    pub response: Option<HttpResponse>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }
}

/// Errors produced while building a request or interpreting its response.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// The builder was misused, e.g. a GET request carrying a body object.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A payload was expected but the body could not be decoded into it.
    /// `content` is the raw body, possibly empty.
    #[error("response could not be parsed, API returned: {content}")]
    Parse { content: String },

    /// The response status is not in the request's accepted list.
    #[error("HTTP {status} is not an accepted status code: {body}")]
    UnacceptedStatus { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RequestError {
    /// Raw response attached to the failure, if the transport supplied one.
    pub fn network_response(&self) -> Option<&HttpResponse> {
        match self {
            RequestError::Transport(e) => e.response.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_content() {
        let err = RequestError::Parse {
            content: "not json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "response could not be parsed, API returned: not json"
        );
    }

    #[test]
    fn transport_error_carries_response() {
        let err: RequestError = TransportError::new("timeout")
            .with_response(HttpResponse::new(503, "busy"))
            .into();
        assert_eq!(err.to_string(), "transport failure: timeout");
        assert_eq!(err.network_response().map(|r| r.status), Some(503));
    }

    #[test]
    fn construction_error_has_no_response() {
        let err = RequestError::InvalidArgument("empty url".to_string());
        assert!(err.network_response().is_none());
    }
}
