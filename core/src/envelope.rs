//! The result of one completed exchange, as published to event consumers.

use crate::error::RequestError;

/// Payload, error and status code of a completed request.
///
/// Success is defined by the absence of an error only. A 500 response that
/// carries no error still reports `is_success() == true`; callers must not
/// infer success from the status code.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope<T> {
    status_code: u16,
    error: Option<RequestError>,
    data: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    pub fn new(data: Option<T>, error: Option<RequestError>, status_code: u16) -> Self {
        Self {
            status_code,
            error,
            data,
        }
    }

    /// Status of the recorded response, `0` when none was received.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
