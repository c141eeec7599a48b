//! Per-request configuration.
//!
//! # Design
//! Everything a request needs beyond its own descriptor (default headers,
//! charset, retry settings for the transport) is passed in explicitly
//! through `RequestBuilder::config`. There is no process-wide state; a host
//! that wants a shared default keeps one `RequestConfig` and clones it.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoding::ParamsEncoding;

/// Retry settings handed to the transport. The core never retries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub initial_timeout_ms: u64,
    pub max_retries: u32,
    pub backoff_multiplier: f32,
}

impl RetryPolicy {
    pub fn initial_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_timeout_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_timeout_ms: 2500,
            max_retries: 1,
            backoff_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub params_encoding: ParamsEncoding,
    /// Headers every request starts from; per-request headers override them.
    pub default_headers: BTreeMap<String, String>,
    pub retry_policy: RetryPolicy,
}

impl RequestConfig {
    pub fn with_params_encoding(mut self, encoding: ParamsEncoding) -> Self {
        self.params_encoding = encoding;
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }
}
