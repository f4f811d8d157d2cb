//! The registered mock endpoint record.

use std::collections::HashMap;

use axum::http::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::http::middleware::latency::Latency;

/// Lowest status code a route may answer with.
pub const MIN_STATUS: u16 = 100;
/// Highest status code a route may answer with.
pub const MAX_STATUS: u16 = 599;

/// A registered mock endpoint.
///
/// Serialized field names follow the bulk-load document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Exact request path; the sole route table key.
    pub path: String,

    /// HTTP method; compared case-insensitively, stored verbatim.
    pub method: String,

    pub status_code: u16,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub response_headers: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub auth_required: bool,

    /// Lower latency bound in milliseconds.
    #[serde(default, rename = "throttling_low", skip_serializing_if = "is_zero")]
    pub throttle_low: u64,

    /// Upper latency bound in milliseconds.
    #[serde(default, rename = "throttling_hi", skip_serializing_if = "is_zero")]
    pub throttle_high: u64,

    /// Requests-per-minute ceiling; zero means unlimited.
    #[serde(default, rename = "rate_limit_per_min", skip_serializing_if = "is_unlimited")]
    pub rate_limit_per_minute: f64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_unlimited(value: &f64) -> bool {
    *value == 0.0
}

/// A route definition that cannot be registered.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("route path '{0}' must start with '/'")]
    InvalidPath(String),

    #[error("route {path}: method '{method}' is not a valid HTTP method token")]
    InvalidMethod { path: String, method: String },

    #[error("route {path}: status code {status} is outside 100-599")]
    InvalidStatus { path: String, status: u16 },

    #[error("route {path}: throttling_low ({low}ms) exceeds throttling_hi ({high}ms)")]
    InvalidLatency { path: String, low: u64, high: u64 },

    #[error("route {path}: rate_limit_per_min must be a finite, non-negative number (got {rate})")]
    InvalidRateLimit { path: String, rate: f64 },

    #[error("route {path}: response header '{name}' is not a valid HTTP header")]
    InvalidHeader { path: String, name: String },
}

impl Route {
    /// Minimal route answering `method path` with `status_code`.
    pub fn new(path: impl Into<String>, method: impl Into<String>, status_code: u16) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            status_code,
            response_headers: HashMap::new(),
            response_body: None,
            auth_required: false,
            throttle_low: 0,
            throttle_high: 0,
            rate_limit_per_minute: 0.0,
        }
    }

    /// Check the invariants the dispatcher relies on.
    pub fn validate(&self) -> Result<(), RouteError> {
        if !self.path.starts_with('/') {
            return Err(RouteError::InvalidPath(self.path.clone()));
        }
        if self.method.is_empty() || !self.method.bytes().all(is_token_byte) {
            return Err(RouteError::InvalidMethod {
                path: self.path.clone(),
                method: self.method.clone(),
            });
        }
        if !(MIN_STATUS..=MAX_STATUS).contains(&self.status_code) {
            return Err(RouteError::InvalidStatus {
                path: self.path.clone(),
                status: self.status_code,
            });
        }
        if self.throttle_low > self.throttle_high {
            return Err(RouteError::InvalidLatency {
                path: self.path.clone(),
                low: self.throttle_low,
                high: self.throttle_high,
            });
        }
        if !self.rate_limit_per_minute.is_finite() || self.rate_limit_per_minute < 0.0 {
            return Err(RouteError::InvalidRateLimit {
                path: self.path.clone(),
                rate: self.rate_limit_per_minute,
            });
        }
        for (name, value) in &self.response_headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err() {
                return Err(RouteError::InvalidHeader {
                    path: self.path.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether a request method selects this route.
    pub fn matches_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// Artificial latency range for this route.
    pub fn latency(&self) -> Latency {
        Latency::new(self.throttle_low, self.throttle_high)
    }
}

// RFC 9110 token characters.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
