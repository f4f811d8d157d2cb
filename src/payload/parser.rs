//! Reconstructs a [`ResponseSpec`] from a request's JSON body or query string.
//!
//! # Precedence
//! 1. JSON content type with a body: the body is decoded as
//!    `{"response_headers": {...}, "response_body": <any>}`.
//! 2. JSON content type without a body: the empty-body marker.
//! 3. Anything else: query parameters, one dot level deep.
//!    - `response_headers.<Name>=<value>` sets a header
//!    - `response_body.<field>=<json object>` replaces the whole body
//!    - `response_body=<text>` sets a JSON string body
//!
//! Only the first two dot segments of a key are examined; everything after
//! the second dot is ignored. Unrecognized keys are ignored.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::payload::spec::{ResponseBody, ResponseSpec};

const HEADERS_KEY: &str = "response_headers";
const BODY_KEY: &str = "response_body";

/// Reasons a request cannot be turned into a response spec.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The JSON request body did not decode into `{response_headers, response_body}`.
    #[error("Invalid JSON payload")]
    InvalidPayload(#[source] serde_json::Error),

    /// A `response_body.<field>` query value was not a JSON object.
    #[error("Invalid response body")]
    InvalidResponseBody(#[source] serde_json::Error),
}

/// Whether a `Content-Type` value names JSON, ignoring parameters and case.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Decode a JSON request body into a spec.
///
/// A body made only of whitespace counts as empty and yields the
/// empty-body marker.
pub fn parse_json_spec(body: &[u8]) -> Result<ResponseSpec, SpecError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseSpec::empty_body());
    }
    serde_json::from_slice(body).map_err(SpecError::InvalidPayload)
}

/// Resolve the response spec for a magic-route request.
pub fn parse_response_spec(
    content_type: Option<&str>,
    query: Option<&str>,
    body: &[u8],
) -> Result<ResponseSpec, SpecError> {
    if is_json_content_type(content_type) {
        return parse_json_spec(body);
    }
    match query {
        Some(query) => parse_query_spec(query),
        None => Ok(ResponseSpec::default()),
    }
}

fn parse_query_spec(query: &str) -> Result<ResponseSpec, SpecError> {
    let mut spec = ResponseSpec::default();
    let mut seen = HashSet::new();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if !seen.insert(key.clone()) {
            continue;
        }

        let mut segments = key.split('.');
        let head = segments.next().unwrap_or_default();
        match (head, segments.next()) {
            (HEADERS_KEY, Some(name)) if !name.is_empty() => {
                spec.headers.insert(name.to_string(), value.into_owned());
            }
            (BODY_KEY, Some(_)) => {
                let object: Map<String, Value> =
                    serde_json::from_str(&value).map_err(SpecError::InvalidResponseBody)?;
                spec.body = ResponseBody::Json(Value::Object(object));
            }
            (BODY_KEY, None) => {
                spec.body = ResponseBody::Json(Value::String(value.into_owned()));
            }
            _ => {}
        }
    }

    Ok(spec)
}
