//! The materialized `{headers, body}` a request resolves to.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of a synthesized response.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    /// Nothing was supplied. Writes no bytes and never overrides a route's static body.
    #[default]
    Absent,
    /// A JSON request arrived with an empty body. Writes no bytes, but does
    /// override a route's static body.
    Empty,
    /// Any JSON value, `null` included. Written JSON-encoded.
    Json(Value),
}

impl ResponseBody {
    /// Whether the writer should emit any bytes for this body.
    pub fn has_content(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }
}

impl From<Option<Value>> for ResponseBody {
    fn from(value: Option<Value>) -> Self {
        value.map(ResponseBody::Json).unwrap_or_default()
    }
}

/// Headers and body requested for a single response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ResponseSpec {
    #[serde(default, rename = "response_headers")]
    pub headers: HashMap<String, String>,

    #[serde(default, rename = "response_body", deserialize_with = "present_body")]
    pub body: ResponseBody,
}

impl ResponseSpec {
    /// Spec carrying only the empty-body marker.
    pub fn empty_body() -> Self {
        Self {
            headers: HashMap::new(),
            body: ResponseBody::Empty,
        }
    }
}

// Only invoked when the key is present, so an explicit `null` survives as Json(Null).
fn present_body<'de, D>(deserializer: D) -> Result<ResponseBody, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(ResponseBody::Json)
}
