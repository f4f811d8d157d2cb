//! Response writer.
//!
//! # Responsibilities
//! - Apply response headers verbatim (a later duplicate name wins)
//! - Set the status code
//! - JSON-encode the body, or write nothing for an absent/empty body
//!
//! # Design Decisions
//! - The body is encoded before the response is handed to hyper, so an
//!   encoding failure still becomes a clean 500
//! - No Content-Type is added; callers control every header
//! - Transport write failures after the status is sent are not reportable to
//!   the client and only surface in hyper's connection logs

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use thiserror::Error;

use crate::payload::ResponseBody;

/// A response that cannot be produced from the requested parts.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("invalid response header name '{0}'")]
    InvalidHeaderName(String),

    #[error("invalid value for response header '{0}'")]
    InvalidHeaderValue(String),

    #[error("Error processing response body")]
    Serialize(#[source] serde_json::Error),
}

impl WriteError {
    /// Status reported to the client for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            WriteError::InvalidHeaderName(_) | WriteError::InvalidHeaderValue(_) => {
                StatusCode::BAD_REQUEST
            }
            WriteError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Build the outbound response.
pub fn write_response<'a, I>(
    status: StatusCode,
    headers: I,
    body: &ResponseBody,
) -> Result<Response, WriteError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| WriteError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| WriteError::InvalidHeaderValue(name.clone()))?;
        header_map.insert(header_name, header_value);
    }

    let payload = match body {
        ResponseBody::Json(value) => {
            Body::from(serde_json::to_vec(value).map_err(WriteError::Serialize)?)
        }
        ResponseBody::Absent | ResponseBody::Empty => Body::empty(),
    };

    let mut response = Response::new(payload);
    *response.status_mut() = status;
    *response.headers_mut() = header_map;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_string_body_is_json_literal() {
        let response =
            write_response(StatusCode::OK, &HashMap::new(), &ResponseBody::Json(json!("Hello")))
                .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#""Hello""#);
    }

    #[tokio::test]
    async fn test_absent_and_empty_write_nothing() {
        for body in [ResponseBody::Absent, ResponseBody::Empty] {
            let response = write_response(StatusCode::ACCEPTED, &HashMap::new(), &body).unwrap();
            assert_eq!(response.status(), StatusCode::ACCEPTED);
            assert!(response.headers().get("content-type").is_none());
            assert_eq!(body_text(response).await, "");
        }
    }

    #[tokio::test]
    async fn test_null_body_written() {
        let response =
            write_response(StatusCode::OK, &HashMap::new(), &ResponseBody::Json(json!(null)))
                .unwrap();
        assert_eq!(body_text(response).await, "null");
    }

    #[test]
    fn test_later_header_wins() {
        let first = HashMap::from([("Content-Type".to_string(), "text/plain".to_string())]);
        let second = HashMap::from([("content-type".to_string(), "application/json".to_string())]);
        let response = write_response(
            StatusCode::OK,
            first.iter().chain(second.iter()),
            &ResponseBody::Absent,
        )
        .unwrap();
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn test_invalid_header_rejected() {
        let headers = HashMap::from([("Bad Name".to_string(), "x".to_string())]);
        let err = write_response(StatusCode::OK, &headers, &ResponseBody::Absent).unwrap_err();
        assert!(matches!(err, WriteError::InvalidHeaderName(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let headers = HashMap::from([("X-Ok".to_string(), "line\nbreak".to_string())]);
        let err = write_response(StatusCode::OK, &headers, &ResponseBody::Absent).unwrap_err();
        assert!(matches!(err, WriteError::InvalidHeaderValue(_)));
    }
}
