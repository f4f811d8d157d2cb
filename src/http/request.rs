//! Request-side helpers.
//!
//! # Responsibilities
//! - Mint a request ID for every request (UUID v4)
//! - Read the content type and buffered body for the dispatcher
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body size is bounded by axum's `DefaultBodyLimit`; the rejection carries
//!   the right status (413 when over the limit)

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID set by the request-id layer, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The request's `Content-Type`, if it is valid text.
pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

/// Buffer the whole request body.
pub async fn read_body(request: Request) -> Result<Bytes, BytesRejection> {
    Bytes::from_request(request, &()).await
}
