//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve the defined route for a request once, before the middleware chain
//! - Answer defined routes from their static definition, optionally overridden
//!   by a JSON request body
//! - Answer magic routes entirely from the request's own content
//! - Map every failure to its client-facing status
//!
//! # Design Decisions
//! - A defined route wins over the magic interpretation of the same path
//! - The resolved route travels as a `MatchedRoute` request extension; the
//!   middleware chain never consults the table itself
//! - Each response carries a `RouteKind` extension for access logging

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{rejection::BytesRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::request::{content_type, read_body};
use crate::http::response::{write_response, WriteError};
use crate::openapi::OPENAPI_PATH;
use crate::payload::{
    is_json_content_type, parse_json_spec, parse_response_spec, ResponseBody, ResponseSpec,
    SpecError,
};
use crate::routing::magic::{self, MagicRouteError};
use crate::routing::route::{Route, RouteError};
use crate::routing::table::{RouteEntry, RouteTable};

/// The defined route a request resolved to.
#[derive(Debug, Clone)]
pub struct MatchedRoute(pub Arc<RouteEntry>);

impl MatchedRoute {
    pub fn route(&self) -> &Route {
        self.0.route()
    }

    pub fn entry(&self) -> &RouteEntry {
        &self.0
    }
}

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Defined,
    Magic,
    OpenApi,
    Unmatched,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Defined => "defined",
            RouteKind::Magic => "magic",
            RouteKind::OpenApi => "openapi",
            RouteKind::Unmatched => "unmatched",
        }
    }
}

/// Client-visible dispatch failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Not Found")]
    NotFound,

    #[error("Invalid magic route: {0}")]
    MagicRoute(#[from] MagicRouteError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("registered route cannot be served: {0}")]
    InvalidRoute(#[from] RouteError),
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            DispatchError::MagicRoute(err) => {
                tracing::debug!(error = %err, "Rejected magic route");
                (StatusCode::BAD_REQUEST, "Invalid magic route").into_response()
            }
            DispatchError::Spec(err) => {
                tracing::debug!(error = ?err, "Rejected response specification");
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            DispatchError::Body(rejection) => rejection.into_response(),
            DispatchError::Write(err) => {
                let status = err.status();
                if status.is_server_error() {
                    tracing::error!(error = ?err, "Failed to build response");
                }
                (status, err.to_string()).into_response()
            }
            DispatchError::InvalidRoute(err) => {
                tracing::error!(error = %err, "Registered route cannot be served");
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid route definition").into_response()
            }
        }
    }
}

/// Attach the defined route for this path and method, if any.
pub async fn resolve_route(
    State(routes): State<Arc<RouteTable>>,
    mut request: Request,
    next: Next,
) -> Response {
    let entry = match decode_path(request.uri().path()) {
        path if path == OPENAPI_PATH => None,
        path => routes.get(&path),
    };
    if let Some(entry) = entry.filter(|entry| entry.route().matches_method(request.method().as_str())) {
        request.extensions_mut().insert(MatchedRoute(entry));
    }
    next.run(request).await
}

// Route paths are stored decoded; undecodable paths are looked up as sent.
fn decode_path(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

/// Terminal handler for every path except the OpenAPI document.
pub async fn dispatch(request: Request) -> Response {
    let matched = request.extensions().get::<MatchedRoute>().cloned();

    let (kind, result) = match matched {
        Some(matched) => (RouteKind::Defined, defined_route(matched.route(), request).await),
        None if magic::is_magic_route(request.uri().path()) => {
            (RouteKind::Magic, magic_route(request).await)
        }
        None => (RouteKind::Unmatched, Err(DispatchError::NotFound)),
    };

    let mut response = result.unwrap_or_else(IntoResponse::into_response);
    response.extensions_mut().insert(kind);
    response
}

async fn defined_route(route: &Route, request: Request) -> Result<Response, DispatchError> {
    // Tables filled without the loader are unvalidated.
    route.validate()?;
    let status = StatusCode::from_u16(route.status_code).map_err(|_| RouteError::InvalidStatus {
        path: route.path.clone(),
        status: route.status_code,
    })?;

    let spec = if is_json_content_type(content_type(request.headers())) {
        let body = read_body(request).await?;
        parse_json_spec(&body)?
    } else {
        ResponseSpec::default()
    };

    let body = match spec.body {
        ResponseBody::Absent => ResponseBody::from(route.response_body.clone()),
        overridden => overridden,
    };

    let headers = route.response_headers.iter().chain(spec.headers.iter());
    Ok(write_response(status, headers, &body)?)
}

async fn magic_route(request: Request) -> Result<Response, DispatchError> {
    let status = magic::parse_status(request.uri().path())?;

    let content_type = content_type(request.headers()).map(str::to_owned);
    let query = request.uri().query().map(str::to_owned);
    let body = if is_json_content_type(content_type.as_deref()) {
        read_body(request).await?
    } else {
        Default::default()
    };

    let spec = parse_response_spec(content_type.as_deref(), query.as_deref(), &body)?;
    Ok(write_response(status, &spec.headers, &spec.body)?)
}
