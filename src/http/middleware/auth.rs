//! Authentication gate for routes marked `auth_required`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};

use crate::observability::metrics;
use crate::routing::{MatchedRoute, Route, RouteKind};

/// Shared token check, configured once at startup.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    token: Option<String>,
}

impl AuthGate {
    /// An empty token disables the gate entirely.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Whether a request for `route` carrying `authorization` may proceed.
    ///
    /// The header must equal the token exactly; no scheme prefix is stripped.
    pub fn admits(&self, route: Option<&Route>, authorization: Option<&HeaderValue>) -> bool {
        let Some(token) = &self.token else {
            return true;
        };
        match route {
            Some(route) if route.auth_required => {
                authorization.map(HeaderValue::as_bytes) == Some(token.as_bytes())
            }
            _ => true,
        }
    }
}

pub async fn auth_middleware(
    State(gate): State<Arc<AuthGate>>,
    request: Request,
    next: Next,
) -> Response {
    let matched = request.extensions().get::<MatchedRoute>();
    let route = matched.map(MatchedRoute::route);

    if gate.admits(route, request.headers().get(AUTHORIZATION)) {
        return next.run(request).await;
    }

    let path = request.uri().path();
    tracing::warn!(path = %path, "Unauthorized request to protected route");
    metrics::record_auth_rejected(path);
    (StatusCode::UNAUTHORIZED, Extension(RouteKind::Defined), "Unauthorized").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected() -> Route {
        let mut route = Route::new("/secret", "GET", 200);
        route.auth_required = true;
        route
    }

    #[test]
    fn test_empty_token_disables_gate() {
        let gate = AuthGate::new("");
        assert!(!gate.is_enabled());
        assert!(gate.admits(Some(&protected()), None));
    }

    #[test]
    fn test_exact_token_required() {
        let gate = AuthGate::new("T");
        let route = protected();
        assert!(gate.admits(Some(&route), Some(&HeaderValue::from_static("T"))));
        assert!(!gate.admits(Some(&route), Some(&HeaderValue::from_static("Bearer T"))));
        assert!(!gate.admits(Some(&route), Some(&HeaderValue::from_static("t"))));
        assert!(!gate.admits(Some(&route), None));
    }

    #[test]
    fn test_unprotected_and_unmatched_pass() {
        let gate = AuthGate::new("T");
        assert!(gate.admits(Some(&Route::new("/open", "GET", 200)), None));
        assert!(gate.admits(None, None));
    }
}
