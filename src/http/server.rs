//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router: `/openapi` plus a fallback dispatcher
//! - Wire up the per-route middleware chain (resolve, auth, latency, rate limit)
//! - Wire up cross-cutting layers (request ID, tracing, access log, timeout, body limit)
//! - Apply reloaded route batches while serving
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware::{from_fn, from_fn_with_state},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::middleware::{
    auth_middleware, latency_middleware, rate_limit_middleware, AuthGate,
};
use crate::http::request::MakeRequestUuid;
use crate::lifecycle::{apply_route_updates, ShutdownListener};
use crate::observability::access_log_middleware;
use crate::openapi::{openapi_handler, OPENAPI_PATH};
use crate::routing::{dispatch, resolve_route, Route, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub auth: Arc<AuthGate>,
}

impl FromRef<AppState> for Arc<RouteTable> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.routes)
    }
}

impl FromRef<AppState> for Arc<AuthGate> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.auth)
    }
}

/// HTTP server for the mock API.
pub struct HttpServer {
    router: Router,
    routes: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a server answering from `routes`.
    pub fn new(config: ServerConfig, routes: Arc<RouteTable>) -> Self {
        let auth = Arc::new(AuthGate::new(&config.auth.token));
        if auth.is_enabled() {
            tracing::info!("Authentication gate enabled");
        }

        let state = AppState {
            routes: Arc::clone(&routes),
            auth,
        };

        let router = Self::build_router(&config, state);
        Self { router, routes }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers listed later wrap the ones listed earlier.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route(OPENAPI_PATH, any(openapi_handler))
            .fallback(dispatch)
            .layer(from_fn(rate_limit_middleware))
            .layer(from_fn(latency_middleware))
            .layer(from_fn_with_state(Arc::clone(&state.auth), auth_middleware))
            .layer(from_fn_with_state(Arc::clone(&state.routes), resolve_route))
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(from_fn(access_log_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// Batches received on `route_updates` are merged into the table while
    /// serving.
    pub async fn run(
        self,
        listener: TcpListener,
        route_updates: Option<mpsc::UnboundedReceiver<Vec<Route>>>,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        let updates = route_updates
            .map(|rx| tokio::spawn(apply_route_updates(Arc::clone(&self.routes), rx)));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let cause = shutdown.wait().await;
                tracing::info!(cause = cause.as_str(), "Draining connections");
            })
            .await?;

        if let Some(updates) = updates {
            updates.abort();
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
