//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber in the configured format
//! - Emit one access log event per request
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - JSON format for machine consumption, pretty format for terminals

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::routing::RouteKind;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
}

/// Log and count every request once its response is ready.
pub async fn access_log_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let kind = response
        .extensions()
        .get::<RouteKind>()
        .map_or("unknown", RouteKind::as_str);
    let elapsed_ms = start_time.elapsed().as_millis() as u64;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        kind,
        elapsed_ms,
        "Request handled"
    );
    metrics::record_request(method.as_str(), status, kind, start_time);

    response
}
