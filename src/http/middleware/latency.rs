//! Artificial latency injection.

use std::time::Duration;

use axum::{extract::Request, middleware::Next, response::Response};
use rand::Rng;

use crate::routing::MatchedRoute;

/// Inclusive delay range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    low_ms: u64,
    high_ms: u64,
}

impl Latency {
    /// Bounds given in either order are normalized to `low <= high`.
    pub fn new(low_ms: u64, high_ms: u64) -> Self {
        Self {
            low_ms: low_ms.min(high_ms),
            high_ms: low_ms.max(high_ms),
        }
    }

    /// True when both bounds are zero; the middleware then does nothing at all.
    pub fn is_zero(&self) -> bool {
        self.high_ms == 0
    }

    /// Draw a uniformly distributed delay from the range.
    pub fn sample(&self) -> Duration {
        let millis = rand::thread_rng().gen_range(self.low_ms..=self.high_ms);
        Duration::from_millis(millis)
    }
}

pub async fn latency_middleware(request: Request, next: Next) -> Response {
    let latency = request
        .extensions()
        .get::<MatchedRoute>()
        .map(|matched| matched.route().latency())
        .unwrap_or_default();

    if !latency.is_zero() {
        let delay = latency.sample();
        tracing::debug!(path = %request.uri().path(), delay_ms = delay.as_millis() as u64, "Injecting latency");
        tokio::time::sleep(delay).await;
    }

    next.run(request).await
}
