//! Per-route token-bucket rate limiting.

use std::sync::{Mutex, PoisonError};

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use tokio::time::Instant;

use crate::observability::metrics;
use crate::routing::{MatchedRoute, RouteKind};

/// A simple token bucket.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, per_minute: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * per_minute / 60.0).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Long-lived limiter bound to one registered route.
///
/// Holds `max(R, 1)` tokens and refills continuously at `R` tokens per minute,
/// i.e. one token every `60 / R` seconds.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
    capacity: f64,
    per_minute: f64,
}

impl RateLimiter {
    /// Limiter admitting `per_minute` requests per minute; `None` if unlimited.
    pub fn per_minute(per_minute: f64) -> Option<Self> {
        if !per_minute.is_finite() || per_minute <= 0.0 {
            return None;
        }
        let capacity = per_minute.max(1.0);
        Some(Self {
            bucket: Mutex::new(TokenBucket::new(capacity)),
            capacity,
            per_minute,
        })
    }

    /// Take one token if available.
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        bucket.try_acquire(self.capacity, self.per_minute)
    }
}

pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    let admitted = request
        .extensions()
        .get::<MatchedRoute>()
        .and_then(|matched| matched.entry().limiter())
        .map_or(true, RateLimiter::try_acquire);

    if admitted {
        next.run(request).await
    } else {
        let path = request.uri().path();
        tracing::warn!(path = %path, "Rate limit exceeded");
        metrics::record_rate_limited(path);
        (
            StatusCode::TOO_MANY_REQUESTS,
            Extension(RouteKind::Defined),
            "Too Many Requests",
        )
            .into_response()
    }
}
