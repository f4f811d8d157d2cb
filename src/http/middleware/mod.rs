//! Per-route middleware chain.
//!
//! # Data Flow
//! ```text
//! resolve_route (routing::dispatcher) attaches MatchedRoute
//!     → auth.rs (token check for routes marked auth_required)
//!     → latency.rs (random delay in the route's [low, high] ms range)
//!     → rate_limit.rs (route's token bucket; 429 when empty)
//!     → dispatcher
//! ```
//!
//! # Design Decisions
//! - Each layer reads the route from the `MatchedRoute` request extension and
//!   never looks it up again
//! - Requests without a matched route (magic routes, 404s, /openapi) pass
//!   straight through every layer
//! - A rejection stops the chain; nothing further runs

pub mod auth;
pub mod latency;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthGate};
pub use latency::{latency_middleware, Latency};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
