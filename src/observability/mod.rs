//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → logging.rs access log (request id, method, path, status, latency)
//!     → metrics.rs (counters, histogram)
//!
//! Consumers:
//!     → stdout (pretty, compact, or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the request-id layer into every access log line
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;

pub use logging::{access_log_middleware, init_logging};
pub use metrics::init_metrics;
