//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolved config → OpenAPI import → route files → RouteTable
//!     → optional RouteWatcher → bind listener
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM or trigger() → watch state set once
//!     → every ShutdownListener resolves → stop accepting → drain in-flight requests
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Routes are loaded before the listener is bound, so the first request
//!   already sees them

pub mod shutdown;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownCause, ShutdownListener};
pub use startup::{apply_route_updates, load_initial_routes, start_route_watcher, StartupError};
