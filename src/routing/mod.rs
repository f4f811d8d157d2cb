//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → dispatcher::resolve_route (exact path lookup in RouteTable)
//!     → MatchedRoute extension when the method matches
//!     → middleware chain (auth, latency, rate limit)
//!     → dispatcher::dispatch
//!         defined route  → static response, optionally overridden by JSON body
//!         /status/<N>    → response built from the request itself
//!         otherwise      → 404
//!
//! Route Loading:
//!     JSON documents / OpenAPI import
//!     → loader.rs (decode + validate, all-or-nothing)
//!     → RouteTable::bulk_load (single atomic swap)
//!     watcher.rs re-runs the loader on file changes
//! ```
//!
//! # Design Decisions
//! - Exact path match only; no templates, no regex
//! - The table is replaced copy-on-write, so in-flight requests keep the
//!   snapshot they started with
//! - Magic routes never touch the table

pub mod dispatcher;
pub mod loader;
pub mod magic;
pub mod route;
pub mod table;
pub mod watcher;

pub use dispatcher::{dispatch, resolve_route, DispatchError, MatchedRoute, RouteKind};
pub use loader::{load_routes, load_routes_dir, load_routes_file, parse_routes, RouteLoadError};
pub use magic::{is_magic_route, parse_status, MagicRouteError, MAGIC_ROUTE_PREFIX};
pub use route::{Route, RouteError};
pub use table::{RouteEntry, RouteMap, RouteTable};
pub use watcher::RouteWatcher;
