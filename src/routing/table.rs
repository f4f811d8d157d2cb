//! Route storage shared between request tasks and the route loader.
//!
//! # Responsibilities
//! - Store registered routes keyed by path
//! - Bind one rate-limit bucket to each registered route
//! - Accept whole batches from the loader/watcher without exposing partial state
//!
//! # Design Decisions
//! - Copy-on-write: writers build a new map and swap it in atomically,
//!   readers take a lock-free snapshot (arc-swap)
//! - Keyed by path alone; a second registration for the same path replaces the
//!   first whatever its method, and the replacement is logged
//! - Re-registering an identical definition keeps the existing entry and so
//!   the bucket state it carries

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::http::middleware::rate_limit::RateLimiter;
use crate::routing::loader::{parse_routes, RouteLoadError};
use crate::routing::route::Route;

/// Path-keyed snapshot of the table.
pub type RouteMap = HashMap<String, Arc<RouteEntry>>;

/// A registered route plus the per-route state that must outlive a request.
#[derive(Debug)]
pub struct RouteEntry {
    route: Route,
    limiter: Option<RateLimiter>,
}

impl RouteEntry {
    /// Wrap a route, creating its rate-limit bucket if it has a ceiling.
    pub fn new(route: Route) -> Self {
        let limiter = RateLimiter::per_minute(route.rate_limit_per_minute);
        Self { route, limiter }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The route's bucket; `None` when the route is unlimited.
    pub fn limiter(&self) -> Option<&RateLimiter> {
        self.limiter.as_ref()
    }
}

/// Concurrent route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: ArcSwap<RouteMap>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the route registered under `route.path`.
    pub fn put(&self, route: Route) {
        self.bulk_load(std::iter::once(route));
    }

    /// Look up the route registered for an exact path.
    pub fn get(&self, path: &str) -> Option<Arc<RouteEntry>> {
        self.routes.load().get(path).cloned()
    }

    /// Merge a batch into the table in one atomic swap.
    ///
    /// Entries apply in order, so a later duplicate path wins. Returns the
    /// number of distinct paths written.
    pub fn bulk_load(&self, routes: impl IntoIterator<Item = Route>) -> usize {
        let staged = self.stage(routes);
        let count = staged.len();
        self.routes.rcu(|current| {
            let mut next = RouteMap::clone(current);
            next.extend(staged.iter().map(|(path, entry)| (path.clone(), Arc::clone(entry))));
            next
        });
        count
    }

    /// Swap in a table holding exactly `routes`.
    pub fn replace_all(&self, routes: impl IntoIterator<Item = Route>) -> usize {
        let staged = self.stage(routes);
        let count = staged.len();
        self.routes.store(Arc::new(staged));
        count
    }

    /// Decode and validate a bulk-load document, then merge it.
    ///
    /// Nothing is applied unless every entry decodes and validates.
    pub fn load_json(&self, data: &[u8]) -> Result<usize, RouteLoadError> {
        let routes = parse_routes(data)?;
        Ok(self.bulk_load(routes))
    }

    /// Consistent read-only view of every registered route.
    pub fn snapshot(&self) -> Arc<RouteMap> {
        self.routes.load_full()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.load().is_empty()
    }

    fn stage(&self, routes: impl IntoIterator<Item = Route>) -> RouteMap {
        let current = self.routes.load();
        let mut staged = RouteMap::new();

        for route in routes {
            let previous = staged
                .get(&route.path)
                .or_else(|| current.get(&route.path))
                .cloned();

            let entry = match previous {
                Some(previous) if previous.route == route => previous,
                Some(previous) => {
                    if !previous.route.matches_method(&route.method) {
                        tracing::warn!(
                            path = %route.path,
                            replaced_method = %previous.route.method,
                            method = %route.method,
                            "Route path re-registered with a different method; previous method no longer served"
                        );
                    }
                    Arc::new(RouteEntry::new(route))
                }
                None => Arc::new(RouteEntry::new(route)),
            };
            staged.insert(entry.route.path.clone(), entry);
        }

        staged
    }
}
