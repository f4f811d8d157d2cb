//! Startup orchestration.
//!
//! # Responsibilities
//! - Populate the route table from the configured sources
//! - Start the route watcher when hot reload is enabled
//!
//! # Design Decisions
//! - Fail fast: a bad route source aborts startup
//! - OpenAPI routes load first so route files win on a shared path

use std::sync::Arc;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::RoutesConfig;
use crate::observability::metrics;
use crate::openapi::{load_openapi_routes, OpenApiError};
use crate::routing::{load_routes, Route, RouteLoadError, RouteTable, RouteWatcher};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load routes: {0}")]
    Routes(#[from] RouteLoadError),

    #[error("failed to import OpenAPI document: {0}")]
    OpenApi(#[from] OpenApiError),

    #[error("failed to watch route source: {0}")]
    Watch(#[from] notify::Error),
}

/// Fill `table` from the OpenAPI document and route files, in that order.
pub async fn load_initial_routes(
    config: &RoutesConfig,
    table: &RouteTable,
) -> Result<usize, StartupError> {
    if let Some(openapi) = &config.openapi {
        let routes = load_openapi_routes(openapi).await?;
        table.bulk_load(routes);
    }

    if let Some(path) = &config.path {
        let routes = load_routes(path)?;
        let written = table.bulk_load(routes);
        tracing::info!(path = %path.display(), routes = written, "Route definitions loaded");
    }

    metrics::set_routes_loaded(table.len());
    Ok(table.len())
}

/// Start watching the route source if hot reload is enabled.
///
/// Returns the watcher handle (dropping it stops watching) and the batch
/// receiver to hand to the server.
pub fn start_route_watcher(
    config: &RoutesConfig,
) -> Result<Option<(RecommendedWatcher, mpsc::UnboundedReceiver<Vec<Route>>)>, StartupError> {
    match &config.path {
        Some(path) if config.watch => {
            let (watcher, rx) = RouteWatcher::new(path);
            Ok(Some((watcher.run()?, rx)))
        }
        _ => Ok(None),
    }
}

/// Apply reloaded batches until the sender side goes away.
pub async fn apply_route_updates(
    table: Arc<RouteTable>,
    mut updates: mpsc::UnboundedReceiver<Vec<Route>>,
) {
    while let Some(routes) = updates.recv().await {
        let written = table.bulk_load(routes);
        metrics::set_routes_loaded(table.len());
        tracing::info!(routes = written, total = table.len(), "Routes reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_route_file_overrides_openapi() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("routes.json");
        fs::write(&file, r#"[{"path": "/pets", "method": "GET", "status_code": 418}]"#).unwrap();

        let config = RoutesConfig {
            path: Some(file),
            openapi: Some("paths:\n  /pets:\n    get: {}\n  /owners:\n    get: {}\n".into()),
            watch: false,
        };
        let table = RouteTable::new();
        let count = load_initial_routes(&config, &table).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(table.get("/pets").unwrap().route().status_code, 418);
        assert_eq!(table.get("/owners").unwrap().route().status_code, 200);
    }

    #[tokio::test]
    async fn test_bad_route_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("routes.json");
        fs::write(&file, "not json").unwrap();

        let config = RoutesConfig {
            path: Some(file),
            ..Default::default()
        };
        let err = load_initial_routes(&config, &RouteTable::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Routes(_)));
    }

    #[test]
    fn test_no_watcher_unless_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = RoutesConfig {
            path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(start_route_watcher(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_updates_are_merged() {
        let table = Arc::new(RouteTable::new());
        table.put(Route::new("/kept", "GET", 200));

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(vec![Route::new("/new", "GET", 201)]).unwrap();
        drop(tx);

        apply_route_updates(Arc::clone(&table), rx).await;
        assert!(table.get("/kept").is_some());
        assert_eq!(table.get("/new").unwrap().route().status_code, 201);
    }
}
