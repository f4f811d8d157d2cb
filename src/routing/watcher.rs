//! Route file watcher for hot reload.
//!
//! A single route file is watched through its parent directory, so editors
//! that save by renaming a temporary file over the original keep triggering
//! reloads after the original inode is gone.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::routing::loader::{is_route_document, load_routes};
use crate::routing::route::Route;

/// Watches a route file or directory and emits validated batches on change.
pub struct RouteWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Vec<Route>>,
}

impl RouteWatcher {
    /// Create a new RouteWatcher.
    ///
    /// Returns the watcher and a receiver for reloaded route batches.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Vec<Route>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let is_dir = path.is_dir();
        let watch_root = if is_dir {
            self.path.clone()
        } else {
            parent_dir(&self.path)
        };
        let target = self.path.file_name().map(OsStr::to_os_string);
        let concerns = move |changed: &Path| {
            if is_dir {
                is_route_document(changed)
            } else {
                changed.file_name() == target.as_deref()
            }
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    if !event.paths.iter().any(|p| concerns(p)) {
                        return;
                    }

                    tracing::info!(path = %path.display(), "Route definitions changed, reloading");
                    match load_routes(&path) {
                        Ok(routes) => {
                            if tx.send(routes).is_err() {
                                tracing::debug!("Route update receiver closed");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload routes. Keeping current routes.");
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Route watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Route watcher started");
        Ok(watcher)
    }
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
