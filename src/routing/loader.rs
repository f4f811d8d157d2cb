//! Route definitions from JSON documents on disk.
//!
//! A document is a JSON array of route records:
//! ```json
//! [{"path": "/users", "method": "GET", "status_code": 200,
//!   "response_headers": {"Content-Type": "application/json"},
//!   "response_body": [{"id": 1}], "auth_required": false,
//!   "throttling_low": 0, "throttling_hi": 0, "rate_limit_per_min": 0}]
//! ```
//! Every load is all-or-nothing: one bad entry or file rejects the batch.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::routing::route::{Route, RouteError};

/// Failure to turn a source into a batch of routes.
#[derive(Debug, Error)]
pub enum RouteLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed route document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid route at index {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: RouteError,
    },

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<RouteLoadError>,
    },
}

/// Decode and validate a bulk-load document.
pub fn parse_routes(data: &[u8]) -> Result<Vec<Route>, RouteLoadError> {
    let routes: Vec<Route> = serde_json::from_slice(data)?;
    for (index, route) in routes.iter().enumerate() {
        route
            .validate()
            .map_err(|source| RouteLoadError::Invalid { index, source })?;
    }
    Ok(routes)
}

/// Load one route document.
pub fn load_routes_file(path: &Path) -> Result<Vec<Route>, RouteLoadError> {
    let data = fs::read(path).map_err(|source| RouteLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_routes(&data).map_err(|source| RouteLoadError::File {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Load every `*.json` document in a directory, in file-name order.
pub fn load_routes_dir(dir: &Path) -> Result<Vec<Route>, RouteLoadError> {
    let io_error = |source| RouteLoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && is_route_document(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut routes = Vec::new();
    for file in &files {
        routes.extend(load_routes_file(file)?);
    }

    tracing::debug!(dir = %dir.display(), files = files.len(), routes = routes.len(), "Route directory loaded");
    Ok(routes)
}

/// Load a route file or a directory of route files.
pub fn load_routes(path: &Path) -> Result<Vec<Route>, RouteLoadError> {
    if path.is_dir() {
        load_routes_dir(path)
    } else {
        load_routes_file(path)
    }
}

/// Whether a path looks like a route document.
pub fn is_route_document(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_from_document() {
        let document = json!([
            {
                "path": "/users",
                "method": "GET",
                "status_code": 200,
                "response_headers": {"Content-Type": "application/json"},
                "response_body": [{"id": 1, "name": "John"}],
                "auth_required": true,
                "throttling_low": 5,
                "throttling_hi": 10,
                "rate_limit_per_min": 12.5
            },
            {"path": "/health", "method": "HEAD", "status_code": 204}
        ]);
        let routes = parse_routes(document.to_string().as_bytes()).unwrap();
        assert_eq!(routes.len(), 2);

        let back = serde_json::to_value(&routes).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn test_decode_failure() {
        let err = parse_routes(br#"[{"path": "/x", "method": "GET"}]"#).unwrap_err();
        assert!(matches!(err, RouteLoadError::Decode(_)));

        let err = parse_routes(br#"{"path": "/x"}"#).unwrap_err();
        assert!(matches!(err, RouteLoadError::Decode(_)));
    }

    #[test]
    fn test_validation_failure_reports_index() {
        let err = parse_routes(
            br#"[{"path": "/a", "method": "GET", "status_code": 200},
                 {"path": "/b", "method": "GET", "status_code": 42}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RouteLoadError::Invalid { index: 1, .. }));
    }

    #[test]
    fn test_unsendable_header_rejected() {
        let err = parse_routes(
            br#"[{"path": "/h", "method": "GET", "status_code": 200,
                  "response_headers": {"Bad Name": "v"}}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RouteLoadError::Invalid {
                index: 0,
                source: RouteError::InvalidHeader { .. }
            }
        ));
    }

    #[test]
    fn test_load_dir_only_json_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"[{"path": "/shared", "method": "GET", "status_code": 202}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"[{"path": "/shared", "method": "GET", "status_code": 201},
                {"path": "/a", "method": "GET", "status_code": 200}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not routes").unwrap();

        let routes = load_routes(dir.path()).unwrap();
        let statuses: Vec<_> = routes.iter().map(|r| (r.path.as_str(), r.status_code)).collect();
        assert_eq!(statuses, vec![("/shared", 201), ("/a", 200), ("/shared", 202)]);
    }

    #[test]
    fn test_load_dir_rejects_on_one_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("good.json"),
            r#"[{"path": "/a", "method": "GET", "status_code": 200}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("bad.json"), "[{").unwrap();

        let err = load_routes_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RouteLoadError::File { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_routes(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RouteLoadError::Io { .. }));
    }
}
