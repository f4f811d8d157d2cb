//! Magic route grammar: `/status/<code>[/anything]`.

use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::route::{MAX_STATUS, MIN_STATUS};

/// Reserved path prefix of the magic route family.
pub const MAGIC_ROUTE_PREFIX: &str = "/status/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MagicRouteError {
    #[error("status segment '{0}' is not a base-10 integer")]
    NotNumeric(String),

    #[error("status code {0} is outside 100-599")]
    OutOfRange(i64),
}

/// Whether a request path belongs to the magic route family.
pub fn is_magic_route(path: &str) -> bool {
    path.starts_with(MAGIC_ROUTE_PREFIX)
}

/// Extract the status code from a magic route path.
///
/// Everything after the status segment is ignored.
pub fn parse_status(path: &str) -> Result<StatusCode, MagicRouteError> {
    let rest = path.strip_prefix(MAGIC_ROUTE_PREFIX).unwrap_or(path);
    let segment = rest.split('/').next().unwrap_or_default();

    let code: i64 = segment
        .parse()
        .map_err(|_| MagicRouteError::NotNumeric(segment.to_string()))?;

    u16::try_from(code)
        .ok()
        .filter(|code| (MIN_STATUS..=MAX_STATUS).contains(code))
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or(MagicRouteError::OutOfRange(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_detection() {
        assert!(is_magic_route("/status/200"));
        assert!(is_magic_route("/status/"));
        assert!(!is_magic_route("/status"));
        assert!(!is_magic_route("/statuses/200"));
    }

    #[test]
    fn test_parse_valid_codes() {
        assert_eq!(parse_status("/status/100").unwrap(), StatusCode::CONTINUE);
        assert_eq!(parse_status("/status/404").unwrap(), StatusCode::NOT_FOUND);
        assert_eq!(parse_status("/status/599").unwrap().as_u16(), 599);
    }

    #[test]
    fn test_trailing_segments_ignored() {
        assert_eq!(parse_status("/status/201/extra/parts").unwrap(), StatusCode::CREATED);
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(
            parse_status("/status/abc"),
            Err(MagicRouteError::NotNumeric("abc".into()))
        );
        assert_eq!(parse_status("/status/"), Err(MagicRouteError::NotNumeric(String::new())));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(parse_status("/status/99"), Err(MagicRouteError::OutOfRange(99)));
        assert_eq!(parse_status("/status/600"), Err(MagicRouteError::OutOfRange(600)));
        assert_eq!(parse_status("/status/-200"), Err(MagicRouteError::OutOfRange(-200)));
        assert_eq!(
            parse_status("/status/70000"),
            Err(MagicRouteError::OutOfRange(70000))
        );
    }
}
