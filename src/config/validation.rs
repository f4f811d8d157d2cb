//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that referenced route sources exist
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs after CLI overrides are applied, before anything is started

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("limits.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("metrics.address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("logging.level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("routes.path {0} does not exist")]
    MissingRoutesPath(PathBuf),

    #[error("routes.watch requires routes.path")]
    WatchWithoutRoutes,
}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.metrics.enabled && config.metrics.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.metrics.address.clone(),
        ));
    }
    if tracing::Level::from_str(&config.logging.level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }
    match &config.routes.path {
        Some(path) if !path.exists() => {
            errors.push(ValidationError::MissingRoutesPath(path.clone()));
        }
        None if config.routes.watch => errors.push(ValidationError::WatchWithoutRoutes),
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.host = " ".into();
        config.limits.max_body_bytes = 0;
        config.limits.request_timeout_secs = 0;
        config.metrics.enabled = true;
        config.metrics.address = "nowhere".into();
        config.logging.level = "loud".into();
        config.routes.watch = true;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyHost,
                ValidationError::ZeroBodyLimit,
                ValidationError::ZeroTimeout,
                ValidationError::InvalidMetricsAddress("nowhere".into()),
                ValidationError::InvalidLogLevel("loud".into()),
                ValidationError::WatchWithoutRoutes,
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ServerConfig::default();
        config.metrics.address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_routes_path() {
        let mut config = ServerConfig::default();
        config.routes.path = Some(PathBuf::from("/definitely/not/here"));
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MissingRoutesPath(PathBuf::from(
                "/definitely/not/here"
            ))])
        );
    }
}
