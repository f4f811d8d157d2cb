//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files; every
//! section falls back to defaults so an empty file is a valid configuration.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Root configuration for the mock server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Authentication gate token.
    pub auth: AuthConfig,

    /// Route sources.
    pub routes: RoutesConfig,

    pub logging: LoggingConfig,

    /// Request body and timeout limits.
    pub limits: LimitsConfig,

    /// Prometheus exporter.
    pub metrics: MetricsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
        }
    }
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Exact `Authorization` header value required by protected routes.
    /// Empty disables the gate.
    pub token: String,
}

/// Where route definitions come from.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Route document or directory of `*.json` route documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// OpenAPI document: URL, file path, or inline text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    /// Reload `path` when it changes.
    pub watch: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,

    /// Default level; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: "info".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body buffered for a response spec.
    pub max_body_bytes: usize,

    /// Whole-request timeout, injected latency included.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,
            request_timeout_secs: 60,
        }
    }
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,

    /// Exporter listen address.
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listener.bind_address(), "localhost:8080");
    }

    #[test]
    fn test_partial_sections() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            port = 9000

            [auth]
            token = "secret"

            [routes]
            path = "routes/"
            watch = true

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.host, "localhost");
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.auth.token, "secret");
        assert_eq!(config.routes.path, Some(PathBuf::from("routes/")));
        assert!(config.routes.watch);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.limits.request_timeout_secs, 60);
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let config = ServerConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: ServerConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
