//! Command-line interface.
//!
//! Flags override the configuration file; the merged result is validated once.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{LogFormat, ServerConfig};
use crate::config::validation::validate_config;

#[derive(Debug, Default, Parser)]
#[command(name = "mock-server")]
#[command(version, about = "HTTP mock server with defined and magic status routes", long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Authorization token required by routes with auth_required
    #[arg(short, long)]
    pub token: Option<String>,

    /// Route document, or directory of *.json route documents
    #[arg(short, long)]
    pub routes: Option<PathBuf>,

    /// OpenAPI document to import routes from (URL, file, or inline text)
    #[arg(long)]
    pub openapi: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short = 'L', long)]
    pub log_level: Option<String>,

    /// Reload routes when the route source changes
    #[arg(short, long)]
    pub watch: bool,

    /// Enable the Prometheus exporter on this address
    #[arg(long)]
    pub metrics_address: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Validate the effective configuration and exit
    #[arg(long)]
    pub validate: bool,
}

impl Args {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(token) = &self.token {
            config.auth.token = token.clone();
        }
        if let Some(routes) = &self.routes {
            config.routes.path = Some(routes.clone());
        }
        if let Some(openapi) = &self.openapi {
            config.routes.openapi = Some(openapi.clone());
        }
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.watch {
            config.routes.watch = true;
        }
        if let Some(address) = &self.metrics_address {
            config.metrics.enabled = true;
            config.metrics.address = address.clone();
        }
    }
}

/// Load the configuration file (if any), apply flags, and validate.
pub fn resolve_config(args: &Args) -> Result<ServerConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    args.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
