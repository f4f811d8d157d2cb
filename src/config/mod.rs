//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs (command-line overrides)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only routes reload at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::{resolve_config, Args};
pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, LimitsConfig, ListenerConfig, LogFormat, LoggingConfig, MetricsConfig,
    RoutesConfig, ServerConfig,
};
pub use validation::{validate_config, ValidationError};
