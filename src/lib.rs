//! HTTP mock server.
//!
//! Answers registered routes from static definitions, and any
//! `/status/<code>` path with a response described by the request itself.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod openapi;
pub mod payload;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Route, RouteTable};
