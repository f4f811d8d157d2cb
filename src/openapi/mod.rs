//! OpenAPI subsystem.
//!
//! # Data Flow
//! ```text
//! GET /openapi
//!     → generate.rs (RouteTable snapshot → OpenAPI 3.0 document)
//!     → JSON response
//!
//! Startup import (--openapi <url | file | inline text>):
//!     → import.rs (resolve source, parse JSON/YAML)
//!     → one Route per (path, method) operation
//!     → RouteTable::bulk_load
//! ```
//!
//! # Design Decisions
//! - The generated document is descriptive only; it is rebuilt on every request
//!   from a consistent snapshot, so it always reflects reloads
//! - Import reads only `paths` and response codes; schemas are not interpreted

pub mod generate;
pub mod import;

pub use generate::{generate_document, openapi_handler, OpenApiDocument, OPENAPI_PATH};
pub use import::{load_openapi_routes, parse_openapi_routes, OpenApiError, OpenApiSource};
