//! Response specification subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (content type, query string, body bytes)
//!     → parser.rs (JSON body or one-level dot-notation query)
//!     → spec.rs (ResponseSpec { headers, body })
//!     → http::response writes it out
//!
//! Standalone:
//!     dot_notation.rs (arbitrary-depth dotted keys → nested JSON object)
//! ```
//!
//! # Design Decisions
//! - A ResponseSpec is built fresh per request and never shared
//! - Body is an explicit tri-state: absent, empty, or a JSON value
//! - JSON body takes precedence over the query string; the two never mix

pub mod dot_notation;
pub mod parser;
pub mod spec;

pub use dot_notation::{flatten_dot_notation, DotNotationError};
pub use parser::{is_json_content_type, parse_json_spec, parse_response_spec, SpecError};
pub use spec::{ResponseBody, ResponseSpec};
