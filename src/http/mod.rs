//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID, content type, buffered body)
//!     → middleware/ (auth gate, latency, rate limit)
//!     → [routing::dispatcher decides the response]
//!     → response.rs (status, headers, JSON body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{write_response, WriteError};
pub use server::{AppState, HttpServer};
