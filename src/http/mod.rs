//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, host, go-get marker)
//!     → routing (package lookup) → package (resolution)
//!     → response.rs (redirect or metadata page)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{render, Outcome, RenderError};
pub use server::HttpServer;
