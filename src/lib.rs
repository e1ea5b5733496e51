//! Vanity import path server for Go packages.
//!
//! Serves `go-import` metadata for configured package paths so that
//! `go get example.com/pkg` can fetch source hosted elsewhere, and redirects
//! browsers straight to the repository.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod package;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use package::{resolve, PackageRegistration, Resolution};
