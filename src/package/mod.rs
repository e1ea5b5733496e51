//! Vanity package subsystem.
//!
//! # Data Flow
//! ```text
//! PackageConfig
//!     → registration.rs (provision: default VCS, compile template)
//!     → PackageRegistration (immutable, shared via Arc)
//!
//! Per request:
//!     request path → resolver.rs (longest submodule match)
//!     → Resolution (import root, repository URL)
//!     → http::response renders redirect or metadata page
//! ```

pub mod registration;
pub mod resolver;
pub mod template;

pub use registration::{PackageRegistration, ProvisionError, Submodule, DEFAULT_VCS};
pub use resolver::{resolve, Resolution};
pub use template::{Template, TemplateData, TemplateError, DEFAULT_TEMPLATE};
