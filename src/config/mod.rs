//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML / JSON / directives)
//!     → loader.rs (parse & deserialize, directive.rs for the line format)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → provisioned into a PackageRouter
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server provisions and swaps the router atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All server sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod directive;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, PackageConfig, ServerConfig, SubmoduleConfig,
    TimeoutConfig,
};
