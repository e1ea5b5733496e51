//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the vanity import server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Vanity packages served by this instance.
    pub packages: Vec<PackageConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A single vanity import path.
///
/// Given a vanity import path of `web.site/package/name`, `path` would be
/// `/package/name` and `url` the location the go tool fetches source from.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct PackageConfig {
    /// HTTP path component of the vanity import path.
    #[serde(default)]
    pub path: String,

    /// Version control system. Defaults to `git` when empty.
    ///
    /// Any system the go tool can address is accepted: `git`, `hg`, `svn`,
    /// `bzr`, `cvs`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vcs: String,

    /// Repository URL advertised for the package.
    #[serde(default)]
    pub url: String,

    /// Only serve this package for requests carrying this Host header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Sub-path overrides for multi-module repositories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodules: Vec<SubmoduleConfig>,

    /// Inline response template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Response template read from disk, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
}

/// A submodule living under a package's path.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct SubmoduleConfig {
    /// Path relative to the parent package path, e.g. `/subpkg`.
    #[serde(default)]
    pub path: String,

    /// Repository URL. Empty means the parent package URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}
