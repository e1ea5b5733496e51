//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject packages and submodules missing required fields
//! - Detect conflicting mounts and duplicate submodules
//! - Validate listener and observability addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::{PackageConfig, ServerConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("package #{index} is missing a path")]
    MissingPackagePath { index: usize },

    #[error("package '{path}' is missing a url")]
    MissingPackageUrl { path: String },

    #[error("package '{path}' is mounted more than once")]
    DuplicateMount { path: String },

    #[error("package '{path}' sets both template and template_file")]
    ConflictingTemplates { path: String },

    #[error("submodule #{index} of package '{package}' is missing a path")]
    MissingSubmodulePath { package: String, index: usize },

    #[error("submodule '{path}' of package '{package}' is declared more than once")]
    DuplicateSubmodule { package: String, path: String },

    #[error("url '{url}' cannot be sent in a Location header")]
    InvalidUrl { url: String },
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut mounts = HashSet::new();
    for (index, package) in config.packages.iter().enumerate() {
        validate_package(index, package, &mut errors);

        if !package.path.is_empty() {
            let host = package.host.as_deref().map(str::to_lowercase);
            if !mounts.insert((host, package.path.as_str())) {
                errors.push(ValidationError::DuplicateMount {
                    path: package.path.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_package(index: usize, package: &PackageConfig, errors: &mut Vec<ValidationError>) {
    if package.path.is_empty() {
        errors.push(ValidationError::MissingPackagePath { index });
    }

    if package.url.is_empty() {
        errors.push(ValidationError::MissingPackageUrl {
            path: package.path.clone(),
        });
    } else {
        check_url(&package.url, errors);
    }

    if package.template.is_some() && package.template_file.is_some() {
        errors.push(ValidationError::ConflictingTemplates {
            path: package.path.clone(),
        });
    }

    let mut seen = HashSet::new();
    for (sub_index, submodule) in package.submodules.iter().enumerate() {
        if submodule.path.is_empty() {
            errors.push(ValidationError::MissingSubmodulePath {
                package: package.path.clone(),
                index: sub_index,
            });
            continue;
        }

        // Equal paths would make resolution depend on declaration order.
        if !seen.insert(submodule.path.as_str()) {
            errors.push(ValidationError::DuplicateSubmodule {
                package: package.path.clone(),
                path: submodule.path.clone(),
            });
        }

        if !submodule.url.is_empty() {
            check_url(&submodule.url, errors);
        }
    }
}

fn check_url(url: &str, errors: &mut Vec<ValidationError>) {
    if HeaderValue::from_str(url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            url: url.to_string(),
        });
    }
}
