//! Provisioned package registrations.

use thiserror::Error;

use crate::config::PackageConfig;
use crate::package::resolver::{self, Resolution};
use crate::package::template::{Template, TemplateError, DEFAULT_TEMPLATE};

/// VCS advertised when a package does not name one.
pub const DEFAULT_VCS: &str = "git";

/// Errors raised while provisioning a package.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("package path must not be empty")]
    MissingPath,

    #[error("package '{0}' has no url")]
    MissingUrl(String),

    #[error("submodule #{index} of package '{package}' has no path")]
    MissingSubmodulePath { package: String, index: usize },

    #[error("parsing template for package '{package}': {source}")]
    Template {
        package: String,
        source: TemplateError,
    },
}

/// A submodule with its absolute path precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submodule {
    sub_path: String,
    absolute_path: String,
    url: String,
}

impl Submodule {
    pub fn new(parent_path: &str, sub_path: impl Into<String>, url: impl Into<String>) -> Self {
        let sub_path = sub_path.into();
        Self {
            absolute_path: format!("{parent_path}{sub_path}"),
            sub_path,
            url: url.into(),
        }
    }

    /// Path relative to the package path.
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// Package path followed by the sub-path.
    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    /// The submodule's own URL, or `None` when it inherits the package URL.
    pub fn url(&self) -> Option<&str> {
        (!self.url.is_empty()).then_some(self.url.as_str())
    }
}

/// One vanity import path, ready to serve requests.
///
/// Immutable once provisioned; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PackageRegistration {
    path: String,
    vcs: String,
    url: String,
    host: Option<String>,
    submodules: Vec<Submodule>,
    template: Template,
}

impl PackageRegistration {
    /// Build a registration from configuration.
    ///
    /// Fills in the default VCS and compiles the configured template, or the
    /// built-in one when none is given.
    pub fn provision(config: &PackageConfig) -> Result<Self, ProvisionError> {
        if config.path.is_empty() {
            return Err(ProvisionError::MissingPath);
        }
        if config.url.is_empty() {
            return Err(ProvisionError::MissingUrl(config.path.clone()));
        }

        let submodules = config
            .submodules
            .iter()
            .enumerate()
            .map(|(index, sub)| {
                if sub.path.is_empty() {
                    Err(ProvisionError::MissingSubmodulePath {
                        package: config.path.clone(),
                        index,
                    })
                } else {
                    Ok(Submodule::new(&config.path, &sub.path, &sub.url))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let vcs = if config.vcs.is_empty() {
            DEFAULT_VCS.to_string()
        } else {
            config.vcs.clone()
        };

        let source = config.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let template =
            Template::parse("Package", source).map_err(|source| ProvisionError::Template {
                package: config.path.clone(),
                source,
            })?;

        Ok(Self {
            path: config.path.clone(),
            vcs,
            url: config.url.clone(),
            host: config.host.as_ref().map(|h| h.to_lowercase()),
            submodules,
            template,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn vcs(&self) -> &str {
        &self.vcs
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lowercased host restriction, if any.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn submodules(&self) -> &[Submodule] {
        &self.submodules
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// See [`resolver::resolve`].
    pub fn resolve(&self, request_path: &str) -> Resolution<'_> {
        resolver::resolve(self, request_path)
    }
}
