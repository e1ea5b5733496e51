//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::directive::{parse_directives, DirectiveError};
use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Directive(#[from] DirectiveError),

    #[error("reading template '{path}': {source}")]
    TemplateFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a file.
///
/// The format follows the extension: `.toml`, `.json`, or the directive
/// format for anything else. Template files are read relative to the
/// config file and inlined.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    load_config_with(path, |_| {})
}

/// Load configuration, letting `overrides` adjust it before validation.
///
/// Command-line settings go through here so that a value they replace is
/// never validated.
pub fn load_config_with(
    path: &Path,
    overrides: impl FnOnce(&mut ServerConfig),
) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => ServerConfig {
            packages: parse_directives(&content)?,
            ..Default::default()
        },
    };
    overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    inline_templates(&mut config, base)?;

    Ok(config)
}

fn inline_templates(config: &mut ServerConfig, base: &Path) -> Result<(), ConfigError> {
    for package in &mut config.packages {
        if let Some(file) = package.template_file.take() {
            let text = fs::read_to_string(base.join(&file))
                .map_err(|source| ConfigError::TemplateFile { path: file, source })?;
            package.template = Some(text);
        }
    }
    Ok(())
}
