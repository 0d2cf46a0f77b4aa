// qprofile-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(qprofile::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    #[diagnostic(code(qprofile::infra::walk))]
    Walk(#[from] walkdir::Error),

    // --- CONFIG / YAML ---
    #[error("Failed to parse '{path}': {source}")]
    #[diagnostic(
        code(qprofile::infra::yaml_file),
        help("Check your YAML syntax (indentation, types).")
    )]
    InvalidFile {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid definition in '{path}': {source}")]
    #[diagnostic(code(qprofile::infra::validation))]
    Validation {
        path: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(qprofile::infra::config_missing))]
    ConfigNotFound(String),
}
