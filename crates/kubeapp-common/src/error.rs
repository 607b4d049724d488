//! Unified error type for the kubeapp workspace.
//!
//! Every engine operation reports failures through [`KubeAppError`]; the CLI
//! wraps it in `anyhow` at the binary boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum KubeAppError {
    /// The requested app package is not declared by the template.
    #[error("app package not found: {id}")]
    PackageNotFound {
        /// Identifier that was looked up.
        id: String,
    },

    /// A package references a kube type missing from the catalog.
    #[error("kube type not found: {id}")]
    TierNotFound {
        /// Identifier of the missing kube type.
        id: String,
    },

    /// The filled template is not valid YAML.
    #[error("filled template is not valid YAML: {source}")]
    TemplateParse {
        /// Underlying parser error.
        #[from]
        source: serde_yaml::Error,
    },

    /// A field has neither a caller value nor a default.
    #[error("no value supplied for field \"{field}\" and it has no default")]
    MissingValue {
        /// Name of the unresolved field.
        field: String,
    },

    /// An app package declaration does not match the package model.
    #[error("invalid app package: {message}")]
    InvalidPackage {
        /// Description of the mismatch.
        message: String,
    },

    /// A pod document does not have the expected shape.
    #[error("invalid pod document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },

    /// A configuration or catalog value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, KubeAppError>;
