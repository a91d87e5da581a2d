//! Error types for the model table.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving model identifiers or loading model configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model identifier was empty after trimming.
    #[error("model must be a non-empty string")]
    EmptyModel,

    /// Reading a configuration file failed.
    #[error("failed to read model config at {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML configuration could not be parsed.
    #[error("invalid TOML model config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON configuration could not be parsed.
    #[error("invalid JSON model config: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file extension is neither `.toml` nor `.json`.
    #[error("unsupported model config format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A chars-per-token ratio was not a finite positive number.
    #[error("invalid chars-per-token ratio for '{prefix}': {value}")]
    InvalidRatio {
        /// Model prefix the ratio was declared for.
        prefix: String,
        /// Rejected value.
        value: f64,
    },
}

/// Result type alias for model table operations.
pub type Result<T> = std::result::Result<T, ModelError>;
