//! Error types for the core crate.

use promptkit_models::ModelError;
use thiserror::Error;

/// Errors raised by token budgeting, chunking and the text utilities.
#[derive(Debug, Error)]
pub enum Error {
    /// `max_tokens` was zero.
    #[error("max_tokens must be a positive integer")]
    ZeroMaxTokens,

    /// `overlap_tokens` was not smaller than `max_tokens`.
    #[error("overlap_tokens ({overlap}) must be smaller than max_tokens ({max})")]
    OverlapTooLarge {
        /// Requested overlap.
        overlap: usize,
        /// Requested chunk size.
        max: usize,
    },

    /// `max_chars` was zero.
    #[error("max_chars must be a positive integer")]
    ZeroMaxChars,

    /// Resolving the model identifier failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// No pricing entry matches the model.
    #[error("no pricing data available for model '{0}'")]
    UnknownPricing(String),
}

impl Error {
    /// Returns `true` for errors caused by a bad argument rather than missing data.
    ///
    /// These are never worth retrying.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::ZeroMaxTokens
                | Self::OverlapTooLarge { .. }
                | Self::ZeroMaxChars
                | Self::Model(ModelError::EmptyModel)
        )
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
