//! Heuristic token estimation.
//!
//! No tokenizer is bundled. A text is costed as the larger of its
//! whitespace-delimited word count and its character count divided by a
//! per-model chars-per-token ratio. The result over-counts for dense English
//! prose and stays usable for scripts written without spaces.

use promptkit_models::{DEFAULT_CHARS_PER_TOKEN, MIN_CHARS_PER_TOKEN, ModelTable, normalize_model};

use crate::error::Result;

/// Estimates token counts with a fixed chars-per-token ratio.
///
/// Resolve it once per model and reuse it; chunking estimates every candidate
/// piece and should not re-resolve the model each time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenEstimator {
    chars_per_token: f64,
}

impl TokenEstimator {
    /// Resolves the ratio for `model` from `table`.
    ///
    /// # Errors
    /// Returns an invalid-argument error when `model` is blank.
    pub fn for_model(table: &ModelTable, model: &str) -> Result<Self> {
        let model = normalize_model(model)?;
        Ok(Self {
            chars_per_token: table.chars_per_token(model),
        })
    }

    /// Resolves the ratio for `model` from the process-wide table.
    ///
    /// # Errors
    /// Returns an invalid-argument error when `model` is blank.
    pub fn shared(model: &str) -> Result<Self> {
        Self::for_model(ModelTable::shared(), model)
    }

    /// Creates an estimator with an explicit ratio.
    ///
    /// The ratio is clamped like table entries; non-finite values fall back to
    /// the default.
    #[must_use]
    pub fn with_ratio(chars_per_token: f64) -> Self {
        let chars_per_token = if chars_per_token.is_finite() {
            chars_per_token.max(MIN_CHARS_PER_TOKEN)
        } else {
            DEFAULT_CHARS_PER_TOKEN
        };
        Self { chars_per_token }
    }

    /// The ratio this estimator divides character counts by.
    #[must_use]
    pub const fn chars_per_token(&self) -> f64 {
        self.chars_per_token
    }

    /// Estimates the token count of `text`.
    ///
    /// Blank text costs nothing; anything else costs at least one token.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn estimate(&self, text: &str) -> usize {
        if text.trim().is_empty() {
            return 0;
        }
        let words = text.split_whitespace().count();
        let chars = text.chars().count();
        let by_chars = (chars as f64 / self.chars_per_token).ceil() as usize;
        words.max(by_chars.max(1))
    }

    /// Number of characters that fit in `token_limit` tokens, never below one.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn char_budget(&self, token_limit: usize) -> usize {
        ((token_limit as f64 * self.chars_per_token).floor() as usize).max(1)
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

/// Estimates the token count of `text` for `model` using the shared table.
///
/// # Errors
/// Returns an invalid-argument error when `model` is blank.
///
/// # Example
///
/// ```rust
/// use promptkit_core::estimate_tokens;
///
/// assert_eq!(estimate_tokens("", "gpt-4o").unwrap(), 0);
/// assert_eq!(estimate_tokens("Hello world", "gpt-3.5-turbo").unwrap(), 3);
/// assert!(estimate_tokens("Hello", "  ").is_err());
/// ```
pub fn estimate_tokens(text: &str, model: &str) -> Result<usize> {
    Ok(TokenEstimator::shared(model)?.estimate(text))
}
