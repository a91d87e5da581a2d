//! Model-family table with chars-per-token ratios and pricing for popular LLMs.
//!
//! Token estimation and cost estimation both key off a model identifier such as
//! `gpt-4o-2024-05-13` or `claude-3-sonnet`. Rather than hard-coding a match per
//! family, the identifier is resolved against a [`ModelTable`] by the longest
//! case-insensitive prefix, so new families can be added through a config file.
//!
//! # Example
//!
//! ```rust
//! use promptkit_models::{ModelTable, Pricing};
//!
//! let table = ModelTable::builtin();
//! assert_eq!(table.chars_per_token("GPT-4o-2024-05-13"), 3.4);
//! assert_eq!(table.chars_per_token("some-unknown-model"), 4.0);
//!
//! // Longest prefix wins: "gpt-4o-mini" beats "gpt-4o".
//! assert_eq!(table.pricing("gpt-4o-mini").unwrap(), Pricing::new(0.0006, 0.0024));
//!
//! let table = table.with_chars_per_token("mistral", 3.5);
//! assert_eq!(table.chars_per_token("mistral-large-latest"), 3.5);
//! ```

mod config;
mod error;

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub use config::{ModelConfig, PricingEntry};
pub use error::{ModelError, Result};

/// Ratio used when no prefix matches.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 4.0;

/// Lower clamp applied to every resolved ratio.
pub const MIN_CHARS_PER_TOKEN: f64 = 2.5;

/// Environment variable naming a config file merged into [`ModelTable::shared`].
pub const CONFIG_ENV_VAR: &str = "PROMPTKIT_MODEL_CONFIG";

const BUILTIN_RATIOS: &[(&str, f64)] = &[
    ("gpt-4.1", 3.2),
    ("gpt-4o", 3.4),
    ("gpt-4", 3.7),
    ("gpt-3.5", 4.0),
    ("gpt-3", 4.2),
    ("text-davinci", 4.0),
    ("claude-3", 3.1),
    ("claude-2", 3.3),
    ("claude", 3.4),
    ("command-r", 3.2),
];

// USD per 1K tokens: (prefix, input, output)
const BUILTIN_PRICING: &[(&str, f64, f64)] = &[
    ("gpt-4.1", 0.010, 0.030),
    ("gpt-4o", 0.005, 0.015),
    ("gpt-4o-mini", 0.0006, 0.0024),
    ("gpt-4", 0.030, 0.060),
    ("gpt-3.5", 0.0015, 0.002),
    ("claude-3", 0.003, 0.015),
    ("claude-2", 0.008, 0.024),
    ("command-r", 0.0025, 0.0035),
];

/// Price of a model family in USD per 1K tokens.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pricing {
    /// Price per 1K prompt tokens.
    pub input: f64,
    /// Price per 1K completion tokens.
    pub output: f64,
}

impl Pricing {
    /// Creates a pricing entry; negative prices are clamped to zero.
    #[must_use]
    pub fn new(input: f64, output: f64) -> Self {
        Self {
            input: input.max(0.0),
            output: output.max(0.0),
        }
    }
}

/// Lookup table from model-name prefix to heuristics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelTable {
    ratios: Vec<(String, f64)>,
    pricing: Vec<(String, Pricing)>,
}

impl ModelTable {
    /// Creates a table with no entries; every model resolves to the defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the table shipped with the crate.
    #[must_use]
    pub fn builtin() -> Self {
        let ratios = BUILTIN_RATIOS
            .iter()
            .map(|&(prefix, ratio)| (prefix.to_string(), ratio))
            .collect();
        let pricing = BUILTIN_PRICING
            .iter()
            .map(|&(prefix, input, output)| (prefix.to_string(), Pricing::new(input, output)))
            .collect();
        Self { ratios, pricing }
    }

    /// Returns the process-wide table.
    ///
    /// Built once: the builtin table merged with the file named by
    /// [`CONFIG_ENV_VAR`] when that variable is set. A config that fails to load
    /// is logged and ignored.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<ModelTable> = OnceLock::new();
        SHARED.get_or_init(|| match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => match Self::from_path(&path) {
                Ok(table) => {
                    tracing::debug!(path = %Path::new(&path).display(), "loaded model config");
                    table
                }
                Err(err) => {
                    tracing::warn!(
                        path = %Path::new(&path).display(),
                        error = %err,
                        "failed to load model config, using built-in table"
                    );
                    Self::builtin()
                }
            },
            _ => Self::builtin(),
        })
    }

    /// Builtin table with the config file at `path` merged on top.
    ///
    /// # Errors
    /// Propagates any [`ModelConfig::load`] failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = ModelConfig::load(path)?;
        Ok(Self::builtin().apply(config))
    }

    /// Merges a config on top of this table; matching prefixes are replaced.
    #[must_use]
    pub fn apply(mut self, config: ModelConfig) -> Self {
        for (prefix, ratio) in config.chars_per_token {
            self = self.with_chars_per_token(prefix, ratio);
        }
        for (prefix, entry) in config.pricing {
            self = self.with_pricing(prefix, entry.resolve());
        }
        self
    }

    /// Sets the chars-per-token ratio for a prefix.
    #[must_use]
    pub fn with_chars_per_token(mut self, prefix: impl AsRef<str>, ratio: f64) -> Self {
        upsert(&mut self.ratios, prefix.as_ref(), ratio);
        self
    }

    /// Sets the pricing for a prefix.
    #[must_use]
    pub fn with_pricing(mut self, prefix: impl AsRef<str>, pricing: Pricing) -> Self {
        upsert(&mut self.pricing, prefix.as_ref(), pricing);
        self
    }

    /// Resolves the chars-per-token ratio for a model.
    ///
    /// Uses the longest matching prefix, clamped to [`MIN_CHARS_PER_TOKEN`], or
    /// [`DEFAULT_CHARS_PER_TOKEN`] when nothing matches.
    #[must_use]
    pub fn chars_per_token(&self, model: &str) -> f64 {
        longest_prefix(&self.ratios, model)
            .map_or(DEFAULT_CHARS_PER_TOKEN, |&ratio| ratio.max(MIN_CHARS_PER_TOKEN))
    }

    /// Resolves pricing for a model by longest matching prefix.
    #[must_use]
    pub fn pricing(&self, model: &str) -> Option<Pricing> {
        longest_prefix(&self.pricing, model).copied()
    }

    /// Iterates over the configured ratio prefixes.
    pub fn ratios(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ratios.iter().map(|(prefix, ratio)| (prefix.as_str(), *ratio))
    }

    /// Iterates over the configured pricing prefixes.
    pub fn prices(&self) -> impl Iterator<Item = (&str, Pricing)> {
        self.pricing
            .iter()
            .map(|(prefix, pricing)| (prefix.as_str(), *pricing))
    }
}

/// Trims a model identifier, rejecting blank ones.
///
/// # Errors
/// Returns [`ModelError::EmptyModel`] when nothing is left after trimming.
pub fn normalize_model(model: &str) -> Result<&str> {
    let trimmed = model.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyModel);
    }
    Ok(trimmed)
}

fn upsert<T>(entries: &mut Vec<(String, T)>, prefix: &str, value: T) {
    let prefix = prefix.trim().to_lowercase();
    if let Some(existing) = entries.iter_mut().find(|(p, _)| *p == prefix) {
        existing.1 = value;
    } else {
        entries.push((prefix, value));
    }
}

fn longest_prefix<'a, T>(entries: &'a [(String, T)], model: &str) -> Option<&'a T> {
    let model = model.trim().to_lowercase();
    entries
        .iter()
        .filter(|(prefix, _)| model.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, value)| value)
}
