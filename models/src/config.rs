//! File-backed overrides for the model table.
//!
//! A config file may be TOML or JSON and carries two optional maps keyed by
//! model-name prefix:
//!
//! ```toml
//! [chars_per_token]
//! "mistral-large" = 3.5
//!
//! [pricing."mistral-large"]
//! input = 0.002
//! output = 0.006
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::Pricing;

/// Overrides merged on top of the built-in [`ModelTable`](crate::ModelTable).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Characters-per-token ratio keyed by model prefix.
    pub chars_per_token: BTreeMap<String, f64>,
    /// USD price per 1K tokens keyed by model prefix.
    #[serde(alias = "models")]
    pub pricing: BTreeMap<String, PricingEntry>,
}

/// Pricing as written in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    /// Price per 1K prompt tokens.
    #[serde(default)]
    pub input: f64,
    /// Price per 1K completion tokens; defaults to `input` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
}

impl PricingEntry {
    /// Resolves the entry into a clamped [`Pricing`].
    #[must_use]
    pub fn resolve(self) -> Pricing {
        Pricing::new(self.input, self.output.unwrap_or(self.input))
    }
}

impl ModelConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    /// Returns [`ModelError::Toml`] on malformed input and
    /// [`ModelError::InvalidRatio`] on non-positive ratios.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    /// Returns [`ModelError::Json`] on malformed input and
    /// [`ModelError::InvalidRatio`] on non-positive ratios.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the format from its extension.
    ///
    /// # Errors
    /// Fails when the file cannot be read, has an unknown extension or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ModelError::UnsupportedFormat(path.to_path_buf())),
        };

        let source = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&source)
    }

    /// Checks that every ratio is finite and positive.
    ///
    /// # Errors
    /// Returns the first offending prefix as [`ModelError::InvalidRatio`].
    pub fn validate(&self) -> Result<()> {
        for (prefix, &value) in &self.chars_per_token {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidRatio {
                    prefix: prefix.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml() {
        let config = ModelConfig::from_toml_str(
            r#"
            [chars_per_token]
            "mistral" = 3.5

            [pricing.mistral]
            input = 0.002
            output = 0.006
            "#,
        )
        .unwrap();

        assert_eq!(config.chars_per_token.get("mistral"), Some(&3.5));
        let pricing = config.pricing["mistral"].resolve();
        assert_eq!(pricing, Pricing::new(0.002, 0.006));
    }

    #[test]
    fn parses_legacy_json_models_key() {
        let config =
            ModelConfig::from_json_str(r#"{"models": {"custom": {"input": 0.002}}}"#).unwrap();
        let pricing = config.pricing["custom"].resolve();
        assert_eq!(pricing.input, 0.002);
        assert_eq!(pricing.output, 0.002);
    }

    #[test]
    fn rejects_non_positive_ratio() {
        let err = ModelConfig::from_toml_str("[chars_per_token]\nbad = 0.0\n").unwrap_err();
        assert!(matches!(err, ModelError::InvalidRatio { ref prefix, .. } if prefix == "bad"));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(ModelConfig::from_toml_str("ratios = {}\n").is_err());
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("models.toml");
        std::fs::write(&toml_path, "[chars_per_token]\nllama = 3.0\n").unwrap();
        let json_path = dir.path().join("models.json");
        std::fs::write(&json_path, r#"{"chars_per_token": {"llama": 3.0}}"#).unwrap();

        assert_eq!(
            ModelConfig::load(&toml_path).unwrap(),
            ModelConfig::load(&json_path).unwrap()
        );

        let yaml_path = dir.path().join("models.yaml");
        std::fs::write(&yaml_path, "chars_per_token: {}").unwrap();
        assert!(matches!(
            ModelConfig::load(&yaml_path),
            Err(ModelError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ModelConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
