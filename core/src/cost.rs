//! Request cost estimation from the pricing table.

use promptkit_models::{ModelTable, normalize_model};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tokens::TokenEstimator;

/// Share of prompt tokens assumed for the completion when none is given.
pub const DEFAULT_COMPLETION_RATIO: f64 = 0.25;

/// Breakdown of an estimated request cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    /// Estimated prompt tokens.
    pub prompt_tokens: usize,
    /// Expected completion tokens.
    pub completion_tokens: usize,
    /// Total in USD, rounded to 8 decimals.
    pub total_usd: f64,
}

/// Estimates the USD cost of sending `text` to `model` using the shared table.
///
/// Without `expected_response_tokens` the completion is assumed to be a quarter
/// of the prompt, rounded up.
///
/// # Errors
/// Returns an invalid-argument error for a blank model and
/// [`Error::UnknownPricing`] when no pricing entry matches.
pub fn estimate_llm_cost(
    text: &str,
    model: &str,
    expected_response_tokens: Option<usize>,
) -> Result<f64> {
    estimate_llm_cost_with(ModelTable::shared(), text, model, expected_response_tokens)
}

/// Same as [`estimate_llm_cost`] against an explicit table.
///
/// # Errors
/// See [`estimate_llm_cost`].
pub fn estimate_llm_cost_with(
    table: &ModelTable,
    text: &str,
    model: &str,
    expected_response_tokens: Option<usize>,
) -> Result<f64> {
    Ok(estimate_cost(table, text, model, expected_response_tokens)?.total_usd)
}

/// Full breakdown behind [`estimate_llm_cost_with`].
///
/// # Errors
/// See [`estimate_llm_cost`].
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn estimate_cost(
    table: &ModelTable,
    text: &str,
    model: &str,
    expected_response_tokens: Option<usize>,
) -> Result<CostEstimate> {
    let model = normalize_model(model)?;
    let prompt_tokens = TokenEstimator::for_model(table, model)?.estimate(text);
    let completion_tokens = expected_response_tokens
        .unwrap_or_else(|| (prompt_tokens as f64 * DEFAULT_COMPLETION_RATIO).ceil() as usize);
    let pricing = table
        .pricing(model)
        .ok_or_else(|| Error::UnknownPricing(model.to_string()))?;

    let total = (prompt_tokens as f64 / 1000.0).mul_add(
        pricing.input,
        completion_tokens as f64 / 1000.0 * pricing.output,
    );
    Ok(CostEstimate {
        prompt_tokens,
        completion_tokens,
        total_usd: round_to_8(total),
    })
}

fn round_to_8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptkit_models::Pricing;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }

    #[test]
    fn default_completion_is_a_quarter_of_prompt() {
        let table = ModelTable::builtin();
        // 11 chars / 3.4 -> 4 prompt tokens, 1 completion token
        let estimate = estimate_cost(&table, "Hello world", "gpt-4o", None).unwrap();
        assert_eq!(estimate.prompt_tokens, 4);
        assert_eq!(estimate.completion_tokens, 1);
        assert_close(estimate.total_usd, 0.000_035);
    }

    #[test]
    fn explicit_completion_tokens() {
        let table = ModelTable::builtin();
        let cost = estimate_llm_cost_with(&table, "Hello world", "gpt-4o", Some(1000)).unwrap();
        assert_close(cost, 0.015_02);
    }

    #[test]
    fn longest_prefix_selects_mini_pricing() {
        let table = ModelTable::builtin();
        let cost = estimate_llm_cost_with(&table, "Hello world", "gpt-4o-mini", Some(0)).unwrap();
        assert_close(cost, 0.000_002_4);
    }

    #[test]
    fn override_without_output_uses_input_price() {
        let table = ModelTable::empty().with_pricing("custom", Pricing::new(0.002, 0.002));
        let cost = estimate_llm_cost_with(&table, "Hello", "custom-model", None).unwrap();
        // 2 prompt tokens, 1 completion token
        assert_close(cost, 0.000_006);
    }

    #[test]
    fn unknown_model_has_no_pricing() {
        let err = estimate_llm_cost_with(&ModelTable::builtin(), "hi", "mystery-model", None)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPricing(ref model) if model == "mystery-model"));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn blank_model_is_invalid() {
        let err = estimate_llm_cost("hi", "  ", None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn empty_prompt_costs_nothing() {
        let cost = estimate_llm_cost_with(&ModelTable::builtin(), "", "gpt-4", None).unwrap();
        assert_close(cost, 0.0);
    }

    #[test]
    fn rounds_to_eight_decimals() {
        assert_close(round_to_8(0.123_456_789_9), 0.123_456_79);
    }
}
