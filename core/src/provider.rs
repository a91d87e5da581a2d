//! Text completion providers.
//!
//! The core never calls a model itself. Provider crates implement
//! [`CompletionProvider`] so callers can budget a prompt with this crate and
//! hand it to whichever backend they use.
//!
//! ```rust
//! use promptkit_core::{CompletionProvider, TokenEstimator};
//!
//! struct Echo;
//!
//! impl CompletionProvider for Echo {
//!     type Error = std::convert::Infallible;
//!
//!     fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
//!         Ok(prompt.to_string())
//!     }
//! }
//!
//! let estimator = TokenEstimator::default();
//! let reply = Echo.generate_within(&"word ".repeat(100), 3, &estimator).unwrap();
//! assert_eq!(reply, "word word word");
//! ```

use crate::tokens::TokenEstimator;
use crate::truncate::truncate_with;

/// A backend that turns a prompt into a completion.
pub trait CompletionProvider {
    /// Error returned when generation fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `prompt` and returns the completion text.
    ///
    /// # Errors
    /// Implementation-specific; see the provider crate.
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Truncates `prompt` to `max_tokens` on sentence boundaries, then generates.
    ///
    /// # Errors
    /// Whatever [`generate`](Self::generate) returns.
    fn generate_within(
        &self,
        prompt: &str,
        max_tokens: usize,
        estimator: &TokenEstimator,
    ) -> Result<String, Self::Error> {
        let prompt = truncate_with(prompt, max_tokens, estimator);
        tracing::debug!(
            prompt_tokens = estimator.estimate(&prompt),
            max_tokens,
            "generating with budgeted prompt"
        );
        self.generate(&prompt)
    }
}

impl<T: CompletionProvider + ?Sized> CompletionProvider for &T {
    type Error = T::Error;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).generate(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        prompts: RefCell<Vec<String>>,
    }

    impl CompletionProvider for Recorder {
        type Error = std::fmt::Error;

        fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(format!("{} chars", prompt.chars().count()))
        }
    }

    #[test]
    fn generate_within_sends_truncated_prompt() {
        let recorder = Recorder::default();
        let estimator = TokenEstimator::with_ratio(4.0);
        let reply = recorder
            .generate_within("Keep this. Drop this sentence entirely.", 3, &estimator)
            .unwrap();
        assert_eq!(reply, "10 chars");
        assert_eq!(recorder.prompts.borrow().as_slice(), ["Keep this."]);
    }

    #[test]
    fn references_forward_to_provider() {
        fn call(provider: impl CompletionProvider) -> String {
            provider.generate("hi").unwrap_or_default()
        }
        let recorder = Recorder::default();
        assert_eq!(call(&recorder), "2 chars");
    }
}
