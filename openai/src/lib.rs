//! Blocking client for OpenAI-compatible chat completion APIs, built on
//! `reqwest` and the shared `promptkit-core` abstractions.
//!
//! Any endpoint that speaks `POST {base_url}/chat/completions` works: `OpenAI`,
//! Azure deployments, `OpenRouter`, or a local server. Requests are retried
//! with exponential backoff on timeouts, transport errors, malformed replies,
//! HTTP 429 and 5xx.
//!
//! ```no_run
//! use promptkit_core::{CompletionProvider, TokenEstimator};
//! use promptkit_openai::ChatClient;
//!
//! # fn demo() -> Result<(), promptkit_openai::OpenAIError> {
//! // LLM_BASE_URL, LLM_MODEL and LLM_API_KEY must be set.
//! let client = ChatClient::from_env()?;
//! let estimator = TokenEstimator::shared(client.model()).unwrap_or_default();
//! let reply = client.generate_within("Summarise this long report ...", 3000, &estimator)?;
//! println!("{reply}");
//! # Ok(()) }
//! ```

mod client;
mod constant;
mod error;
mod request;
mod response;
mod retry;

pub use client::{Builder, ChatClient};
pub use constant::*;
pub use error::OpenAIError;
pub use retry::{RetryConfig, retry_with_backoff};
