//! Endpoint constants and environment variable names.

use std::time::Duration;

/// Default `OpenAI` API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// [`Deepseek`](https://api-docs.deepseek.com)'s OpenAI-compatible base URL.
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
/// [`OpenRouter`](https://openrouter.ai)'s OpenAI-compatible base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "LLM_BASE_URL";
/// Environment variable holding the model identifier.
pub const ENV_MODEL: &str = "LLM_MODEL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "LLM_API_KEY";

/// Timeout applied to each request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Path appended to the base URL for completions.
pub(crate) const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
