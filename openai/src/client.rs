use crate::{
    CHAT_COMPLETIONS_PATH, DEFAULT_TIMEOUT, ENV_API_KEY, ENV_BASE_URL, ENV_MODEL,
    OPENAI_BASE_URL,
    error::OpenAIError,
    request::ChatCompletionRequest,
    response::ChatCompletionResponse,
    retry::{RetryConfig, retry_with_backoff},
};
use promptkit_core::CompletionProvider;
use reqwest::blocking::Client;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc, time::Duration};

/// Blocking client for OpenAI-compatible `chat/completions` endpoints.
///
/// Cloning is cheap; clones share the connection pool and configuration.
///
/// ```no_run
/// use promptkit_openai::ChatClient;
///
/// # fn demo() -> Result<(), promptkit_openai::OpenAIError> {
/// let client = ChatClient::builder("sk-...")
///     .model("gpt-4o-mini")
///     .param("temperature", 0.2)
///     .build()?;
/// println!("{}", client.generate("What is the capital of France?")?);
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<Config>,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.inner.base_url)
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Start building a client with the given API key.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> Builder {
        Builder::new(api_key)
    }

    /// Build a client from `LLM_BASE_URL`, `LLM_MODEL` and `LLM_API_KEY`.
    ///
    /// # Errors
    /// [`OpenAIError::MissingConfig`] for the first unset variable, or a
    /// transport error if the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, OpenAIError> {
        Builder::from_lookup(|key| std::env::var(key).ok())?.build()
    }

    /// Model identifier sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Send `prompt` as a single user message and return the reply text.
    ///
    /// # Errors
    /// [`OpenAIError::EmptyPrompt`] for a blank prompt, otherwise the error of
    /// the last attempt once retries are exhausted or a non-retryable error
    /// occurs.
    pub fn generate(&self, prompt: &str) -> Result<String, OpenAIError> {
        self.generate_with(prompt, &Map::new())
    }

    /// Like [`generate`](Self::generate), with per-call body parameters merged
    /// over the builder's (for example `max_tokens` or `temperature`).
    ///
    /// # Errors
    /// See [`generate`](Self::generate).
    pub fn generate_with(
        &self,
        prompt: &str,
        params: &Map<String, Value>,
    ) -> Result<String, OpenAIError> {
        if prompt.trim().is_empty() {
            return Err(OpenAIError::EmptyPrompt);
        }

        let cfg = &self.inner;
        let mut extra = cfg.params.clone();
        extra.extend(params.iter().map(|(key, value)| (key.clone(), value.clone())));
        let request = ChatCompletionRequest::user(&cfg.model, prompt, extra);
        let url = cfg.request_url(CHAT_COMPLETIONS_PATH);

        let content = retry_with_backoff(
            &cfg.retry,
            |attempt| {
                tracing::debug!(attempt = attempt + 1, url = %url, "Sending completion request");
                self.send(&url, &request)
            },
            OpenAIError::is_retryable,
        )?;
        tracing::debug!(chars = content.chars().count(), "Received completion");
        Ok(content)
    }

    fn send(&self, url: &str, request: &ChatCompletionRequest<'_>) -> Result<String, OpenAIError> {
        let cfg = &self.inner;
        let response = cfg
            .http
            .post(url)
            .bearer_auth(&cfg.api_key)
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(OpenAIError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str::<ChatCompletionResponse>(&body)?.into_content()
    }
}

impl CompletionProvider for ChatClient {
    type Error = OpenAIError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        Self::generate(self, prompt)
    }
}

/// Builder for [`ChatClient`].
#[derive(Debug)]
pub struct Builder {
    api_key: String,
    base_url: String,
    model: Option<String>,
    params: Map<String, Value>,
    retry: RetryConfig,
    request_timeout: Duration,
}

impl Builder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: None,
            params: Map::new(),
            retry: RetryConfig::default(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder seeded from `LLM_BASE_URL`, `LLM_MODEL` and `LLM_API_KEY` as
    /// returned by `lookup`. Blank values count as unset.
    ///
    /// # Errors
    /// [`OpenAIError::MissingConfig`] naming the first missing value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OpenAIError> {
        let get = |name: &'static str, env: &'static str| {
            lookup(env)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(OpenAIError::MissingConfig { name, env })
        };
        let base_url = get("base_url", ENV_BASE_URL)?;
        let model = get("model", ENV_MODEL)?;
        let api_key = get("api_key", ENV_API_KEY)?;
        Ok(Self::new(api_key).base_url(base_url).model(model))
    }

    /// Set a custom API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Select a model identifier (e.g., `gpt-4o-mini`).
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into().trim().to_string());
        self
    }

    /// Add a body parameter sent with every request.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Configure retry behavior for failed requests.
    ///
    /// By default, up to 3 attempts are made with exponential backoff.
    /// Retries happen on transport errors, timeouts, malformed responses and
    /// HTTP 429 or 5xx.
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Disable retries entirely.
    #[must_use]
    pub fn no_retry(mut self) -> Self {
        self.retry = RetryConfig::none();
        self
    }

    /// Set the per-request timeout (default 60 seconds).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Consume the builder and create a [`ChatClient`].
    ///
    /// # Errors
    /// [`OpenAIError::MissingConfig`] when no model, key or base URL is set,
    /// or a transport error if the HTTP client cannot be created.
    pub fn build(self) -> Result<ChatClient, OpenAIError> {
        let model = self
            .model
            .filter(|model| !model.is_empty())
            .ok_or(OpenAIError::MissingConfig {
                name: "model",
                env: ENV_MODEL,
            })?;
        if self.api_key.trim().is_empty() {
            return Err(OpenAIError::MissingConfig {
                name: "api_key",
                env: ENV_API_KEY,
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(OpenAIError::MissingConfig {
                name: "base_url",
                env: ENV_BASE_URL,
            });
        }

        let http = Client::builder().timeout(self.request_timeout).build()?;
        tracing::info!(base_url = %self.base_url, model = %model, "Initialized chat client");
        Ok(ChatClient {
            inner: Arc::new(Config {
                api_key: self.api_key,
                base_url: self.base_url,
                model,
                params: self.params,
                retry: self.retry,
                http,
            }),
        })
    }
}

#[derive(Debug)]
struct Config {
    api_key: String,
    base_url: String,
    model: String,
    params: Map<String, Value>,
    retry: RetryConfig,
    http: Client,
}

impl Config {
    fn request_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_lookup_reads_all_three_variables() {
        let client = Builder::from_lookup(env(&[
            ("LLM_BASE_URL", "http://localhost:8080/v1/"),
            ("LLM_MODEL", " gpt-4o "),
            ("LLM_API_KEY", "secret"),
        ]))
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(
            client.inner.request_url(CHAT_COMPLETIONS_PATH),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn from_lookup_reports_first_missing_variable() {
        let err = Builder::from_lookup(env(&[("LLM_BASE_URL", "http://x"), ("LLM_API_KEY", "k")]))
            .unwrap_err();
        assert!(matches!(err, OpenAIError::MissingConfig { env: "LLM_MODEL", .. }));

        let err = Builder::from_lookup(env(&[
            ("LLM_BASE_URL", "http://x"),
            ("LLM_MODEL", "m"),
            ("LLM_API_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, OpenAIError::MissingConfig { name: "api_key", .. }));
    }

    #[test]
    fn build_requires_model_and_key() {
        assert!(matches!(
            ChatClient::builder("key").build(),
            Err(OpenAIError::MissingConfig { name: "model", .. })
        ));
        assert!(matches!(
            ChatClient::builder("").model("gpt-4o").build(),
            Err(OpenAIError::MissingConfig { name: "api_key", .. })
        ));
    }

    #[test]
    fn blank_prompt_is_rejected_without_a_request() {
        let client = ChatClient::builder("key")
            .base_url("http://127.0.0.1:9")
            .model("gpt-4o")
            .build()
            .unwrap();
        assert!(matches!(client.generate("  \n"), Err(OpenAIError::EmptyPrompt)));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = ChatClient::builder("super-secret").model("m").build().unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
