use thiserror::Error;

/// Errors that can arise when calling a chat completions endpoint.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// The prompt was empty after trimming; no request was sent.
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    /// A required setting was neither passed in nor found in the environment.
    #[error("{name} must be provided or the {env} environment variable must be set")]
    MissingConfig {
        /// Setting name.
        name: &'static str,
        /// Environment variable consulted.
        env: &'static str,
    },

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// Transport failure (connection refused, reset, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response JSON did not contain a completion.
    #[error("unexpected API response: {0}")]
    InvalidResponse(String),
}

impl OpenAIError {
    /// Whether a retry might succeed.
    ///
    /// Client errors other than 429 and local validation failures are final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Http(_) | Self::Json(_) | Self::InvalidResponse(_) => true,
            Self::Status { status, .. } => *status == 429 || *status < 400 || *status >= 500,
            Self::EmptyPrompt | Self::MissingConfig { .. } => false,
        }
    }
}

impl From<reqwest::Error> for OpenAIError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(value)
        }
    }
}
