use serde::Deserialize;

use crate::error::OpenAIError;

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    pub fn into_content(self) -> Result<String, OpenAIError> {
        let first = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAIError::InvalidResponse("no choices returned".into()))?;
        match first.message.and_then(|message| message.content) {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(OpenAIError::InvalidResponse("API returned empty content".into())),
        }
    }
}
