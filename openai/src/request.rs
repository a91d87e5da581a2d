use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessagePayload<'a>; 1],
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessagePayload<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Single user-message request. `model` and `messages` in `extra` are ignored.
    pub fn user(model: &'a str, prompt: &'a str, mut extra: Map<String, Value>) -> Self {
        extra.remove("model");
        extra.remove("messages");
        Self {
            model,
            messages: [ChatMessagePayload {
                role: "user",
                content: prompt,
            }],
            extra,
        }
    }
}
