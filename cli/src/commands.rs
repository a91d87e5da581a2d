//! Subcommand implementations. Each returns the text printed to stdout.

use anyhow::{Context, Result};
use promptkit_core::chunking::{Chunker, TokenChunker};
use promptkit_core::{
    CompletionProvider, Document, TokenEstimator, clean_text, estimate_cost, extract_all_json,
    merge_context_snippets, safe_extract_json, split_into_chunks_with, summarise_text,
    truncate_with,
};
use promptkit_models::ModelTable;
use promptkit_openai::ChatClient;

/// Separator printed between plain-text chunks.
const CHUNK_SEPARATOR: &str = "\n---\n";

/// Model table and model identifier shared by the subcommands.
pub struct Session {
    table: ModelTable,
    model: String,
}

impl Session {
    pub const fn new(table: ModelTable, model: String) -> Self {
        Self { table, model }
    }

    fn estimator(&self) -> Result<TokenEstimator> {
        Ok(TokenEstimator::for_model(&self.table, &self.model)?)
    }

    pub fn clean(&self, text: &str) -> String {
        clean_text(text)
    }

    pub fn tokens(&self, text: &str) -> Result<String> {
        Ok(self.estimator()?.estimate(text).to_string())
    }

    pub fn truncate(&self, text: &str, max_tokens: usize) -> Result<String> {
        Ok(truncate_with(text, max_tokens, &self.estimator()?))
    }

    pub fn chunk(&self, text: &str, max_tokens: usize, overlap: usize) -> Result<String> {
        let chunks = split_into_chunks_with(&self.table, text, max_tokens, overlap, &self.model)?;
        tracing::info!(chunks = chunks.len(), "chunked input");
        Ok(chunks.join(CHUNK_SEPARATOR))
    }

    pub fn chunk_json(
        &self,
        doc_id: &str,
        text: &str,
        max_tokens: usize,
        overlap: usize,
    ) -> Result<String> {
        let chunker = TokenChunker::for_model(&self.table, max_tokens, overlap, &self.model)?;
        let chunks = chunker.chunk(&Document::new(doc_id, text))?;
        tracing::info!(chunks = chunks.len(), chunker = chunker.name(), "chunked input");
        Ok(serde_json::to_string_pretty(&chunks)?)
    }

    pub fn cost(&self, text: &str, response_tokens: Option<usize>) -> Result<String> {
        let estimate = estimate_cost(&self.table, text, &self.model, response_tokens)?;
        Ok(format!(
            "prompt tokens: {}\ncompletion tokens: {}\nestimated cost: ${:.8}",
            estimate.prompt_tokens, estimate.completion_tokens, estimate.total_usd
        ))
    }

    pub fn summarise(&self, text: &str, max_chars: usize) -> Result<String> {
        Ok(summarise_text(text, max_chars)?)
    }

    pub fn extract_json(&self, text: &str, all: bool) -> Result<String> {
        if all {
            return Ok(serde_json::to_string_pretty(&extract_all_json(text))?);
        }
        let value = safe_extract_json(text).context("no JSON found in input")?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    pub fn merge(&self, snippets: &[String], separator: &str) -> String {
        merge_context_snippets(snippets, separator)
    }

    pub fn generate(&self, prompt: &str, max_tokens: Option<usize>) -> Result<String> {
        let client = ChatClient::from_env()?;
        let reply = match max_tokens {
            Some(max_tokens) => {
                let estimator = TokenEstimator::for_model(&self.table, client.model())?;
                client.generate_within(prompt, max_tokens, &estimator)?
            }
            None => client.generate(prompt)?,
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(model: &str) -> Session {
        Session::new(ModelTable::builtin(), model.to_string())
    }

    #[test]
    fn tokens_and_truncate() {
        let session = session("gpt-3.5-turbo");
        assert_eq!(session.tokens("Hello world").unwrap(), "3");
        assert_eq!(
            session.truncate("Sentence one. Sentence two.", 4).unwrap(),
            "Sentence one."
        );
    }

    #[test]
    fn blank_model_is_reported() {
        let err = session("  ").tokens("text").unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn chunk_plain_and_json() {
        let session = session("gpt-3.5-turbo");
        let text = "Sentence one. Sentence two. Sentence three.";
        assert_eq!(
            session.chunk(text, 8, 0).unwrap(),
            "Sentence one. Sentence two.\n---\nSentence three."
        );

        let json: serde_json::Value =
            serde_json::from_str(&session.chunk_json("notes", text, 8, 0).unwrap()).unwrap();
        assert_eq!(json[0]["id"], "notes#chunk_0");
        assert_eq!(json[1]["text"], "Sentence three.");
        assert_eq!(json[1]["token_count"], 4);
    }

    #[test]
    fn chunk_rejects_bad_overlap() {
        let err = session("gpt-4o").chunk("text", 4, 4).unwrap_err();
        assert!(err.to_string().contains("overlap_tokens"));
    }

    #[test]
    fn cost_breakdown() {
        let output = session("gpt-4o").cost("Hello world", None).unwrap();
        assert_eq!(
            output,
            "prompt tokens: 4\ncompletion tokens: 1\nestimated cost: $0.00003500"
        );
        assert!(session("mystery").cost("hi", None).is_err());
    }

    #[test]
    fn extract_json_modes() {
        let session = session("gpt-4o");
        let reply = r#"First: {"a": 1} Second: {"b": 2}"#;
        let first: serde_json::Value =
            serde_json::from_str(&session.extract_json(reply, false).unwrap()).unwrap();
        assert_eq!(first, serde_json::json!({"a": 1}));
        let all: serde_json::Value =
            serde_json::from_str(&session.extract_json(reply, true).unwrap()).unwrap();
        assert_eq!(all, serde_json::json!([{"a": 1}, {"b": 2}]));
        assert!(session.extract_json("nothing here", false).is_err());
    }

    #[test]
    fn merge_and_clean() {
        let session = session("gpt-4o");
        let snippets = vec!["  a ".to_string(), " ".to_string(), "b".to_string()];
        assert_eq!(session.merge(&snippets, " | "), "a | b");
        assert_eq!(session.clean(" x \n\n y "), "x y");
    }

    #[test]
    fn summarise_rejects_zero_budget() {
        assert!(session("gpt-4o").summarise("text", 0).is_err());
    }
}
