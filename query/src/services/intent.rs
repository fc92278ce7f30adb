use crate::errors::{QueryError, QueryResult};
use donorgraph_llm::CompletionClient;
use donorgraph_models::{EmbeddingDecision, UserRequest};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a request needs semantic search, and if so extracts the
/// phrase to embed.
pub struct IntentClassifier<C: CompletionClient> {
    llm: Arc<C>,
}

impl<C: CompletionClient> IntentClassifier<C> {
    pub fn new(llm: Arc<C>) -> Self {
        Self { llm }
    }

    /// Ask the model whether the request calls for embedding-based search.
    ///
    /// A transport failure of the completion call is fatal; a response that
    /// does not parse as the expected decision shape is not, and falls back
    /// to "no embedding needed".
    pub async fn classify(
        &self,
        request: &UserRequest,
        schema_hint: &str,
    ) -> QueryResult<EmbeddingDecision> {
        let prompt = build_classification_prompt(request, schema_hint);

        let raw = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| QueryError::Classification(e.to_string()))?;

        debug!("Embedding check result: {}", raw);
        Ok(parse_decision(&raw))
    }
}

fn build_classification_prompt(request: &UserRequest, schema_hint: &str) -> String {
    format!(
        r#"Schema Information:
{schema_hint}
-----------------------------------
Output Format: {output_format}
-----------------------------------

The user has requested the following:
BEGINNING OF THE QUERY:
{query}
END OF THE QUERY

By looking at the query, infer whether any semantic search against text content is needed.
If it is, provide a short phrase suitable for generating an embedding.
For example, if the query asks "provide me 2 projects related to climate change impact on renewable energy",
the embedding message should be "climate change impact on renewable energy".
But if the query is like "provide me 2 random projects", no embedding is needed.

Respond strictly in this JSON format:
{{
    "embedding_needed": true/false,
    "embedding_message": "message to embed"
}}"#,
        schema_hint = schema_hint,
        output_format = request.output_format,
        query = request.query,
    )
}

lazy_static! {
    // Boolean tokens in value position, whatever the casing the model chose.
    static ref TRUE_VALUE: Regex = Regex::new(r"(?i):(\s*)true\b").unwrap();
    static ref FALSE_VALUE: Regex = Regex::new(r"(?i):(\s*)false\b").unwrap();
}

/// Parse the model's decision text, tolerating the usual deviations:
/// surrounding prose, code fences, and Python-cased booleans. Anything that
/// still fails to parse yields the no-embedding default rather than an error.
pub(crate) fn parse_decision(raw: &str) -> EmbeddingDecision {
    let candidate = extract_json_object(raw);
    let normalized = normalize_boolean_tokens(&candidate);

    match serde_json::from_str::<EmbeddingDecision>(&normalized) {
        Ok(decision) => decision,
        Err(e) => {
            warn!("Unparseable classifier output ({}), assuming no embedding needed", e);
            EmbeddingDecision::default()
        }
    }
}

/// Slice out the outermost JSON object, dropping any commentary around it.
fn extract_json_object(raw: &str) -> String {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => raw[start..=end].to_string(),
        _ => raw.to_string(),
    }
}

/// Normalize `True`/`FALSE`-style tokens in value position to JSON booleans.
fn normalize_boolean_tokens(text: &str) -> String {
    let text = TRUE_VALUE.replace_all(text, ":${1}true");
    FALSE_VALUE.replace_all(&text, ":${1}false").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_proper_json() {
        let decision =
            parse_decision(r#"{"embedding_needed": true, "embedding_message": "kids health"}"#);
        assert!(decision.embedding_needed);
        assert_eq!(decision.embedding_message.as_deref(), Some("kids health"));
    }

    #[test]
    fn test_normalizes_python_cased_booleans() {
        let propercase =
            parse_decision(r#"{"embedding_needed": True, "embedding_message": "ocean cleanup"}"#);
        let lowercase =
            parse_decision(r#"{"embedding_needed": true, "embedding_message": "ocean cleanup"}"#);
        assert_eq!(propercase.embedding_needed, lowercase.embedding_needed);
        assert_eq!(propercase.embedding_message, lowercase.embedding_message);
        assert!(propercase.embedding_needed);

        let negative = parse_decision(r#"{"embedding_needed": FALSE}"#);
        assert!(!negative.embedding_needed);
    }

    #[test]
    fn test_strips_surrounding_commentary() {
        let decision = parse_decision(
            "Sure! Here is the answer:\n{\"embedding_needed\": false}\nLet me know if you need more.",
        );
        assert!(!decision.embedding_needed);
    }

    #[test]
    fn test_truncated_json_falls_back_to_default() {
        let decision = parse_decision(r#"{"embedding_needed": true, "embedding_mes"#);
        assert!(!decision.embedding_needed);
        assert!(decision.embedding_message.is_none());
    }

    #[test]
    fn test_empty_output_falls_back_to_default() {
        let decision = parse_decision("");
        assert!(!decision.embedding_needed);
    }

    #[test]
    fn test_boolean_in_message_text_is_untouched() {
        let decision = parse_decision(
            r#"{"embedding_needed": True, "embedding_message": "True crime projects"}"#,
        );
        assert!(decision.embedding_needed);
        assert_eq!(
            decision.embedding_message.as_deref(),
            Some("True crime projects")
        );
    }
}
