use crate::errors::{QueryError, QueryResult};
use donorgraph_config::PipelineSettings;
use donorgraph_llm::CompletionClient;
use donorgraph_models::UserRequest;
use std::sync::Arc;
use tracing::debug;

/// Turns a user request (and optionally a query embedding) into Cypher text.
pub struct QuerySynthesizer<C: CompletionClient> {
    llm: Arc<C>,
    pipeline: PipelineSettings,
}

impl<C: CompletionClient> QuerySynthesizer<C> {
    pub fn new(llm: Arc<C>, pipeline: PipelineSettings) -> Self {
        Self { llm, pipeline }
    }

    /// Ask the model for a Cypher query fulfilling the request.
    ///
    /// When an embedding is supplied the prompt pins down the vector
    /// parameter name, the similarity function and threshold, and similarity
    /// ordering; either way it demands the listed-only filter, coverage of
    /// every output field, and a result cap.
    pub async fn synthesize(
        &self,
        request: &UserRequest,
        schema_hint: &str,
        embedding_message: Option<&str>,
        embedding: Option<&[f64]>,
    ) -> QueryResult<String> {
        let prompt = self.build_prompt(request, schema_hint, embedding_message, embedding);
        debug!("Synthesis prompt:\n{}", prompt);

        let completion = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| QueryError::Synthesis(e.to_string()))?;

        Ok(strip_code_fences(&completion))
    }

    fn build_prompt(
        &self,
        request: &UserRequest,
        schema_hint: &str,
        embedding_message: Option<&str>,
        embedding: Option<&[f64]>,
    ) -> String {
        let mut prompt = format!(
            r#"Schema Information:
{schema_hint}

-------------------------------------------
Query: "{query}"
Output Format: {output_format}
-------------------------------------------
"#,
            schema_hint = schema_hint,
            query = request.query,
            output_format = request.output_format,
        );

        if embedding.is_some() {
            let message = embedding_message.unwrap_or(&request.query);
            prompt.push_str(&format!(
                r#"
I have an embedding of "{message}".
It will be passed as a parameter named queryVector.
For similarity use gds.similarity.cosine(c.embedding, $queryVector) and only keep
matches with similarity greater than {threshold}.
Order results by similarity descending.
"#,
                message = message,
                threshold = self.pipeline.similarity_threshold,
            ));
        } else {
            prompt.push_str(
                "\nFilter directly on node properties (equality, comparison, or substring \
                 matching) as the request demands.\n",
            );
        }

        prompt.push_str(&format!(
            r#"
Generate a Cypher query that can be executed on Neo4j to fulfill the request.
Only include projects where listed = true.
Include every field named in the output format; collect related sub-entities
with COLLECT(...) where the output format asks for them.
Unless the request names a count, limit results to {limit}.
Use gds page rank if it helps.
The query must be read-only: never use CREATE, MERGE, SET, DELETE or REMOVE.

Return only the Cypher query, no additional commentary."#,
            limit = self.pipeline.default_result_limit,
        ));

        prompt
    }
}

/// Strip leading/trailing markdown code fences and language tags.
///
/// Handles ```cypher ... ```, ```json ... ``` and bare ``` ... ``` wrappers.
pub(crate) fn strip_code_fences(text: &str) -> String {
    let text = text.trim();

    if text.starts_with("```") {
        let start = text.find('\n').map(|i| i + 1).unwrap_or(0);
        let end = text.rfind("```").unwrap_or(text.len());
        if start <= end {
            return text[start..end].trim().to_string();
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_language_tagged_fence() {
        let fenced = "```cypher\nMATCH (p:Project) RETURN p.id\n```";
        assert_eq!(strip_code_fences(fenced), "MATCH (p:Project) RETURN p.id");
    }

    #[test]
    fn test_strips_bare_fence() {
        let fenced = "```\nMATCH (p:Project) RETURN p.id\n```";
        assert_eq!(strip_code_fences(fenced), "MATCH (p:Project) RETURN p.id");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        let plain = "MATCH (p:Project) RETURN p.id";
        assert_eq!(strip_code_fences(plain), plain);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(
            strip_code_fences("\n  MATCH (p) RETURN p  \n"),
            "MATCH (p) RETURN p"
        );
    }
}
