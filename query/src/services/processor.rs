use crate::errors::{QueryError, QueryResult};
use crate::services::sanitizer::{ensure_read_only, sanitize};
use crate::services::{IntentClassifier, QuerySynthesizer};
use donorgraph_config::PipelineSettings;
use donorgraph_graph::{GraphExecutor, ParamValue, Params};
use donorgraph_llm::{CompletionClient, EmbeddingClient};
use donorgraph_models::UserRequest;
use std::sync::Arc;
use tracing::info;

/// End-to-end request pipeline: classify → (embed) → synthesize → sanitize →
/// execute.
///
/// Every stage failure aborts the whole call with the originating error; the
/// only locally recovered condition is an unparseable classifier response,
/// which the classifier itself downgrades to "no embedding needed".
pub struct QueryProcessor<C, E, G>
where
    C: CompletionClient,
    E: EmbeddingClient,
    G: GraphExecutor,
{
    classifier: IntentClassifier<C>,
    synthesizer: QuerySynthesizer<C>,
    embedder: Arc<E>,
    executor: Arc<G>,
    schema_hint: String,
}

impl<C, E, G> QueryProcessor<C, E, G>
where
    C: CompletionClient,
    E: EmbeddingClient,
    G: GraphExecutor,
{
    pub fn new(
        llm: Arc<C>,
        embedder: Arc<E>,
        executor: Arc<G>,
        schema_hint: String,
        pipeline: PipelineSettings,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(Arc::clone(&llm)),
            synthesizer: QuerySynthesizer::new(llm, pipeline),
            embedder,
            executor,
            schema_hint,
        }
    }

    /// Process one user request and return the materialized result rows.
    pub async fn process(&self, request: &UserRequest) -> QueryResult<Vec<serde_json::Value>> {
        if request.query.trim().is_empty() {
            return Err(QueryError::InvalidRequest("query must not be empty".to_string()));
        }

        let decision = self.classifier.classify(request, &self.schema_hint).await?;
        info!(
            "🔎 Embedding needed: {} (message: {:?})",
            decision.embedding_needed, decision.embedding_message
        );

        let (embedding_message, embedding) = if decision.embedding_needed {
            // The classifier occasionally flags semantic search without
            // extracting a phrase; the raw query text is the fallback.
            let message = decision
                .embedding_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| request.query.clone());

            let vector = self
                .embedder
                .embed(&message)
                .await
                .map_err(|e| QueryError::Embedding(e.to_string()))?;

            info!("🧮 Generated embedding for '{}' ({} dims)", message, vector.len());
            (Some(message), Some(vector))
        } else {
            (None, None)
        };

        let raw = self
            .synthesizer
            .synthesize(
                request,
                &self.schema_hint,
                embedding_message.as_deref(),
                embedding.as_deref(),
            )
            .await?;

        let cypher = sanitize(&raw);
        ensure_read_only(&cypher)?;
        info!("📜 Synthesized Cypher:\n{}", cypher);

        let mut params: Params = Vec::new();
        if let Some(vector) = embedding {
            params.push(("queryVector".to_string(), ParamValue::Vector(vector)));
        }

        let rows = self
            .executor
            .run(&cypher, params)
            .await
            .map_err(|e| QueryError::Execution(e.to_string()))?;

        info!("✅ Query returned {} rows", rows.len());
        Ok(rows)
    }
}
