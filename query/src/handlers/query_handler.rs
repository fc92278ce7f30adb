use actix_web::{web, HttpRequest, HttpResponse};
use donorgraph_graph::Neo4jClient;
use donorgraph_llm::OpenAiClient;
use donorgraph_models::UserRequest;
use tracing::{info, warn};

use crate::auth::ApiKeyStore;
use crate::errors::{QueryError, QueryResult};
use crate::services::QueryProcessor;

/// The processor type as assembled in `main` with live collaborators.
pub type LiveQueryProcessor = QueryProcessor<OpenAiClient, OpenAiClient, Neo4jClient>;

/// Handler for the natural-language analytics endpoint.
///
/// Verifies the shared-secret API key, records usage, then runs the full
/// classify → embed → synthesize → execute pipeline and returns the rows.
pub async fn process_query(
    req: HttpRequest,
    payload: web::Json<UserRequest>,
    processor: web::Data<LiveQueryProcessor>,
    auth: web::Data<ApiKeyStore>,
) -> QueryResult<HttpResponse> {
    let api_key = req
        .headers()
        .get("X-API-KEY")
        .and_then(|value| value.to_str().ok())
        .ok_or(QueryError::Unauthorized)?;

    if !auth.verify(api_key).await? {
        return Err(QueryError::Unauthorized);
    }

    let body = serde_json::to_string(&payload.0).unwrap_or_default();
    if let Err(e) = auth.log_usage(api_key, "/query", &body).await {
        // Usage logging must not take the endpoint down.
        warn!("Failed to log API key usage: {}", e);
    }

    info!("📥 Processing request: {}", payload.query);
    let rows = processor.process(&payload).await?;

    Ok(HttpResponse::Ok().json(rows))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "graph_query"
    }))
}
