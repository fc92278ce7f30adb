use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;

mod auth;
mod errors;
mod handlers;
mod services;

use auth::ApiKeyStore;
use donorgraph_config::Settings;
use donorgraph_graph::Neo4jClient;
use donorgraph_llm::OpenAiClient;
use handlers::query_handler::LiveQueryProcessor;
use services::QueryProcessor;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env().expect("Failed to load settings");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .expect("Failed to connect to Postgres");

    let auth = ApiKeyStore::new(pool.clone());
    auth.ensure_schema()
        .await
        .expect("Failed to prepare API key tables");

    tracing::info!("🔷 [Query Service] Connecting to Neo4j at {}...", settings.neo4j.uri);
    let neo4j = Neo4jClient::connect(&settings.neo4j)
        .await
        .expect("Failed to connect to Neo4j");

    let llm = Arc::new(OpenAiClient::new(&settings.openai).expect("Failed to create OpenAI client"));

    let processor: LiveQueryProcessor = QueryProcessor::new(
        Arc::clone(&llm),
        llm,
        Arc::new(neo4j),
        settings.schema_hint.clone(),
        settings.pipeline.clone(),
    );

    let processor = web::Data::new(processor);
    let auth = web::Data::new(auth);

    let port = env::var("QUERY_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("Invalid port number");

    tracing::info!("🚀 [Query Service] Starting on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(processor.clone())
            .app_data(auth.clone())
            .app_data(errors::json_config())
            .wrap(cors)
            .wrap(Logger::default())
            .route("/query", web::post().to(handlers::process_query))
            .route("/health", web::get().to(handlers::health))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
