use anyhow::{Context, Result};
use donorgraph_config::Settings;
use donorgraph_graph::Neo4jClient;
use donorgraph_llm::OpenAiClient;
use sqlx::postgres::PgPoolOptions;
use std::env;
use tracing::info;

mod models;
mod services;

use services::chunking::TextSplitterConfig;
use services::{flatten_project, sync_project_chunks, Neo4jImporter, SourceRepository};

/// One-shot sync: pull listed projects and their donations from Postgres,
/// chunk and embed description text, and upsert everything into Neo4j.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env()?;

    let project_limit = env::var("SYNC_PROJECT_LIMIT")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(50);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    let neo4j = Neo4jClient::connect(&settings.neo4j)
        .await
        .context("Failed to connect to Neo4j")?;

    let embedder = OpenAiClient::new(&settings.openai)?;
    let source = SourceRepository::new(pool);
    let importer = Neo4jImporter::new(neo4j.graph());

    importer.ensure_indexes().await?;

    let splitter = TextSplitterConfig::default();
    let projects = source.fetch_projects(project_limit).await?;
    let project_ids: Vec<i32> = projects.iter().map(|p| p.id).collect();

    let mut chunk_count = 0usize;
    let mut embedded_count = 0usize;

    for row in &projects {
        let project = flatten_project(row);
        importer.import_project(&project).await?;

        let Some(description) = &project.description else {
            continue;
        };

        let stats =
            sync_project_chunks(&importer, &embedder, project.id, description, &splitter).await?;
        chunk_count += stats.chunks;
        embedded_count += stats.embedded;
    }
    info!(
        "✅ Synced {} projects ({} chunks, {} newly embedded)",
        projects.len(),
        chunk_count,
        embedded_count
    );

    let donations = source.fetch_donations(&project_ids).await?;
    for donation in &donations {
        importer.import_donation(donation).await?;
    }
    info!("✅ Synced {} donations", donations.len());

    Ok(())
}
