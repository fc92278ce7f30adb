use crate::models::DonationRow;
use crate::services::backfill::ChunkStore;
use crate::services::flatten::FlatProject;
use anyhow::{Context, Result};
use async_trait::async_trait;
use donorgraph_models::Chunk;
use neo4rs::{query, Graph};
use std::sync::Arc;
use tracing::info;

/// Write side of the sync: upserts projects, chunks, and donations into the
/// graph store.
pub struct Neo4jImporter {
    graph: Arc<Graph>,
}

impl Neo4jImporter {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// Create lookup indexes so MERGE stays fast as the graph grows.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let indexes = [
            "CREATE INDEX project_id IF NOT EXISTS FOR (p:Project) ON (p.id)",
            "CREATE INDEX chunk_id IF NOT EXISTS FOR (c:Chunk) ON (c.id)",
            "CREATE INDEX donation_id IF NOT EXISTS FOR (d:Donation) ON (d.id)",
        ];

        for index_query in indexes {
            self.graph
                .run(query(index_query))
                .await
                .context("Failed to create index")?;
        }

        info!("✅ Graph indexes ready");
        Ok(())
    }

    /// Upsert a project node with all flattened properties.
    pub async fn import_project(&self, project: &FlatProject) -> Result<()> {
        let mut set_clauses = vec![
            "p.title = $title".to_string(),
            "p.description = $description".to_string(),
            "p.raised_amount = $raised_amount".to_string(),
            "p.giv_power = $giv_power".to_string(),
            "p.giv_power_rank = $giv_power_rank".to_string(),
            "p.listed = $listed".to_string(),
            "p.givbacks_eligible = $givbacks_eligible".to_string(),
            "p.in_active_qf_round = $in_active_qf_round".to_string(),
            "p.unique_donors = $unique_donors".to_string(),
            "p.owner_wallet = $owner_wallet".to_string(),
            "p.updated_at = $updated_at".to_string(),
        ];
        for (key, _) in project.addresses.iter().chain(project.socials.iter()) {
            set_clauses.push(format!("p.{key} = ${key}"));
        }

        let cypher = format!(
            "MERGE (p:Project {{id: $id}})\nSET {}",
            set_clauses.join(",\n    ")
        );

        let mut q = query(&cypher)
            .param("id", project.id)
            .param("title", project.title.clone())
            .param("description", project.description.clone().unwrap_or_default())
            .param("raised_amount", project.raised_amount)
            .param("giv_power", project.giv_power)
            .param("giv_power_rank", project.giv_power_rank.unwrap_or_default())
            .param("listed", project.listed)
            .param("givbacks_eligible", project.givbacks_eligible)
            .param("in_active_qf_round", project.in_active_qf_round)
            .param("unique_donors", project.unique_donors)
            .param("owner_wallet", project.owner_wallet.clone().unwrap_or_default())
            .param("updated_at", project.updated_at.clone().unwrap_or_default());

        for (key, value) in project.addresses.iter().chain(project.socials.iter()) {
            q = q.param(key.as_str(), value.clone().unwrap_or_default());
        }

        self.graph
            .run(q)
            .await
            .with_context(|| format!("Failed to import project {}", project.id))?;

        Ok(())
    }

    /// Check whether a chunk already carries an embedding in the graph, so
    /// the backfill can skip re-embedding unchanged description text.
    pub async fn chunk_has_embedding(&self, chunk_id: &str) -> Result<bool> {
        let mut result = self
            .graph
            .execute(
                query(
                    "MATCH (c:Chunk {id: $id}) \
                     WHERE size(coalesce(c.embedding, [])) > 0 \
                     RETURN c.id AS id LIMIT 1",
                )
                .param("id", chunk_id),
            )
            .await
            .context("Failed to look up chunk embedding")?;

        Ok(result.next().await?.is_some())
    }

    /// Upsert a chunk node and link it to its project.
    pub async fn import_chunk(&self, chunk: &Chunk) -> Result<()> {
        let q = query(
            "MATCH (p:Project {id: $project_id})\n\
             MERGE (c:Chunk {id: $id})\n\
             ON CREATE SET c.text = $text,\n\
                 c.created_at = $created_at,\n\
                 c.embedding = $embedding\n\
             MERGE (p)-[:HAS_CHUNK]->(c)",
        )
        .param("project_id", chunk.project_id)
        .param("id", chunk.id.to_string())
        .param("text", chunk.text.clone())
        .param("created_at", chunk.created_at.to_rfc3339())
        .param("embedding", chunk.embedding.clone().unwrap_or_default());

        self.graph
            .run(q)
            .await
            .with_context(|| format!("Failed to import chunk {}", chunk.id))?;

        Ok(())
    }

    /// Upsert a donation node and link it to its project.
    pub async fn import_donation(&self, donation: &DonationRow) -> Result<()> {
        let q = query(
            "MATCH (p:Project {id: $project_id})\n\
             MERGE (d:Donation {id: $id})\n\
             ON CREATE SET d.project_id = $project_id,\n\
                 d.tx_hash = $tx_hash,\n\
                 d.to_address = $to_address,\n\
                 d.from_address = $from_address,\n\
                 d.currency = $currency,\n\
                 d.anonymous = $anonymous,\n\
                 d.amount = $amount,\n\
                 d.value_usd = $value_usd,\n\
                 d.created_at = $created_at,\n\
                 d.chain_id = $chain_id,\n\
                 d.token_address = $token_address,\n\
                 d.chain_type = $chain_type\n\
             MERGE (p)-[:HAS_DONATION]->(d)",
        )
        .param("project_id", donation.project_id as i64)
        .param("id", donation.id)
        .param("tx_hash", donation.tx_hash.clone().unwrap_or_default())
        .param("to_address", donation.to_address.clone().unwrap_or_default())
        .param("from_address", donation.from_address.clone().unwrap_or_default())
        .param("currency", donation.currency.clone().unwrap_or_default())
        .param("anonymous", donation.anonymous)
        .param("amount", donation.amount)
        .param("value_usd", donation.value_usd.unwrap_or_default())
        .param("created_at", donation.created_at.map(|t| t.to_rfc3339()).unwrap_or_default())
        .param("chain_id", donation.chain_id.unwrap_or_default() as i64)
        .param("token_address", donation.token_address.clone().unwrap_or_default())
        .param("chain_type", donation.chain_type.clone().unwrap_or_default());

        self.graph
            .run(q)
            .await
            .with_context(|| format!("Failed to import donation {}", donation.id))?;

        Ok(())
    }
}

#[async_trait]
impl ChunkStore for Neo4jImporter {
    async fn chunk_has_embedding(&self, chunk_id: &str) -> Result<bool> {
        Neo4jImporter::chunk_has_embedding(self, chunk_id).await
    }

    async fn import_chunk(&self, chunk: &Chunk) -> Result<()> {
        Neo4jImporter::import_chunk(self, chunk).await
    }
}
