use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A slice of a project description, ready for embedding and graph import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic ID derived from the chunk text, so re-syncing the same
    /// description never duplicates chunks.
    pub id: Uuid,
    pub project_id: i64,
    pub text: String,
    /// Present once the embedding backfill has run for this chunk.
    pub embedding: Option<Vec<f64>>,
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Derive the stable chunk ID for a piece of text.
    pub fn id_for_text(text: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, text.as_bytes())
    }

    pub fn new(project_id: i64, text: String) -> Self {
        Self {
            id: Self::id_for_text(&text),
            project_id,
            text,
            embedding: None,
            created_at: Utc::now(),
        }
    }
}
