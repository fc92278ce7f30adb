use crate::services::chunking::{chunk_text, TextSplitterConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use donorgraph_llm::EmbeddingClient;
use donorgraph_models::Chunk;

/// Storage operations the chunk backfill needs from the graph importer.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn chunk_has_embedding(&self, chunk_id: &str) -> Result<bool>;
    async fn import_chunk(&self, chunk: &Chunk) -> Result<()>;
}

/// Counters for one project's chunk sync.
#[derive(Debug, Default)]
pub struct ChunkSyncStats {
    pub chunks: usize,
    pub embedded: usize,
}

/// Chunk a project description and upsert every chunk into the graph.
///
/// Chunk ids are derived from the text alone, so two projects with identical
/// description text share one chunk node. The upsert therefore runs for every
/// chunk, so each project gets its own relationship to the shared node; a
/// stored embedding only skips the embedding call, never the upsert.
pub async fn sync_project_chunks<S, E>(
    store: &S,
    embedder: &E,
    project_id: i64,
    description: &str,
    splitter: &TextSplitterConfig,
) -> Result<ChunkSyncStats>
where
    S: ChunkStore,
    E: EmbeddingClient,
{
    let mut stats = ChunkSyncStats::default();

    for text in chunk_text(description, splitter) {
        let mut chunk = Chunk::new(project_id, text);
        stats.chunks += 1;

        if !store.chunk_has_embedding(&chunk.id.to_string()).await? {
            chunk.embedding = Some(
                embedder
                    .embed(&chunk.text)
                    .await
                    .with_context(|| format!("Failed to embed chunk {}", chunk.id))?,
            );
            stats.embedded += 1;
        }

        store.import_chunk(&chunk).await?;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory store mimicking the graph upsert: an import with an
    /// embedding marks the chunk id as embedded, later imports of the same
    /// id leave the stored vector alone.
    #[derive(Default)]
    struct MemoryStore {
        embedded_ids: Mutex<HashSet<String>>,
        imports: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl ChunkStore for MemoryStore {
        async fn chunk_has_embedding(&self, chunk_id: &str) -> Result<bool> {
            Ok(self.embedded_ids.lock().unwrap().contains(chunk_id))
        }

        async fn import_chunk(&self, chunk: &Chunk) -> Result<()> {
            let id = chunk.id.to_string();
            if chunk.embedding.is_some() {
                self.embedded_ids.lock().unwrap().insert(id.clone());
            }
            self.imports
                .lock()
                .unwrap()
                .push((chunk.project_id, id));
            Ok(())
        }
    }

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl EmbeddingClient for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    #[tokio::test]
    async fn test_new_chunks_are_embedded_and_imported() {
        let store = MemoryStore::default();
        let embedder = CountingEmbedder::new();

        let stats = sync_project_chunks(
            &store,
            &embedder,
            1,
            "Removing plastic from the ocean.",
            &TextSplitterConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(stats.chunks, 1);
        assert_eq!(stats.embedded, 1);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.imports.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_shared_description_links_every_project() {
        let store = MemoryStore::default();
        let embedder = CountingEmbedder::new();
        let description = "Removing plastic from the ocean.";
        let splitter = TextSplitterConfig::default();

        sync_project_chunks(&store, &embedder, 1, description, &splitter)
            .await
            .unwrap();
        let stats = sync_project_chunks(&store, &embedder, 2, description, &splitter)
            .await
            .unwrap();

        // The second project re-uses the stored vector but still gets its
        // own upsert, which carries the project-to-chunk relationship.
        assert_eq!(stats.embedded, 0);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);

        let imports = store.imports.lock().unwrap();
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].1, imports[1].1);
        let project_ids: Vec<i64> = imports.iter().map(|(pid, _)| *pid).collect();
        assert_eq!(project_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unchanged_rerun_imports_without_embedding() {
        let store = MemoryStore::default();
        let embedder = CountingEmbedder::new();
        let description = "Solar power for rural schools.";
        let splitter = TextSplitterConfig::default();

        sync_project_chunks(&store, &embedder, 7, description, &splitter)
            .await
            .unwrap();
        let stats = sync_project_chunks(&store, &embedder, 7, description, &splitter)
            .await
            .unwrap();

        assert_eq!(stats.chunks, 1);
        assert_eq!(stats.embedded, 0);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }
}
