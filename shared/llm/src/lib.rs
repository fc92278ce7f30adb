pub mod openai;

pub use openai::OpenAiClient;

use anyhow::Result;
use async_trait::async_trait;

/// Text-completion capability: one prompt in, the model's text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Text-embedding capability: one string in, a fixed-length vector out.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}
