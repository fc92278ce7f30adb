use crate::{CompletionClient, EmbeddingClient};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use donorgraph_config::OpenAiSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the OpenAI chat-completion and embedding endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
    completion_model: String,
    embedding_model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

impl OpenAiClient {
    pub fn new(settings: &OpenAiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.clone(),
            completion_model: settings.completion_model.clone(),
            embedding_model: settings.embedding_model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.completion_model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: Some(600),
            temperature: Some(0.3),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI completion failed ({}): {}", status, body));
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No completion returned from OpenAI"))?;

        Ok(choice.message.content.trim().to_string())
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI embedding failed ({}): {}", status, body));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let data = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No embedding returned from OpenAI"))?;

        Ok(data.embedding)
    }
}
