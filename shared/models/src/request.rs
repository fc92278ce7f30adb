use serde::{Deserialize, Serialize};

/// An analytic request as received from the caller.
///
/// `query` is free natural-language text; `output_format` is a free-text
/// description of the desired result shape (e.g. `"{id, title}"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    pub query: String,
    pub output_format: String,
}

/// The intent classifier's verdict on whether a request needs semantic search.
///
/// Parsed from the model's JSON response. Missing or malformed fields fall
/// back to the default (no embedding needed).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingDecision {
    #[serde(default)]
    pub embedding_needed: bool,
    #[serde(default)]
    pub embedding_message: Option<String>,
}
