pub mod chunking;
pub mod request;

pub use chunking::Chunk;
pub use request::{EmbeddingDecision, UserRequest};
