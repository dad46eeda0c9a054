mod embedding;
pub mod error;
mod llm;
pub mod vectordb;

pub use embedding::{Embedder, EmbeddingConfig, EmbeddingEngine};
pub use error::ExternalError;
pub use llm::{LLMConfig, LLMEngine};
pub use vectordb::{ChunkStore, SearchHit, StoredChunk, VectorDB, VectorDBConfig};
