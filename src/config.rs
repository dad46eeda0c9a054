use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::external::{EmbeddingConfig, LLMConfig, VectorDBConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub embed_concurrency: usize,
    pub source_type: String,
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub llm: LLMConfig,
    pub vector_db: VectorDBConfig,
    pub chunking: ChunkingConfig,
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load embedding config
        let embedding = EmbeddingConfig {
            model: env::var("OLLAMA_EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .unwrap_or_else(|_| "11434".to_string())
                .parse()
                .unwrap_or(11434),
        };

        // Load LLM config
        let llm = LLMConfig {
            model: env::var("OLLAMA_LLM_MODEL").unwrap_or_else(|_| "mistral".to_string()),
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .unwrap_or_else(|_| "11434".to_string())
                .parse()
                .unwrap_or(11434),
            temperature: env::var("OLLAMA_TEMPERATURE")
                .unwrap_or_else(|_| "0.0".to_string())
                .parse()
                .unwrap_or(0.0),
            top_p: env::var("OLLAMA_TOP_P")
                .unwrap_or_else(|_| "0.9".to_string())
                .parse()
                .unwrap_or(0.9),
        };

        // Load vector DB config
        let vector_db = VectorDBConfig {
            collection_name: env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "service_documents".to_string()),
            host: env::var("QDRANT_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("QDRANT_PORT")
                .unwrap_or_else(|_| "6334".to_string())
                .parse()
                .unwrap_or(6334),
            vector_size: env::var("QDRANT_VECTOR_SIZE")
                .unwrap_or_else(|_| "768".to_string())
                .parse()
                .unwrap_or(768),
        };

        // Load chunking config
        let chunking = ChunkingConfig {
            chunk_size: env::var("CHUNK_SIZE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            chunk_overlap: env::var("CHUNK_OVERLAP")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .unwrap_or(200),
        };

        // Load processing config
        let processing = ProcessingConfig {
            embed_concurrency: env::var("EMBED_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            source_type: env::var("SOURCE_TYPE").unwrap_or_else(|_| "service_info".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        };

        Ok(Self {
            embedding,
            llm,
            vector_db,
            chunking,
            processing,
        })
    }

    /// Validate the configuration once at startup
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            bail!("chunk size must be greater than zero");
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            bail!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunking.chunk_overlap,
                self.chunking.chunk_size
            );
        }
        if self.vector_db.vector_size == 0 {
            bail!("vector size must be greater than zero");
        }
        if self.processing.embed_concurrency == 0 {
            bail!("embed concurrency must be greater than zero");
        }
        Ok(())
    }
}
