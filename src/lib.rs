pub mod chunker;
pub mod config;
pub mod datasource;
pub mod external;
pub mod metadata;
pub mod pipeline;

pub use chunker::TextChunker;
pub use config::Config;
pub use datasource::DataSource;
pub use external::{EmbeddingEngine, ExternalError, LLMEngine, VectorDB};
pub use metadata::{ChunkMetadata, ExtractedMetadata, MetadataError, MetadataExtractor};
pub use pipeline::IngestionPipeline;
