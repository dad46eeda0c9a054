pub mod cleaner;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod prompt;
pub mod schema;
pub mod serializer;

pub use cleaner::clean_response;
pub use error::MetadataError;
pub use extractor::{CompletionClient, MetadataExtractor};
pub use parser::parse_extracted;
pub use schema::{
    ChunkMetadata, ContactInfo, ExtractedMetadata, Location, ServiceDetails, PIPELINE_VERSION,
};
pub use serializer::{flatten_metadata, prepare_chunk_metadata, MetadataValue};
