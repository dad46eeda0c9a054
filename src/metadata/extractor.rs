use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::external::LLMEngine;
use crate::metadata::cleaner::clean_response;
use crate::metadata::parser::parse_extracted;
use crate::metadata::prompt::extraction_prompt;
use crate::metadata::schema::ExtractedMetadata;

/// Narrow seam over the LLM collaborator so extraction can be driven by a
/// mock in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl CompletionClient for LLMEngine {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}

/// Drives prompt -> completion -> clean -> parse for one chunk of text.
pub struct MetadataExtractor {
    client: Box<dyn CompletionClient>,
}

impl MetadataExtractor {
    pub fn new(client: Box<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Extract metadata from text, degrading to an empty result on any
    /// failure. Extraction is best-effort and must never abort ingestion:
    /// a chunk with no metadata is still worth storing.
    pub async fn extract(&self, text: &str) -> ExtractedMetadata {
        let raw = match self.client.complete(&extraction_prompt(text)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "metadata extraction request failed, continuing without metadata");
                return ExtractedMetadata::default();
            }
        };

        let cleaned = clean_response(&raw);
        match parse_extracted(&cleaned) {
            Ok(metadata) => {
                debug!(
                    service_type = ?metadata.service_type,
                    city = ?metadata.city,
                    "extracted metadata"
                );
                metadata
            }
            Err(e) => {
                warn!(
                    error = %e,
                    raw = %raw,
                    cleaned = %cleaned,
                    "malformed extraction response, continuing without metadata"
                );
                ExtractedMetadata::default()
            }
        }
    }
}
