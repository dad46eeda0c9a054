use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::chunker::TextChunker;
use crate::config::Config;
use crate::datasource::is_supported_file;
use crate::external::{ChunkStore, Embedder, EmbeddingEngine, LLMEngine, StoredChunk, VectorDB};
use crate::metadata::{
    prepare_chunk_metadata, ChunkMetadata, ExtractedMetadata, MetadataError, MetadataExtractor,
    MetadataValue,
};

/// Outcome of running one document through the pipeline.
#[derive(Debug)]
pub struct DocumentSummary {
    pub file: PathBuf,
    pub pages: usize,
    pub chunks: usize,
    pub chunk_ids: Vec<String>,
    pub service_type: Option<String>,
    pub city: Option<String>,
    pub error: Option<String>,
}

impl DocumentSummary {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn failed(file: &Path, error: String) -> Self {
        Self {
            file: file.to_path_buf(),
            pages: 0,
            chunks: 0,
            chunk_ids: Vec::new(),
            service_type: None,
            city: None,
            error: Some(error),
        }
    }
}

/// Ingests text documents: chunk, extract metadata, embed, store.
pub struct IngestionPipeline {
    chunker: TextChunker,
    extractor: MetadataExtractor,
    embedder: Box<dyn Embedder>,
    store: Box<dyn ChunkStore>,
    source_type: String,
    embed_concurrency: usize,
}

impl IngestionPipeline {
    /// Build the pipeline against live Ollama and Qdrant collaborators.
    pub async fn new(config: &Config) -> Result<Self> {
        let llm = LLMEngine::new(config.llm.clone()).await?;
        let embedder = EmbeddingEngine::new(config.embedding.clone()).await?;
        let store = VectorDB::new(config.vector_db.clone()).await?;
        store.ensure_collection().await?;

        Ok(Self::with_components(
            config,
            MetadataExtractor::new(Box::new(llm)),
            Box::new(embedder),
            Box::new(store),
        ))
    }

    /// Build the pipeline from pre-constructed collaborators.
    pub fn with_components(
        config: &Config,
        extractor: MetadataExtractor,
        embedder: Box<dyn Embedder>,
        store: Box<dyn ChunkStore>,
    ) -> Self {
        Self {
            chunker: TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
            extractor,
            embedder,
            store,
            source_type: config.processing.source_type.clone(),
            embed_concurrency: config.processing.embed_concurrency.max(1),
        }
    }

    /// Process one document. Failures are reported in the summary, never
    /// propagated, so one bad document cannot abort a batch.
    pub async fn process_file(&self, path: &Path) -> DocumentSummary {
        info!(file = %path.display(), "processing document");
        match self.try_process_file(path).await {
            Ok(summary) => {
                info!(
                    file = %path.display(),
                    pages = summary.pages,
                    chunks = summary.chunks,
                    "document stored"
                );
                summary
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "document failed");
                DocumentSummary::failed(path, format!("{e:#}"))
            }
        }
    }

    async fn try_process_file(&self, path: &Path) -> Result<DocumentSummary> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        let pages = split_pages(&text);
        if pages.is_empty() {
            bail!("no content extracted from {}", path.display());
        }

        // (chunk text, page number), chunk_index implied by position.
        let mut chunks: Vec<(String, u32)> = Vec::new();
        for (page_idx, page) in pages.iter().enumerate() {
            for piece in self.chunker.split(page) {
                chunks.push((piece, page_idx as u32 + 1));
            }
        }
        if chunks.is_empty() {
            bail!("no chunks created from {}", path.display());
        }

        // Metadata is extracted once per document, from the first chunk,
        // and shared by every chunk of that document.
        let extracted = self.extractor.extract(&chunks[0].0).await;

        let source_filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();

        // Embeddings run with bounded concurrency; buffering keeps results
        // in chunk order.
        let embedder = self.embedder.as_ref();
        let vectors: Vec<Vec<f32>> = stream::iter(chunks.iter())
            .map(|(text, _)| embedder.embed(text))
            .buffered(self.embed_concurrency)
            .try_collect()
            .await?;

        let mut stored = Vec::with_capacity(chunks.len());
        for (index, ((chunk_text, page), vector)) in chunks.iter().zip(vectors).enumerate() {
            let metadata = assemble_chunk_metadata(
                chunk_text,
                index,
                &extracted,
                &source_filename,
                Some(*page),
                &self.source_type,
            )?;
            stored.push(StoredChunk {
                text: chunk_text.clone(),
                metadata,
                vector,
            });
        }

        let chunk_ids = self.store.add_chunks(stored).await?;

        Ok(DocumentSummary {
            file: path.to_path_buf(),
            pages: pages.len(),
            chunks: chunks.len(),
            chunk_ids,
            service_type: extracted.service_type.clone(),
            city: extracted.city.clone(),
            error: None,
        })
    }

    /// Process every supported document under a directory.
    pub async fn process_directory(&self, directory: &Path) -> Result<Vec<DocumentSummary>> {
        let mut files: Vec<PathBuf> = WalkDir::new(directory)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && is_supported_file(entry.path()))
            .map(|entry| entry.path().to_path_buf())
            .collect();
        files.sort();

        info!(
            directory = %directory.display(),
            count = files.len(),
            "processing directory"
        );

        let mut results = Vec::with_capacity(files.len());
        for file in &files {
            results.push(self.process_file(file).await);
        }

        let successful = results.iter().filter(|r| r.is_success()).count();
        info!(
            total = results.len(),
            successful,
            failed = results.len() - successful,
            "batch complete"
        );

        Ok(results)
    }
}

/// Build the flattened storage record for one chunk.
///
/// `token_count` is the whitespace-delimited word count of the chunk text,
/// and `needs_review` is set when the extraction carries mentions without
/// an identity link.
pub fn assemble_chunk_metadata(
    chunk_text: &str,
    chunk_index: usize,
    extracted: &ExtractedMetadata,
    source_filename: &str,
    page_number: Option<u32>,
    source_type: &str,
) -> Result<HashMap<String, MetadataValue>, MetadataError> {
    let chunk = ChunkMetadata {
        source_filename: source_filename.to_string(),
        page_number,
        document_type: infer_document_type(chunk_text).to_string(),
        source_type: source_type.to_string(),
        needs_review: extracted.has_mentions() && !extracted.has_identity_link(),
        extracted: extracted.clone(),
        chunk_index,
        token_count: chunk_text.split_whitespace().count(),
        ..ChunkMetadata::default()
    };

    prepare_chunk_metadata(&chunk)
}

/// Classify a chunk by keyword buckets, checked in priority order; the
/// first matching bucket wins.
pub fn infer_document_type(text: &str) -> &'static str {
    let text = text.to_lowercase();

    if ["brochure", "services offered"].iter().any(|w| text.contains(w)) {
        "brochure"
    } else if ["guide", "how to", "step by step"].iter().any(|w| text.contains(w)) {
        "guide"
    } else if ["policy", "regulation", "law"].iter().any(|w| text.contains(w)) {
        "policy"
    } else if ["flyer", "announcement"].iter().any(|w| text.contains(w)) {
        "flyer"
    } else {
        "unknown"
    }
}

/// Split pre-extracted document text into pages on form feeds, the page
/// separator pdftotext emits. Text without form feeds is a single page.
pub fn split_pages(text: &str) -> Vec<String> {
    text.split('\u{c}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(str::to_string)
        .collect()
}
