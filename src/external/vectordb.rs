use anyhow::Result;
use async_trait::async_trait;
use qdrant_client::{
    config::QdrantConfig,
    qdrant::{
        point_id::PointIdOptions, value::Kind, vectors_config::Config, CreateCollection, Distance,
        PointId, PointStruct, SearchPoints, UpsertPoints, Value, VectorParams, VectorsConfig,
        WithPayloadSelector, WriteOrdering,
    },
    Qdrant,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;
use uuid::Uuid;

use crate::external::error::ExternalError;
use crate::metadata::MetadataValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDBConfig {
    pub collection_name: String,
    pub host: String,
    pub port: u16,
    pub vector_size: usize,
}

impl VectorDBConfig {
    /// Get the full URL for the Qdrant service
    pub fn get_url(&self) -> Result<String> {
        let url = if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        };

        // Validate the URL
        Url::parse(&url).map_err(|e| ExternalError::ConfigError(format!("Invalid URL: {}", e)))?;

        Ok(url)
    }
}

impl Default for VectorDBConfig {
    fn default() -> Self {
        Self {
            collection_name: "service_documents".to_string(),
            host: "localhost".to_string(),
            port: 6334,
            vector_size: 768,
        }
    }
}

/// The flat payload is converted to the store's value type only at this
/// boundary; everything upstream works with `MetadataValue`.
impl From<MetadataValue> for Value {
    fn from(value: MetadataValue) -> Self {
        match value {
            MetadataValue::Text(s) => Value::from(s),
            MetadataValue::Integer(i) => Value::from(i),
            MetadataValue::Float(f) => Value::from(f),
            MetadataValue::Bool(b) => Value::from(b),
        }
    }
}

/// One chunk ready for storage: raw text, flattened metadata, and its
/// embedding vector.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub text: String,
    pub metadata: HashMap<String, MetadataValue>,
    pub vector: Vec<f32>,
}

/// Seam over the storage collaborator so the pipeline can be driven by a
/// mock in tests.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn add_chunks(&self, chunks: Vec<StoredChunk>) -> Result<Vec<String>>;
}

/// A single similarity-search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub text: Option<String>,
}

/// Wrapper for the Qdrant vector database
pub struct VectorDB {
    client: Qdrant,
    config: VectorDBConfig,
}

impl VectorDB {
    /// Create a new vector database client with the given configuration
    pub async fn new(config: VectorDBConfig) -> Result<Self> {
        let url = config.get_url()?;
        let qdrant_config = QdrantConfig::from_url(&url);
        let client = Qdrant::new(qdrant_config)
            .map_err(|e| ExternalError::ConnectionError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create the collection if it does not exist yet
    pub async fn ensure_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| ExternalError::VectorDBError(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.config.collection_name);
        if exists {
            return Ok(());
        }

        let vectors_config = VectorsConfig {
            config: Some(Config::Params(VectorParams {
                size: self.config.vector_size as u64,
                distance: Distance::Cosine.into(),
                ..Default::default()
            })),
        };

        let create_collection = CreateCollection {
            collection_name: self.config.collection_name.clone(),
            vectors_config: Some(vectors_config),
            ..Default::default()
        };

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| ExternalError::VectorDBError(e.to_string()))?;

        Ok(())
    }

    /// Search for similar chunks by embedding vector
    pub async fn similarity_search(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<SearchHit>> {
        let search_request = SearchPoints {
            collection_name: self.config.collection_name.clone(),
            vector,
            limit,
            with_payload: Some(WithPayloadSelector::from(true)),
            ..Default::default()
        };

        let results = self
            .client
            .search_points(search_request)
            .await
            .map_err(|e| ExternalError::VectorDBError(e.to_string()))?;

        Ok(results
            .result
            .into_iter()
            .map(|point| {
                let id = point
                    .id
                    .and_then(|id| match id.point_id_options {
                        Some(PointIdOptions::Uuid(uuid)) => Some(uuid),
                        Some(PointIdOptions::Num(num)) => Some(num.to_string()),
                        None => None,
                    })
                    .unwrap_or_default();
                let text = point.payload.get("text").and_then(|v| match &v.kind {
                    Some(Kind::StringValue(s)) => Some(s.clone()),
                    _ => None,
                });
                SearchHit {
                    id,
                    score: point.score,
                    text,
                }
            })
            .collect())
    }

    /// Delete the entire collection
    pub async fn delete_collection(&self) -> Result<()> {
        self.client
            .delete_collection(self.config.collection_name.clone())
            .await
            .map_err(|e| ExternalError::VectorDBError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for VectorDB {
    /// Upsert chunks as points with generated UUID string ids; the chunk
    /// text rides along in the payload under "text".
    async fn add_chunks(&self, chunks: Vec<StoredChunk>) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(chunks.len());
        let mut points = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let id = Uuid::new_v4().to_string();

            let mut payload: HashMap<String, Value> = chunk
                .metadata
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect();
            payload.insert("text".to_string(), Value::from(chunk.text));

            points.push(PointStruct {
                id: Some(PointId {
                    point_id_options: Some(PointIdOptions::Uuid(id.clone())),
                }),
                payload,
                vectors: Some(chunk.vector.into()),
            });
            ids.push(id);
        }

        let upsert_points = UpsertPoints {
            collection_name: self.config.collection_name.clone(),
            points,
            ordering: Some(WriteOrdering::default()),
            ..Default::default()
        };

        self.client
            .upsert_points(upsert_points)
            .await
            .map_err(|e| ExternalError::VectorDBError(e.to_string()))?;

        Ok(ids)
    }
}
