use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version tag stamped on every stored chunk, so records written by an
/// older schema can be told apart later.
pub const PIPELINE_VERSION: &str = "1.0.0";

/// Contact information, extracted only when the service is not already in
/// the catalog database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Location details, extracted only when the service is not already in the
/// catalog database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub coordinates: Option<HashMap<String, f64>>,
    pub neighborhood: Option<String>,
}

/// Operational details, extracted only when the service is not already in
/// the catalog database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetails {
    /// Opening hours as the model reported them; shape is not enforced.
    pub hours: Option<serde_json::Map<String, serde_json::Value>>,
    pub capacity: Option<String>,
    pub eligibility: Option<String>,
    pub cost: Option<String>,
    pub languages: Option<Vec<String>>,
    pub accessibility: Option<String>,
}

/// Metadata extracted from document text by the LLM.
///
/// Every field is independently optional: a fully empty value is a valid
/// result and means extraction found nothing (or failed), never an error.
///
/// The fields are tiered. Identity links (`related_service_id`,
/// `related_resource_id`) are the primary strategy; the `mentioned_*` lists
/// are the fallback when no link was found; `service_type`, `city` and
/// `neighborhood` are always extracted for filtering; `contact`, `location`
/// and `service_details` are populated only when there is no identity link
/// (a linked service's details live in the catalog, not here).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub related_service_id: Option<i64>,
    pub related_resource_id: Option<i64>,

    pub mentioned_services: Option<Vec<String>>,
    pub mentioned_organizations: Option<Vec<String>>,
    pub mentioned_locations: Option<Vec<String>>,

    /// One of: food, housing, healthcare, legal, education, employment,
    /// general, other. Enforced by the extraction prompt, not the type.
    pub service_type: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,

    pub contact: Option<ContactInfo>,
    pub location: Option<Location>,
    pub service_details: Option<ServiceDetails>,

    // General-document fields, used when the text is not about one service.
    pub topic: Option<String>,
    pub content_category: Option<String>,
    pub publication_date: Option<String>,
    pub publisher: Option<String>,
}

impl ExtractedMetadata {
    /// True when the extractor matched an external catalog entry.
    pub fn has_identity_link(&self) -> bool {
        self.related_service_id.is_some() || self.related_resource_id.is_some()
    }

    /// True when any fallback mention list is non-empty.
    pub fn has_mentions(&self) -> bool {
        [
            &self.mentioned_services,
            &self.mentioned_organizations,
            &self.mentioned_locations,
        ]
        .iter()
        .any(|list| list.as_ref().is_some_and(|items| !items.is_empty()))
    }
}

/// Complete metadata for one stored chunk. Built once during enrichment,
/// flattened for storage, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source_filename: String,
    pub source_url: Option<String>,
    pub page_number: Option<u32>,

    pub extracted_date: DateTime<Utc>,
    pub pipeline_version: String,

    /// brochure, guide, policy, flyer or unknown.
    pub document_type: String,
    /// brochure, general_guide, policy_document or service_info.
    pub source_type: String,

    pub extracted: ExtractedMetadata,

    pub chunk_index: usize,
    pub token_count: usize,

    pub keywords: Option<Vec<String>>,
    pub language: String,

    /// Set when the chunk mentions services that could not be linked to a
    /// catalog entry, flagging it for human triage.
    pub needs_review: bool,
}

impl Default for ChunkMetadata {
    fn default() -> Self {
        Self {
            source_filename: String::new(),
            source_url: None,
            page_number: None,
            extracted_date: Utc::now(),
            pipeline_version: PIPELINE_VERSION.to_string(),
            document_type: "unknown".to_string(),
            source_type: "brochure".to_string(),
            extracted: ExtractedMetadata::default(),
            chunk_index: 0,
            token_count: 0,
            keywords: None,
            language: "en".to_string(),
            needs_review: false,
        }
    }
}
