use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// The model response failed to decode as JSON even after cleaning.
    /// Carries the cleaned text so the caller can log it for diagnostics.
    #[error("malformed extraction response: {source}")]
    MalformedResponse {
        cleaned: String,
        source: serde_json::Error,
    },

    #[error("metadata serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
