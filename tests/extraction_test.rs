use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mockall::mock;
use service_indexer::metadata::{
    clean_response, parse_extracted, CompletionClient, ExtractedMetadata, MetadataExtractor,
    MetadataValue,
};
use service_indexer::pipeline::{assemble_chunk_metadata, infer_document_type};

mock! {
    pub Completion {}

    #[async_trait]
    impl CompletionClient for Completion {
        async fn complete(&self, prompt: &str) -> Result<String>;
    }
}

#[tokio::test]
async fn test_messy_fenced_response_extracts() {
    let mut client = MockCompletion::new();
    client.expect_complete().times(1).returning(|_| {
        Ok("Sure, here's the metadata you asked for:\n\
            ```json\n\
            {\"service_type\": \"food\", \"city\": \"San Francisco\",\n\
             \"mentioned_organizations\": [\"SF Food Bank\"], \"neighborhood\": \"null\"}\n\
            ```\n\
            Hope that helps!"
            .to_string())
    });

    let extractor = MetadataExtractor::new(Box::new(client));
    let metadata = extractor.extract("Free groceries at the SF Food Bank").await;

    assert_eq!(metadata.service_type.as_deref(), Some("food"));
    assert_eq!(metadata.city.as_deref(), Some("San Francisco"));
    // The quoted "null" became a real null and then an absent field.
    assert!(metadata.neighborhood.is_none());
    assert_eq!(
        metadata.mentioned_organizations,
        Some(vec!["SF Food Bank".to_string()])
    );
}

#[tokio::test]
async fn test_prose_wrapped_response_extracts() {
    let mut client = MockCompletion::new();
    client.expect_complete().times(1).returning(|_| {
        Ok(r#"Of course! {"city": "Oakland", "service_type": "housing"} Let me know if you need anything else."#.to_string())
    });

    let extractor = MetadataExtractor::new(Box::new(client));
    let metadata = extractor.extract("Transitional housing in Oakland").await;

    assert_eq!(metadata.city.as_deref(), Some("Oakland"));
    assert_eq!(metadata.service_type.as_deref(), Some("housing"));
}

#[tokio::test]
async fn test_garbage_response_yields_empty_metadata() {
    let mut client = MockCompletion::new();
    client
        .expect_complete()
        .times(1)
        .returning(|_| Ok("I cannot produce JSON for this document.".to_string()));

    let extractor = MetadataExtractor::new(Box::new(client));
    let metadata = extractor.extract("some text").await;

    assert_eq!(metadata, ExtractedMetadata::default());
}

#[tokio::test]
async fn test_client_failure_yields_empty_metadata() {
    let mut client = MockCompletion::new();
    client
        .expect_complete()
        .times(1)
        .returning(|_| Err(anyhow!("connection reset by peer")));

    let extractor = MetadataExtractor::new(Box::new(client));
    let metadata = extractor.extract("some text").await;

    assert_eq!(metadata, ExtractedMetadata::default());
}

#[test]
fn test_graceful_degradation_end_to_end() {
    // Garbage model output cleans to something unparseable...
    let cleaned = clean_response("total nonsense, no braces anywhere");
    assert!(parse_extracted(&cleaned).is_err());

    // ...the caller falls back to an empty result, and assembly still
    // produces a valid flat record with only the chunk-level fields.
    let flat = assemble_chunk_metadata(
        "some chunk text here",
        0,
        &ExtractedMetadata::default(),
        "doc.txt",
        Some(1),
        "service_info",
    )
    .unwrap();

    assert_eq!(
        flat["source_filename"],
        MetadataValue::Text("doc.txt".to_string())
    );
    assert_eq!(flat["chunk_index"], MetadataValue::Integer(0));
    assert_eq!(flat["token_count"], MetadataValue::Integer(4));
    assert!(flat.contains_key("extracted_date"));
    assert!(!flat
        .keys()
        .any(|k| k.starts_with("extracted_") && k != "extracted_date"));
}

#[tokio::test]
async fn test_extraction_feeds_assembly() {
    let mut client = MockCompletion::new();
    client.expect_complete().times(1).returning(|_| {
        Ok(r#"{"service_type": "food", "city": "Oakland",
               "mentioned_services": ["Hot Meals Program"],
               "contact": {"phone": "510-555-9876"}}"#
            .to_string())
    });

    let extractor = MetadataExtractor::new(Box::new(client));
    let text = "Brochure: services offered include hot meals daily.";
    let metadata = extractor.extract(text).await;

    let flat = assemble_chunk_metadata(text, 2, &metadata, "meals.txt", Some(1), "service_info")
        .unwrap();

    assert_eq!(
        flat["extracted_service_type"],
        MetadataValue::Text("food".to_string())
    );
    assert_eq!(
        flat["extracted_contact_phone"],
        MetadataValue::Text("510-555-9876".to_string())
    );
    assert_eq!(
        flat["document_type"],
        MetadataValue::Text("brochure".to_string())
    );
    // Mentions with no identity link flag the chunk for review.
    assert_eq!(flat["needs_review"], MetadataValue::Bool(true));
}

#[test]
fn test_document_type_priority() {
    // "guide" and "policy" triggers both present; guide is checked first.
    let text = "This guide explains the shelter policy";
    assert_eq!(infer_document_type(text), "guide");
}
