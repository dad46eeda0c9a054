use serde_json::json;
use service_indexer::metadata::{
    prepare_chunk_metadata, ChunkMetadata, ContactInfo, ExtractedMetadata, Location,
    MetadataValue, ServiceDetails,
};

fn full_chunk_metadata() -> ChunkMetadata {
    let hours = json!({"monday": "9am-5pm", "tuesday": "9am-5pm"});
    ChunkMetadata {
        source_filename: "test.pdf".to_string(),
        source_url: Some("https://example.com/test.pdf".to_string()),
        page_number: Some(1),
        chunk_index: 0,
        token_count: 450,
        document_type: "brochure".to_string(),
        source_type: "service_info".to_string(),
        extracted: ExtractedMetadata {
            service_type: Some("food".to_string()),
            city: Some("San Francisco".to_string()),
            neighborhood: Some("Mission District".to_string()),
            mentioned_services: Some(vec![
                "Food Bank".to_string(),
                "Soup Kitchen".to_string(),
            ]),
            mentioned_organizations: Some(vec!["SF Food Bank".to_string()]),
            contact: Some(ContactInfo {
                phone: Some("415-555-1234".to_string()),
                email: Some("info@example.com".to_string()),
                website: Some("https://example.com".to_string()),
            }),
            location: Some(Location {
                address: Some("123 Main St".to_string()),
                city: Some("San Francisco".to_string()),
                state: Some("CA".to_string()),
                zip: Some("94102".to_string()),
                neighborhood: Some("Mission District".to_string()),
                ..Default::default()
            }),
            service_details: Some(ServiceDetails {
                hours: hours.as_object().cloned(),
                eligibility: Some("All welcome".to_string()),
                cost: Some("Free".to_string()),
                languages: Some(vec!["English".to_string(), "Spanish".to_string()]),
                accessibility: Some("Wheelchair accessible".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn minimal_chunk_metadata() -> ChunkMetadata {
    ChunkMetadata {
        source_filename: "test2.pdf".to_string(),
        page_number: Some(2),
        chunk_index: 1,
        token_count: 350,
        document_type: "brochure".to_string(),
        extracted: ExtractedMetadata {
            // Service is linked in the catalog; detail records stay empty.
            related_service_id: Some(123),
            service_type: Some("housing".to_string()),
            city: Some("Oakland".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_full_metadata_serialization() {
    let flat = prepare_chunk_metadata(&full_chunk_metadata()).unwrap();

    // Key fields exist and nested records flattened with _-joined keys.
    assert_eq!(
        flat["source_filename"],
        MetadataValue::Text("test.pdf".to_string())
    );
    assert_eq!(
        flat["extracted_service_type"],
        MetadataValue::Text("food".to_string())
    );
    assert_eq!(
        flat["extracted_city"],
        MetadataValue::Text("San Francisco".to_string())
    );
    assert_eq!(
        flat["extracted_contact_phone"],
        MetadataValue::Text("415-555-1234".to_string())
    );
    assert_eq!(
        flat["extracted_location_address"],
        MetadataValue::Text("123 Main St".to_string())
    );

    // Non-empty lists become JSON-array strings.
    let MetadataValue::Text(languages) = &flat["extracted_service_details_languages"] else {
        panic!("languages should be text");
    };
    let parsed: Vec<String> = serde_json::from_str(languages).unwrap();
    assert_eq!(parsed, vec!["English", "Spanish"]);

    // Arbitrary nested hours mapping flattens like any other record.
    assert_eq!(
        flat["extracted_service_details_hours_monday"],
        MetadataValue::Text("9am-5pm".to_string())
    );
}

#[test]
fn test_minimal_metadata_serialization() {
    let flat = prepare_chunk_metadata(&minimal_chunk_metadata()).unwrap();

    assert_eq!(
        flat["source_filename"],
        MetadataValue::Text("test2.pdf".to_string())
    );
    assert_eq!(
        flat["extracted_service_type"],
        MetadataValue::Text("housing".to_string())
    );
    assert_eq!(
        flat["extracted_city"],
        MetadataValue::Text("Oakland".to_string())
    );
    assert_eq!(
        flat["extracted_related_service_id"],
        MetadataValue::Integer(123)
    );

    // Absent detail records leave no keys behind.
    assert!(!flat.keys().any(|k| k.starts_with("extracted_contact")));
    assert!(!flat.keys().any(|k| k.starts_with("extracted_location")));
}

#[test]
fn test_empty_collections_removed() {
    let chunk = ChunkMetadata {
        source_filename: "test3.pdf".to_string(),
        page_number: Some(1),
        chunk_index: 0,
        token_count: 100,
        extracted: ExtractedMetadata {
            service_type: Some("general".to_string()),
            city: Some("Berkeley".to_string()),
            mentioned_services: Some(vec![]),
            mentioned_organizations: Some(vec![]),
            ..Default::default()
        },
        ..Default::default()
    };

    let flat = prepare_chunk_metadata(&chunk).unwrap();

    assert!(!flat.contains_key("extracted_mentioned_services"));
    assert!(!flat.contains_key("extracted_mentioned_organizations"));
    assert!(flat.contains_key("extracted_service_type"));
}

#[test]
fn test_datetime_serialized_as_iso_string() {
    let chunk = ChunkMetadata {
        source_filename: "test4.pdf".to_string(),
        chunk_index: 0,
        token_count: 100,
        ..Default::default()
    };

    let flat = prepare_chunk_metadata(&chunk).unwrap();

    let MetadataValue::Text(date) = &flat["extracted_date"] else {
        panic!("extracted_date should be a string");
    };
    assert!(date.contains('T'), "not ISO-8601: {date}");
}

#[test]
fn test_all_values_are_scalars() {
    let flat = prepare_chunk_metadata(&full_chunk_metadata()).unwrap();

    for (key, value) in &flat {
        // Exhaustive by construction; keeps the invariant visible if a
        // variant is ever added.
        match value {
            MetadataValue::Text(_)
            | MetadataValue::Integer(_)
            | MetadataValue::Float(_)
            | MetadataValue::Bool(_) => {}
        }
        assert!(!key.is_empty());
    }

    // needs_review must survive as a boolean, not an integer.
    assert_eq!(flat["needs_review"], MetadataValue::Bool(false));
}

#[test]
fn test_all_null_extraction_leaves_only_chunk_fields() {
    let chunk = ChunkMetadata {
        source_filename: "empty.pdf".to_string(),
        chunk_index: 0,
        token_count: 12,
        ..Default::default()
    };

    let flat = prepare_chunk_metadata(&chunk).unwrap();

    assert!(!flat.keys().any(|k| k.starts_with("extracted_") && k != "extracted_date"));
    assert!(flat.contains_key("source_filename"));
    assert!(flat.contains_key("chunk_index"));
    assert!(flat.contains_key("token_count"));
    assert!(flat.contains_key("pipeline_version"));
}
