use serde_json::Value;

use crate::metadata::error::MetadataError;
use crate::metadata::schema::{ContactInfo, ExtractedMetadata, Location, ServiceDetails};

/// Parse a cleaned model response into `ExtractedMetadata`.
///
/// Decoding is strict JSON; field mapping is deliberately lenient because
/// the upstream model output is unreliable. Unknown keys are ignored and a
/// type-mismatched field is treated as absent, so a partially wrong
/// response still keeps the fields that did parse.
pub fn parse_extracted(cleaned: &str) -> Result<ExtractedMetadata, MetadataError> {
    let value: Value =
        serde_json::from_str(cleaned).map_err(|source| MetadataError::MalformedResponse {
            cleaned: cleaned.to_string(),
            source,
        })?;
    Ok(metadata_from_value(&value))
}

fn metadata_from_value(value: &Value) -> ExtractedMetadata {
    ExtractedMetadata {
        related_service_id: int_field(value, "related_service_id"),
        related_resource_id: int_field(value, "related_resource_id"),
        mentioned_services: string_list_field(value, "mentioned_services"),
        mentioned_organizations: string_list_field(value, "mentioned_organizations"),
        mentioned_locations: string_list_field(value, "mentioned_locations"),
        service_type: string_field(value, "service_type"),
        city: string_field(value, "city"),
        neighborhood: string_field(value, "neighborhood"),
        contact: value
            .get("contact")
            .filter(|v| v.is_object())
            .map(contact_from_value),
        location: value
            .get("location")
            .filter(|v| v.is_object())
            .map(location_from_value),
        service_details: value
            .get("service_details")
            .filter(|v| v.is_object())
            .map(service_details_from_value),
        topic: string_field(value, "topic"),
        content_category: string_field(value, "content_category"),
        publication_date: string_field(value, "publication_date"),
        publisher: string_field(value, "publisher"),
    }
}

fn contact_from_value(value: &Value) -> ContactInfo {
    ContactInfo {
        phone: string_field(value, "phone"),
        email: string_field(value, "email"),
        website: string_field(value, "website"),
    }
}

fn location_from_value(value: &Value) -> Location {
    Location {
        address: string_field(value, "address"),
        city: string_field(value, "city"),
        state: string_field(value, "state"),
        zip: string_field(value, "zip"),
        coordinates: value.get("coordinates").and_then(Value::as_object).map(|map| {
            map.iter()
                .filter_map(|(axis, v)| v.as_f64().map(|f| (axis.clone(), f)))
                .collect()
        }),
        neighborhood: string_field(value, "neighborhood"),
    }
}

fn service_details_from_value(value: &Value) -> ServiceDetails {
    ServiceDetails {
        hours: value.get("hours").and_then(Value::as_object).cloned(),
        capacity: string_field(value, "capacity"),
        eligibility: string_field(value, "eligibility"),
        cost: string_field(value, "cost"),
        languages: string_list_field(value, "languages"),
        accessibility: string_field(value, "accessibility"),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn int_field(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

fn string_list_field(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}
