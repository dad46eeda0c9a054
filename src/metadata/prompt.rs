/// Build the extraction prompt for one chunk of document text.
///
/// The schema section mirrors `ExtractedMetadata`; the output requirements
/// exist because models routinely wrap JSON in fences or quote null, which
/// the cleaner then has to undo.
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "You are a metadata extraction system. You MUST respond with ONLY valid JSON.\n\
         \n\
         Document text:\n\
         {text}\n\
         \n\
         SCHEMA (every field is optional; use null when information is absent):\n\
         {{\n\
           \"related_service_id\": <integer id of a known service, or null>,\n\
           \"related_resource_id\": <integer id of a known organization, or null>,\n\
           \"mentioned_services\": [<service names found in the text>],\n\
           \"mentioned_organizations\": [<organization names found in the text>],\n\
           \"mentioned_locations\": [<locations found in the text>],\n\
           \"service_type\": <one of: food, housing, healthcare, legal, education, employment, general, other>,\n\
           \"city\": <primary city mentioned>,\n\
           \"neighborhood\": <neighborhood if mentioned>,\n\
           \"contact\": {{\"phone\": ..., \"email\": ..., \"website\": ...}},\n\
           \"location\": {{\"address\": ..., \"city\": ..., \"state\": ..., \"zip\": ..., \"neighborhood\": ...}},\n\
           \"service_details\": {{\"hours\": ..., \"capacity\": ..., \"eligibility\": ..., \"cost\": ..., \"languages\": [...], \"accessibility\": ...}},\n\
           \"topic\": <main topic for general documents, e.g. food_stamps, tenant_rights>,\n\
           \"content_category\": <one of: how_to, guide, policy, educational, announcement>,\n\
           \"publication_date\": <publication date if mentioned>,\n\
           \"publisher\": <publishing organization for general documents>\n\
         }}\n\
         \n\
         EXTRACTION RULES:\n\
         1. Extract ALL information present in the text\n\
         2. Phone numbers go to contact.phone, emails to contact.email, websites to contact.website\n\
         3. Street address, city, state, zip and neighborhood go under location\n\
         4. service_type must be one of: food, housing, healthcare, legal, education, employment, general, other\n\
         5. Service names go to mentioned_services, organization names to mentioned_organizations\n\
         6. Fill contact, location and service_details only when no service id was matched\n\
         \n\
         CRITICAL OUTPUT REQUIREMENTS:\n\
         - Return ONLY the JSON object\n\
         - NO explanations, NO markdown, NO ```json``` code blocks\n\
         - Start with {{ and end with }}\n\
         - Use null (not \"null\") for missing values\n\
         - All strings must be properly quoted"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_document_text() {
        let prompt = extraction_prompt("Soup Kitchen A at 123 Main St");
        assert!(prompt.contains("Soup Kitchen A at 123 Main St"));
    }

    #[test]
    fn test_prompt_names_schema_fields() {
        let prompt = extraction_prompt("text");
        for field in [
            "related_service_id",
            "mentioned_services",
            "service_type",
            "contact",
            "location",
            "service_details",
            "content_category",
        ] {
            assert!(prompt.contains(field), "prompt missing field {field}");
        }
    }
}
