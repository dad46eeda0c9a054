use regex::Regex;

/// Clean a raw model response into a best-effort JSON string.
///
/// The model is instructed to emit a single JSON object, but in practice it
/// wraps the object in markdown fences, surrounds it with prose, or quotes
/// null as the string "null". Each pass here targets one of those failure
/// modes. The output is not guaranteed to be valid JSON; the parser handles
/// whatever is left.
pub fn clean_response(response: &str) -> String {
    let mut response = response.trim().to_string();

    // Prefer the first fenced code block if one closes; an unclosed fence
    // leaves the text as-is for the brace pass below.
    if response.contains("```") {
        let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
        if let Some(captures) = fence.captures(&response) {
            response = captures[1].trim().to_string();
        }
    }

    // Slice from the first { to the last }, discarding any commentary the
    // model added around the object.
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            response = response[start..=end].to_string();
        }
    }

    // The model sometimes emits "null" as a quoted string. The closing
    // quote in the pattern keeps values that merely start with "null"
    // untouched.
    let quoted_null = Regex::new(r#":\s*"null""#).unwrap();
    quoted_null.replace_all(&response, ": null").into_owned()
}
