//! Brace-delimited JSON extraction from free-form model text.
//!
//! The contract: locate the first `{` and the last `}` and parse that
//! substring. Nested braces inside string literals can break this; the
//! prompts therefore demand bare JSON output, and the contract is kept
//! as-is for compatibility with the endpoint payloads it feeds.

use super::SummarizeError;

/// Extract and parse the first-`{` .. last-`}` substring of `text`.
pub fn extract_json_object(text: &str) -> Result<serde_json::Value, SummarizeError> {
    let start = text.find('{').ok_or(SummarizeError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(SummarizeError::NoJsonObject)?;
    if end < start {
        return Err(SummarizeError::NoJsonObject);
    }

    serde_json::from_str(&text[start..=end])
        .map_err(|e| SummarizeError::MalformedJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object_parses() {
        let value = extract_json_object(r#"{"explanations":["a","b"]}"#).unwrap();
        assert_eq!(value["explanations"][0], "a");
    }

    #[test]
    fn surrounding_prose_is_stripped() {
        let text = "Sure! Here is the JSON you asked for:\n{\"summary\": \"ok\"}\nHope that helps.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[test]
    fn nested_objects_survive_first_last_bracing() {
        let text = "prefix {\"data\": {\"0\": {\"status\": \"High\"}}} suffix";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["data"]["0"]["status"], "High");
    }

    #[test]
    fn no_braces_is_no_json_object() {
        assert!(matches!(
            extract_json_object("I cannot answer that."),
            Err(SummarizeError::NoJsonObject)
        ));
    }

    #[test]
    fn reversed_braces_is_no_json_object() {
        assert!(matches!(
            extract_json_object("} oops {"),
            Err(SummarizeError::NoJsonObject)
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            extract_json_object("{not valid json}"),
            Err(SummarizeError::MalformedJson(_))
        ));
    }
}
