//! Text-input path: one LLM call turns free-form lab-report text into the
//! same normalized-record map the image pipeline produces.

use std::collections::BTreeMap;

use super::client::{ChatMessage, LlmClient};
use super::json_extract::extract_json_object;
use super::prompt::{text_parse_user_prompt, TEXT_PARSE_SYSTEM_PROMPT};
use super::SummarizeError;
use crate::pipeline::normalize::NormalizedRecord;

/// Parse unstructured report text into normalized records.
///
/// The response goes through the same brace-delimited extraction as the
/// guardrail passes. Entries that are not a numeric index or fail to
/// deserialize as a record are skipped rather than failing the request.
pub fn parse_text_report(
    client: &dyn LlmClient,
    plain_text: &str,
) -> Result<BTreeMap<usize, NormalizedRecord>, SummarizeError> {
    let _span = tracing::info_span!("parse_text_report", chars = plain_text.len()).entered();

    let response = client.chat(&[
        ChatMessage::system(TEXT_PARSE_SYSTEM_PROMPT),
        ChatMessage::user(text_parse_user_prompt(plain_text)),
    ])?;

    let value = extract_json_object(&response)?;
    let object = value
        .as_object()
        .ok_or_else(|| SummarizeError::MalformedJson("top-level value is not an object".into()))?;

    let mut records = BTreeMap::new();
    for (key, entry) in object {
        let Ok(index) = key.parse::<usize>() else {
            continue;
        };
        match serde_json::from_value::<NormalizedRecord>(entry.clone()) {
            Ok(record) => {
                records.insert(index, record);
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "skipping malformed record");
            }
        }
    }

    tracing::info!(records = records.len(), "text report parsed");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::Status;
    use crate::pipeline::summarize::client::MockLlmClient;

    const BLOOD_GAS_TEXT: &str = "pH: 7.38 (7.350 - 7.450)\nck + : 6.0 mrol/l (3.5 - 5.5)";

    #[test]
    fn parses_indexed_records() {
        let mock = MockLlmClient::new(vec![
            r#"Here you go:
{
  "0": {"parameter": "pH", "results": "7.38", "range": "7.350 - 7.450", "status": "Normal"},
  "1": {"parameter": "ck +", "results": "6.0", "range": "3.5 - 5.5", "status": "High"}
}"#,
        ]);
        let records = parse_text_report(&mock, BLOOD_GAS_TEXT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[&0].parameter, "pH");
        assert_eq!(records[&1].status, Status::High);
    }

    #[test]
    fn skips_malformed_entries() {
        let mock = MockLlmClient::new(vec![
            r#"{
  "0": {"parameter": "pH", "results": "7.38", "range": "7.350 - 7.450", "status": "Normal"},
  "1": {"parameter": "broken"},
  "note": "not a record"
}"#,
        ]);
        let records = parse_text_report(&mock, BLOOD_GAS_TEXT).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.contains_key(&0));
    }

    #[test]
    fn no_json_in_response_is_an_error() {
        let mock = MockLlmClient::new(vec!["I could not find any lab values."]);
        assert!(matches!(
            parse_text_report(&mock, BLOOD_GAS_TEXT),
            Err(SummarizeError::NoJsonObject)
        ));
    }

    #[test]
    fn non_object_top_level_is_an_error() {
        // First `{` .. last `}` lands on the inner object of an array wrapper;
        // a bare array without braces has no object at all.
        let mock = MockLlmClient::new(vec!["[1, 2, 3]"]);
        assert!(parse_text_report(&mock, BLOOD_GAS_TEXT).is_err());
    }

    #[test]
    fn empty_object_yields_empty_map() {
        let mock = MockLlmClient::new(vec!["{}"]);
        let records = parse_text_report(&mock, BLOOD_GAS_TEXT).unwrap();
        assert!(records.is_empty());
    }
}
