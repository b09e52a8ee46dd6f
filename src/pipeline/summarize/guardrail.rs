//! The generate-then-validate guardrail.
//!
//! No LLM-authored explanation reaches a caller without passing the second,
//! independent safety judgment. The gate fails closed: anything other than
//! a literal TRUE verdict — malformed output included — is a rejection.

use std::collections::BTreeMap;

use super::client::{ChatMessage, LlmClient};
use super::json_extract::extract_json_object;
use super::prompt::{
    generation_user_prompt, summary_user_prompt, GENERATION_SYSTEM_PROMPT,
    SUMMARY_SYSTEM_PROMPT, VALIDATION_SYSTEM_PROMPT,
};
use super::SummarizeError;
use crate::pipeline::normalize::NormalizedRecord;

/// Fixed reason reported when the validator declines the explanation.
pub const VALIDATION_FAILED_REASON: &str = "Generated explanation failed validation guardrail.";

/// Terminal decision of the guardrail. There is no third state.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplanationOutcome {
    Accepted { explanations: Vec<String> },
    Rejected { reason: String },
}

/// Run the two-pass protocol over the abnormal subset of a report.
///
/// Generation and validation are strictly sequential; a generation parse
/// failure skips validation entirely and rejects. Transport errors surface
/// as `SummarizeError` — they are upstream faults, not guardrail verdicts.
pub fn explain_abnormal(
    client: &dyn LlmClient,
    abnormal: &BTreeMap<usize, NormalizedRecord>,
) -> Result<ExplanationOutcome, SummarizeError> {
    let _span = tracing::info_span!("guardrail", records = abnormal.len()).entered();

    // Pass 1: generate
    let payload = serde_json::to_string_pretty(abnormal)
        .map_err(|e| SummarizeError::MalformedJson(e.to_string()))?;
    let generated_text = client.chat(&[
        ChatMessage::system(GENERATION_SYSTEM_PROMPT),
        ChatMessage::user(generation_user_prompt(&payload)),
    ])?;

    let generated = match extract_json_object(&generated_text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "generation output unparseable, rejecting");
            return Ok(ExplanationOutcome::Rejected {
                reason: format!("Malformed generation output: {e}"),
            });
        }
    };

    let explanations = match parse_explanations(&generated) {
        Some(list) => list,
        None => {
            tracing::warn!("generation output missing explanations list, rejecting");
            return Ok(ExplanationOutcome::Rejected {
                reason: "Generation output did not contain an explanations list.".to_string(),
            });
        }
    };

    // Pass 2: validate the generated JSON, verbatim
    let generated_pretty = serde_json::to_string_pretty(&generated)
        .map_err(|e| SummarizeError::MalformedJson(e.to_string()))?;
    let verdict = client.chat(&[
        ChatMessage::system(VALIDATION_SYSTEM_PROMPT),
        ChatMessage::user(generated_pretty),
    ])?;

    if verdict.trim().eq_ignore_ascii_case("TRUE") {
        tracing::info!(explanations = explanations.len(), "guardrail accepted");
        Ok(ExplanationOutcome::Accepted { explanations })
    } else {
        tracing::info!(verdict = %verdict.trim(), "guardrail rejected");
        Ok(ExplanationOutcome::Rejected {
            reason: VALIDATION_FAILED_REASON.to_string(),
        })
    }
}

/// Pull the `explanations` list of strings out of the generated object.
fn parse_explanations(generated: &serde_json::Value) -> Option<Vec<String>> {
    let items = generated.get("explanations")?.as_array()?;
    items
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}

/// Dashboard pass: one concise sentence over the accepted explanations and
/// the full normalized report. Callers degrade gracefully on any failure
/// here — an `Err` must never fail the whole request.
pub fn dashboard_summary(
    client: &dyn LlmClient,
    explanations: &[String],
    report: &BTreeMap<usize, NormalizedRecord>,
) -> Result<serde_json::Value, SummarizeError> {
    let explanations_json = serde_json::to_string_pretty(explanations)
        .map_err(|e| SummarizeError::MalformedJson(e.to_string()))?;
    let report_json = serde_json::to_string_pretty(report)
        .map_err(|e| SummarizeError::MalformedJson(e.to_string()))?;

    let response = client.chat(&[
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(summary_user_prompt(&explanations_json, &report_json)),
    ])?;

    let value = extract_json_object(&response)?;
    if value.get("summary").and_then(|v| v.as_str()).is_none() {
        return Err(SummarizeError::MalformedJson(
            "summary key missing or not a string".into(),
        ));
    }
    Ok(value)
}
