//! POST /analyze-report and /analyze-report/summary — image-or-text →
//! guardrailed explanation of abnormal findings. Exactly one of `file` or
//! `text_input` must be supplied.

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;

use super::read_upload;
use super::report::LOW_CONFIDENCE_MESSAGE;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::service::{AnalysisOutcome, ALL_NORMAL_MESSAGE};

/// Entry point 3: explanations only.
pub async fn analyze_report(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    run_analysis(ctx, multipart, false).await
}

/// Entry point 4: explanations plus the one-sentence dashboard summary and
/// the full normalized data.
pub async fn analyze_report_with_summary(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    run_analysis(ctx, multipart, true).await
}

async fn run_analysis(
    ctx: ApiContext,
    multipart: Multipart,
    with_summary: bool,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let request_id = uuid::Uuid::new_v4();

    let outcome = match (upload.file, upload.text_input) {
        (None, None) => {
            return Err(ApiError::BadRequest(
                "You must provide either an image file or a text_input.".into(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "Please provide either an image file or a text_input, not both.".into(),
            ))
        }
        (Some(bytes), None) => {
            tracing::info!(%request_id, with_summary, bytes = bytes.len(), "analyze request (image)");
            let service = ctx.service.clone();
            tokio::task::spawn_blocking(move || service.analyze_image(&bytes, with_summary))
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))??
        }
        (None, Some(text)) => {
            tracing::info!(%request_id, with_summary, chars = text.len(), "analyze request (text)");
            let service = ctx.service.clone();
            tokio::task::spawn_blocking(move || service.analyze_text(&text, with_summary))
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))??
        }
    };

    let payload = match outcome {
        AnalysisOutcome::AllNormal => json!({ "summary": ALL_NORMAL_MESSAGE }),
        AnalysisOutcome::LowConfidence { confidence } => json!({
            "error": LOW_CONFIDENCE_MESSAGE,
            "confidence": confidence,
        }),
        AnalysisOutcome::Explained { explanations } => json!({ "explanations": explanations }),
        AnalysisOutcome::GuardrailRejected { reason } => json!({ "error": reason }),
        AnalysisOutcome::Summarized {
            summary,
            normalized_data,
        } => json!({
            "summary": summary,
            "normalized_data": normalized_data,
        }),
        AnalysisOutcome::ReportOnly { normalized_data } => json!({
            "normalized_data": normalized_data,
        }),
    };
    Ok(Json(payload))
}
