//! POST /get-normalized-report — image → normalized records through the
//! confidence gate. `confidence_threshold` is an optional form field.

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;

use super::read_upload;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::ReportOutcome;

/// Business-outcome message for a document below the gate threshold.
pub const LOW_CONFIDENCE_MESSAGE: &str = "Picture not clear enough to extract details.";

pub async fn normalized_report(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let bytes = upload
        .file
        .ok_or_else(|| ApiError::BadRequest("missing multipart field: file".into()))?;
    let threshold = upload
        .confidence_threshold
        .unwrap_or(ctx.service.confidence_threshold);

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, threshold, "normalized-report request");

    let service = ctx.service.clone();
    let outcome =
        tokio::task::spawn_blocking(move || service.normalized_report(&bytes, threshold))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    let payload = match outcome {
        ReportOutcome::Normalized(report) => json!({
            "data": report.data,
            "normalization confidence": report.confidence,
        }),
        ReportOutcome::Rejected { confidence } => json!({
            "error": LOW_CONFIDENCE_MESSAGE,
            "confidence": confidence,
        }),
    };
    Ok(Json(payload))
}
