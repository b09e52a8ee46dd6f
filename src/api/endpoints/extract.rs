//! POST /extract-table — image → raw cell grid, no normalization.

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;

use super::read_upload;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::TableOutcome;

pub async fn extract_table(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let bytes = upload
        .file
        .ok_or_else(|| ApiError::BadRequest("missing multipart field: file".into()))?;

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, bytes = bytes.len(), "extract-table request");

    let service = ctx.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.extract_table(&bytes))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let payload = match outcome {
        TableOutcome::Extracted(raw) => json!({
            "data": raw.data,
            "confidence": raw.confidence,
        }),
        TableOutcome::NoTable => json!({
            "data": {},
            "confidence": 0.0,
            "error": "No tables detected.",
        }),
    };
    Ok(Json(payload))
}
