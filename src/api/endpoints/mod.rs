pub mod analyze;
pub mod extract;
pub mod report;

use axum::extract::Multipart;

use super::error::ApiError;

/// Collected multipart fields shared by all report endpoints.
#[derive(Default)]
pub struct ReportUpload {
    pub file: Option<Vec<u8>>,
    pub text_input: Option<String>,
    pub confidence_threshold: Option<f32>,
}

/// Drain the multipart stream into the fields the endpoints understand.
/// Unknown fields are ignored.
pub async fn read_upload(mut multipart: Multipart) -> Result<ReportUpload, ApiError> {
    let mut upload = ReportUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read file: {e}")))?;
                upload.file = Some(bytes.to_vec());
            }
            "text_input" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read text_input: {e}")))?;
                upload.text_input = Some(text);
            }
            "confidence_threshold" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read confidence_threshold: {e}"))
                })?;
                let value: f32 = text.parse().map_err(|_| {
                    ApiError::BadRequest(format!(
                        "confidence_threshold must be a number, got {text:?}"
                    ))
                })?;
                upload.confidence_threshold = Some(value);
            }
            _ => {}
        }
    }

    Ok(upload)
}
