//! Text-recognition abstraction and clients.
//!
//! The recognizer receives one cell crop at a time and returns zero or more
//! text fragments with per-fragment confidence, in the engine's own reading
//! order. The production client ships the crop as base64 PNG to an HTTP
//! recognition service.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use base64::Engine as _;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// One recognized text fragment within a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    /// Recognition confidence in [0, 1].
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests).
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in a single cell crop. An empty list means the cell
    /// is blank — that is an expected outcome, not an error.
    fn read_text(&self, cell: &DynamicImage) -> Result<Vec<TextFragment>, ExtractionError>;
}

/// Request body for the recognition service.
#[derive(Serialize)]
struct OcrRequest<'a> {
    image: &'a str,
}

/// Response body from the recognition service.
#[derive(Deserialize)]
struct OcrResponse {
    fragments: Vec<TextFragment>,
}

/// HTTP client for a text-recognition service.
pub struct RemoteOcrClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl RemoteOcrClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::OcrProcessing(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl TextRecognizer for RemoteOcrClient {
    fn read_text(&self, cell: &DynamicImage) -> Result<Vec<TextFragment>, ExtractionError> {
        let mut png = Cursor::new(Vec::new());
        cell.write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| ExtractionError::ImageEncoding(e.to_string()))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&OcrRequest { image: &encoded })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ExtractionError::OcrConnection(self.endpoint.clone())
                } else {
                    ExtractionError::OcrProcessing(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::OcrEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OcrResponse = response
            .json()
            .map_err(|e| ExtractionError::OcrProcessing(e.to_string()))?;

        Ok(parsed.fragments)
    }
}

/// Mock recognizer for tests — pops one scripted cell result per call,
/// in row-major call order. Runs dry to blank cells.
pub struct MockRecognizer {
    script: Mutex<VecDeque<Vec<TextFragment>>>,
}

impl MockRecognizer {
    pub fn new(script: Vec<Vec<TextFragment>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// Script a cell from `(text, confidence)` pairs.
    pub fn cell(fragments: &[(&str, f32)]) -> Vec<TextFragment> {
        fragments
            .iter()
            .map(|(text, confidence)| TextFragment {
                text: text.to_string(),
                confidence: *confidence,
            })
            .collect()
    }
}

impl TextRecognizer for MockRecognizer {
    fn read_text(&self, _cell: &DynamicImage) -> Result<Vec<TextFragment>, ExtractionError> {
        let mut script = self.script.lock().unwrap();
        Ok(script.pop_front().unwrap_or_default())
    }
}
