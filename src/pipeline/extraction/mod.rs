pub mod confidence;
pub mod grid_ocr;
pub mod ocr;
pub mod orchestrator;
pub mod types;

pub use confidence::*;
pub use grid_ocr::*;
pub use ocr::*;
pub use orchestrator::*;
pub use types::*;

use thiserror::Error;

use crate::pipeline::detection::DetectionError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Image decoding failed: {0}")]
    ImageDecode(String),

    #[error("Image encoding error: {0}")]
    ImageEncoding(String),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error("OCR endpoint unreachable at {0}")]
    OcrConnection(String),

    #[error("OCR endpoint returned error (status {status}): {body}")]
    OcrEndpoint { status: u16, body: String },

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),
}
