use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::DetectionError;

/// Sentinel label emitted by detection models for background predictions.
/// Adapters filter these out before anything downstream sees them.
pub const NO_OBJECT_LABEL: &str = "no object";

/// Structure-recognition labels for the two axes of a table.
pub const TABLE_ROW_LABEL: &str = "table row";
pub const TABLE_COLUMN_LABEL: &str = "table column";

/// Axis-aligned bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Clamp to image bounds and convert to an `(x, y, width, height)` crop
    /// rectangle. Returns None when the clamped box has no area.
    pub fn crop_rect(&self, img_width: u32, img_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x0.max(0.0).floor() as u32;
        let y0 = self.y0.max(0.0).floor() as u32;
        let x1 = (self.x1.ceil() as i64).clamp(0, img_width as i64) as u32;
        let y1 = (self.y1.ceil() as i64).clamp(0, img_height as i64) as u32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0, y0, x1 - x0, y1 - y0))
    }
}

/// One labeled region returned by a detection model, already rescaled to
/// pixel coordinates. Immutable once produced by the adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    /// Model confidence in [0, 1].
    pub score: f32,
    pub bbox: BBox,
}

/// Object-detection abstraction. One implementation serves both table
/// detection (full image) and structure recognition (cropped table) — the
/// two are distinguished only by the model behind the endpoint.
pub trait RegionDetector: Send + Sync {
    /// Detect labeled regions in the image. The "no object" sentinel must
    /// already be filtered out of the returned list. Transport and decode
    /// failures are fatal to the current request.
    fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectedObject>, DetectionError>;
}
