//! HTTP object-detection adapter.
//!
//! Speaks the hosted-inference object-detection contract: POST the encoded
//! image, receive `[{label, score, box:{xmin,ymin,xmax,ymax}}]`. The same
//! adapter fronts both the table-detection and the structure-recognition
//! model; only the endpoint URL differs.

use std::io::Cursor;

use image::DynamicImage;
use serde::Deserialize;

use super::types::{BBox, DetectedObject, RegionDetector, NO_OBJECT_LABEL};
use super::DetectionError;

/// Detection client for an HTTP inference endpoint.
pub struct RemoteDetector {
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl RemoteDetector {
    pub fn new(
        endpoint: &str,
        api_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, DetectionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DetectionError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token,
            client,
        })
    }
}

/// One prediction in the endpoint's response.
#[derive(Deserialize)]
struct RawPrediction {
    label: String,
    score: f32,
    #[serde(rename = "box")]
    bbox: RawBox,
}

#[derive(Deserialize)]
struct RawBox {
    xmin: f32,
    ymin: f32,
    xmax: f32,
    ymax: f32,
}

impl RegionDetector for RemoteDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectedObject>, DetectionError> {
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| DetectionError::ImageEncoding(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "image/png")
            .body(png.into_inner());
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                DetectionError::Connection(self.endpoint.clone())
            } else {
                DetectionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DetectionError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let predictions: Vec<RawPrediction> = response
            .json()
            .map_err(|e| DetectionError::ResponseParsing(e.to_string()))?;

        Ok(predictions
            .into_iter()
            .filter(|p| p.label != NO_OBJECT_LABEL)
            .map(|p| DetectedObject {
                label: p.label,
                score: p.score,
                bbox: BBox::new(p.bbox.xmin, p.bbox.ymin, p.bbox.xmax, p.bbox.ymax),
            })
            .collect())
    }
}

/// Mock detector for tests — returns a configured list of objects.
pub struct MockDetector {
    objects: Vec<DetectedObject>,
}

impl MockDetector {
    pub fn new(objects: Vec<DetectedObject>) -> Self {
        Self { objects }
    }

    /// A detector that finds nothing.
    pub fn empty() -> Self {
        Self { objects: vec![] }
    }
}

impl RegionDetector for MockDetector {
    fn detect(&self, _image: &DynamicImage) -> Result<Vec<DetectedObject>, DetectionError> {
        Ok(self
            .objects
            .iter()
            .filter(|o| o.label != NO_OBJECT_LABEL)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(label: &str, score: f32) -> DetectedObject {
        DetectedObject {
            label: label.to_string(),
            score,
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
        }
    }

    #[test]
    fn remote_detector_trims_trailing_slash() {
        let detector = RemoteDetector::new("http://localhost:9000/detect/", None, 30).unwrap();
        assert_eq!(detector.endpoint, "http://localhost:9000/detect");
    }

    #[test]
    fn prediction_deserializes_inference_shape() {
        let json = r#"{"score":0.998,"label":"table","box":{"xmin":12.0,"ymin":30.5,"xmax":400.0,"ymax":250.0}}"#;
        let p: RawPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.label, "table");
        assert!((p.bbox.ymin - 30.5).abs() < f32::EPSILON);
    }

    #[test]
    fn mock_filters_no_object_sentinel() {
        let mock = MockDetector::new(vec![
            object("table", 0.99),
            object(NO_OBJECT_LABEL, 0.42),
        ]);
        let image = DynamicImage::new_rgb8(4, 4);
        let objects = mock.detect(&image).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].label, "table");
    }
}
