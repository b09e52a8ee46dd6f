//! The image pipeline: detect → crop → structure → grid → OCR → gate →
//! normalize. Strictly left to right; a failed gate terminates the request
//! with a typed outcome, never an exception crossing stage boundaries.

use std::sync::Arc;

use image::DynamicImage;

use super::confidence::{overall_confidence, passes_gate, round4};
use super::grid_ocr::ocr_grid;
use super::ocr::TextRecognizer;
use super::types::{RawTable, Report, ReportOutcome, TableOutcome};
use super::ExtractionError;
use crate::pipeline::detection::{build_cell_grid, RegionDetector};
use crate::pipeline::normalize::normalize_rows;

/// Holds the injected model adapters for the process lifetime. One instance
/// is constructed at startup and shared by reference across requests; per
/// request, everything it produces is single-owner.
pub struct TableExtractor {
    table_detector: Arc<dyn RegionDetector>,
    structure_recognizer: Arc<dyn RegionDetector>,
    text_recognizer: Arc<dyn TextRecognizer>,
}

impl TableExtractor {
    pub fn new(
        table_detector: Arc<dyn RegionDetector>,
        structure_recognizer: Arc<dyn RegionDetector>,
        text_recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            table_detector,
            structure_recognizer,
            text_recognizer,
        }
    }

    /// Extract the raw text grid and aggregate confidence from an image.
    ///
    /// Confidence pools every detection score, every structure score, and
    /// every OCR fragment score with equal weight.
    pub fn extract_table(&self, image: &DynamicImage) -> Result<TableOutcome, ExtractionError> {
        let _span = tracing::info_span!(
            "extract_table",
            width = image.width(),
            height = image.height(),
        )
        .entered();

        let mut all_scores: Vec<f32> = Vec::new();

        // 1. Detect table regions
        let tables = self.table_detector.detect(image)?;
        if tables.is_empty() {
            tracing::info!("no table region detected");
            return Ok(TableOutcome::NoTable);
        }
        all_scores.extend(tables.iter().map(|t| t.score));

        // 2. Crop the top-ranked table and recognize its structure
        let cropped = match tables[0].bbox.crop_rect(image.width(), image.height()) {
            Some((x, y, w, h)) => image.crop_imm(x, y, w, h),
            None => return Ok(TableOutcome::NoTable),
        };
        let structure = self.structure_recognizer.detect(&cropped)?;
        all_scores.extend(structure.iter().map(|s| s.score));

        // 3. Build the cell grid and OCR it cell by cell
        let grid = build_cell_grid(&structure);
        let (data, ocr_scores) = ocr_grid(self.text_recognizer.as_ref(), &grid, &cropped)?;
        all_scores.extend(ocr_scores);

        let confidence = round4(overall_confidence(&all_scores));
        tracing::info!(
            rows = data.len(),
            scores = all_scores.len(),
            confidence,
            "table extracted"
        );

        Ok(TableOutcome::Extracted(RawTable { data, confidence }))
    }

    /// Full image pipeline through the confidence gate to normalized records.
    pub fn process_image(
        &self,
        image: &DynamicImage,
        threshold: f32,
    ) -> Result<ReportOutcome, ExtractionError> {
        let raw = match self.extract_table(image)? {
            TableOutcome::Extracted(raw) => raw,
            // Nothing scored; confidence is 0.0 by construction.
            TableOutcome::NoTable => return Ok(ReportOutcome::Rejected { confidence: 0.0 }),
        };

        if !passes_gate(raw.confidence, threshold) {
            tracing::info!(
                confidence = raw.confidence,
                threshold,
                "document below confidence threshold"
            );
            return Ok(ReportOutcome::Rejected {
                confidence: raw.confidence,
            });
        }

        let data = normalize_rows(&raw.data);
        tracing::info!(records = data.len(), "report normalized");
        Ok(ReportOutcome::Normalized(Report {
            data,
            confidence: raw.confidence,
        }))
    }
}
