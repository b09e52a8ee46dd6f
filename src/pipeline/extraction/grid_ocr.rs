//! Per-cell OCR over the derived grid.
//!
//! Cells are read sequentially in row-major order; every fragment confidence
//! feeds the flat score list used by the confidence gate. Rows are
//! right-padded afterwards so the output grid is always rectangular.

use std::collections::BTreeMap;

use image::DynamicImage;

use super::ocr::TextRecognizer;
use super::ExtractionError;
use crate::pipeline::detection::RowCells;

/// OCR every cell of the grid against the cropped table image.
///
/// Returns the row-indexed text grid plus the flat list of fragment
/// confidence scores. A cell whose crop is degenerate or whose recognizer
/// output is empty becomes the empty string — never omitted, so row width
/// stays uniform.
pub fn ocr_grid(
    recognizer: &dyn TextRecognizer,
    grid: &[RowCells],
    cropped: &DynamicImage,
) -> Result<(BTreeMap<usize, Vec<String>>, Vec<f32>), ExtractionError> {
    let mut data: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let mut scores: Vec<f32> = Vec::new();
    let mut max_columns = 0usize;

    for (idx, row) in grid.iter().enumerate() {
        let mut row_text: Vec<String> = Vec::with_capacity(row.cell_count);
        for cell in &row.cells {
            let rect = cell.cell.crop_rect(cropped.width(), cropped.height());
            let fragments = match rect {
                Some((x, y, w, h)) => recognizer.read_text(&cropped.crop_imm(x, y, w, h))?,
                None => vec![],
            };

            if fragments.is_empty() {
                row_text.push(String::new());
            } else {
                let text: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
                row_text.push(text.join(" "));
                scores.extend(fragments.iter().map(|f| f.confidence));
            }
        }

        max_columns = max_columns.max(row_text.len());
        data.insert(idx, row_text);
    }

    // Pad every row to the widest row observed across the table.
    for row_text in data.values_mut() {
        row_text.resize(max_columns, String::new());
    }

    Ok((data, scores))
}
