//! Aggregate confidence gate.
//!
//! Detection, structure, and OCR scores are pooled into one flat list and
//! averaged with equal weight. The single scalar is an intentionally coarse
//! proxy for whether the table is trustworthy enough to present as medical
//! information.

/// Mean of all upstream scores, or exactly 0.0 when nothing scored
/// (e.g. no table detected).
pub fn overall_confidence(scores: &[f32]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f32>() / scores.len() as f32
}

/// Round to four decimal places for outward-facing payloads.
pub fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// The gate decision: a document passes when its confidence reaches the
/// threshold. Equality passes.
pub fn passes_gate(confidence: f32, threshold: f32) -> bool {
    confidence >= threshold
}
