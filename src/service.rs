//! Process-lifetime report service.
//!
//! Constructed once at startup with the injected model adapters and shared
//! by `Arc` across request handlers. Each request runs its own synchronous
//! pipeline over single-owner data; no state is shared between requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::pipeline::extraction::{
    ExtractionError, ReportOutcome, TableExtractor, TableOutcome,
};
use crate::pipeline::normalize::{NormalizedRecord, Status};
use crate::pipeline::summarize::{
    dashboard_summary, explain_abnormal, parse_text_report, ExplanationOutcome, LlmClient,
    SummarizeError,
};

/// Literal message for a report with nothing abnormal in it.
pub const ALL_NORMAL_MESSAGE: &str = "All results are within the normal range.";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

/// Terminal outcome of the analyze entry points. Every variant is final;
/// no retries happen inside the service.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Every normalized record came back Normal; no LLM call was made.
    AllNormal,
    /// The image failed the confidence gate before normalization.
    LowConfidence { confidence: f32 },
    /// Guardrail accepted the generated explanations.
    Explained { explanations: Vec<String> },
    /// Guardrail rejected; the reason is all the caller gets.
    GuardrailRejected { reason: String },
    /// Dashboard variant: accepted explanations condensed to one sentence,
    /// combined with the full normalized data.
    Summarized {
        summary: serde_json::Value,
        normalized_data: BTreeMap<usize, NormalizedRecord>,
    },
    /// Dashboard variant degraded: the summary pass failed, so the full
    /// normalized report is returned unchanged.
    ReportOnly {
        normalized_data: BTreeMap<usize, NormalizedRecord>,
    },
}

/// The injected service object holding every shared model adapter.
pub struct ReportService {
    extractor: TableExtractor,
    llm: Arc<dyn LlmClient>,
    /// Default gate threshold; callers may override per request.
    pub confidence_threshold: f32,
}

impl ReportService {
    pub fn new(
        extractor: TableExtractor,
        llm: Arc<dyn LlmClient>,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            extractor,
            llm,
            confidence_threshold,
        }
    }

    fn decode(image_bytes: &[u8]) -> Result<image::DynamicImage, ExtractionError> {
        image::load_from_memory(image_bytes)
            .map_err(|e| ExtractionError::ImageDecode(e.to_string()))
    }

    /// Entry point 1: image → raw cell grid, no normalization.
    pub fn extract_table(&self, image_bytes: &[u8]) -> Result<TableOutcome, ExtractionError> {
        let image = Self::decode(image_bytes)?;
        self.extractor.extract_table(&image)
    }

    /// Entry point 2: image → normalized report through the confidence gate.
    pub fn normalized_report(
        &self,
        image_bytes: &[u8],
        threshold: f32,
    ) -> Result<ReportOutcome, ExtractionError> {
        let image = Self::decode(image_bytes)?;
        self.extractor.process_image(&image, threshold)
    }

    /// Entry point 3, image input.
    pub fn analyze_image(
        &self,
        image_bytes: &[u8],
        with_summary: bool,
    ) -> Result<AnalysisOutcome, ServiceError> {
        let outcome = self.normalized_report(image_bytes, self.confidence_threshold)?;
        match outcome {
            ReportOutcome::Rejected { confidence } => {
                Ok(AnalysisOutcome::LowConfidence { confidence })
            }
            ReportOutcome::Normalized(report) => self.analyze_records(report.data, with_summary),
        }
    }

    /// Entry point 3, text input.
    pub fn analyze_text(
        &self,
        plain_text: &str,
        with_summary: bool,
    ) -> Result<AnalysisOutcome, ServiceError> {
        let records = parse_text_report(self.llm.as_ref(), plain_text)?;
        self.analyze_records(records, with_summary)
    }

    /// Shared tail of both analyze paths: filter to abnormal records, run
    /// the guardrail, optionally add the dashboard summary pass.
    fn analyze_records(
        &self,
        records: BTreeMap<usize, NormalizedRecord>,
        with_summary: bool,
    ) -> Result<AnalysisOutcome, ServiceError> {
        let abnormal: BTreeMap<usize, NormalizedRecord> = records
            .iter()
            .filter(|(_, r)| r.status != Status::Normal)
            .map(|(k, r)| (*k, r.clone()))
            .collect();

        if abnormal.is_empty() {
            tracing::info!(records = records.len(), "all results normal, skipping LLM");
            return Ok(AnalysisOutcome::AllNormal);
        }

        match explain_abnormal(self.llm.as_ref(), &abnormal)? {
            ExplanationOutcome::Rejected { reason } => {
                Ok(AnalysisOutcome::GuardrailRejected { reason })
            }
            ExplanationOutcome::Accepted { explanations } => {
                if !with_summary {
                    return Ok(AnalysisOutcome::Explained { explanations });
                }
                // Dashboard pass failure degrades to the plain report.
                match dashboard_summary(self.llm.as_ref(), &explanations, &records) {
                    Ok(summary) => Ok(AnalysisOutcome::Summarized {
                        summary,
                        normalized_data: records,
                    }),
                    Err(e) => {
                        tracing::warn!(error = %e, "dashboard summary failed, degrading");
                        Ok(AnalysisOutcome::ReportOnly {
                            normalized_data: records,
                        })
                    }
                }
            }
        }
    }
}
