use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pipeline::normalize::NormalizedRecord;

/// Raw text grid extracted from a detected table, before normalization.
/// Keys are zero-based row indices; serde writes them as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub data: BTreeMap<usize, Vec<String>>,
    pub confidence: f32,
}

/// Outcome of raw table extraction.
#[derive(Debug, Clone)]
pub enum TableOutcome {
    Extracted(RawTable),
    /// The detector found no table region at all.
    NoTable,
}

/// Normalized per-request report. Created once, never mutated, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub data: BTreeMap<usize, NormalizedRecord>,
    pub confidence: f32,
}

/// Outcome of the full image pipeline through the confidence gate.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Normalized(Report),
    /// Aggregate confidence fell below the caller's threshold. An expected
    /// business outcome, not an error.
    Rejected { confidence: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_table_serializes_with_string_row_keys() {
        let mut data = BTreeMap::new();
        data.insert(0usize, vec!["Hemoglobin".to_string(), "13.5".to_string()]);
        data.insert(10usize, vec!["WBC".to_string(), "6.1".to_string()]);
        let table = RawTable {
            data,
            confidence: 0.91,
        };

        let json = serde_json::to_value(&table).unwrap();
        assert!(json["data"]["0"].is_array());
        assert!(json["data"]["10"].is_array());
    }

    #[test]
    fn report_roundtrips_numeric_keys() {
        let json = r#"{"data":{"0":{"parameter":"pH","results":"7.38","range":"7.350 - 7.450","status":"Normal"}},"confidence":0.88}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.data.len(), 1);
        assert_eq!(report.data[&0].parameter, "pH");
    }
}
