//! Row normalization: raw OCR text rows → typed, validated records.
//!
//! A row survives only when it carries all three components — a non-empty
//! parameter in the first cell, a numeric result somewhere, and a numeric
//! reference range somewhere. Everything else is dropped whole; a partial
//! record is never emitted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Entire trimmed cell is a leading numeric token, optionally followed by
/// trailing text such as units.
static RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\d*\s*.*$").unwrap());

/// Cell contains, anywhere, two numeric tokens separated by a hyphen or
/// whitespace.
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*(\s*-\s*|\s+)\d+\.?\d*").unwrap());

/// A single numeric token.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").unwrap());

/// Clinical status of one result relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Normal,
    High,
    Low,
    Undetermined,
}

/// One normalized lab-report row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub parameter: String,
    pub results: String,
    pub range: String,
    pub status: Status,
}

/// Does the trimmed cell look like a result value?
pub fn is_result_cell(cell: &str) -> bool {
    RESULT_RE.is_match(cell.trim())
}

/// Does the cell contain a reference range?
pub fn contains_range(cell: &str) -> bool {
    RANGE_RE.is_match(cell.trim())
}

/// Derive status as a pure function of (results, range).
///
/// The first numeric token of `results` is the value; `range` must yield
/// exactly two numeric tokens (lower, upper). Any parse failure — or a range
/// with three or more numbers — is Undetermined.
pub fn status_for(results: &str, range: &str) -> Status {
    let value = match NUMBER_RE
        .find(results)
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        Some(v) => v,
        None => return Status::Undetermined,
    };

    let bounds: Vec<f64> = NUMBER_RE
        .find_iter(range)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    if bounds.len() != 2 {
        return Status::Undetermined;
    }
    let (lower, upper) = (bounds[0], bounds[1]);

    if lower <= value && value <= upper {
        Status::Normal
    } else if value > upper {
        Status::High
    } else {
        Status::Low
    }
}

/// Filter and normalize raw rows into the final record map.
///
/// Output keys are a dense zero-based sequence in source row order; dropped
/// rows leave no gaps. Within a retained row, the range cell is the first
/// match scanning cells 1.. left to right, and the result cell is the first
/// remaining match of the result predicate.
pub fn normalize_rows(rows: &BTreeMap<usize, Vec<String>>) -> BTreeMap<usize, NormalizedRecord> {
    let mut report = BTreeMap::new();
    let mut next_index = 0usize;

    for row in rows.values() {
        let parameter = match row.first() {
            Some(cell) if !cell.trim().is_empty() => cell.trim().to_string(),
            _ => continue,
        };
        let has_result = row.iter().any(|cell| is_result_cell(cell));
        let has_range = row.iter().any(|cell| contains_range(cell));
        if !has_result || !has_range {
            continue;
        }

        let range_pos = row
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, cell)| contains_range(cell))
            .map(|(i, _)| i);
        let result_pos = row
            .iter()
            .enumerate()
            .skip(1)
            .find(|(i, cell)| Some(*i) != range_pos && is_result_cell(cell))
            .map(|(i, _)| i);

        let range = range_pos.map(|i| row[i].trim().to_string()).unwrap_or_default();
        let results = result_pos.map(|i| row[i].trim().to_string()).unwrap_or_default();
        let status = status_for(&results, &range);

        report.insert(
            next_index,
            NormalizedRecord {
                parameter,
                results,
                range,
                status,
            },
        );
        next_index += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> BTreeMap<usize, Vec<String>> {
        raw.iter()
            .enumerate()
            .map(|(i, row)| (i, row.iter().map(|c| c.to_string()).collect()))
            .collect()
    }

    // --- predicate tests ---

    #[test]
    fn result_cell_accepts_value_with_units() {
        assert!(is_result_cell("6.0"));
        assert!(is_result_cell("6.0 mmol/L"));
        assert!(is_result_cell("140 "));
        assert!(is_result_cell(" 7.38"));
    }

    #[test]
    fn result_cell_rejects_leading_text() {
        assert!(!is_result_cell("pH 7.38"));
        assert!(!is_result_cell("Hemoglobin"));
        assert!(!is_result_cell(""));
    }

    #[test]
    fn range_detected_with_hyphen_or_whitespace() {
        assert!(contains_range("3.5 - 5.5"));
        assert!(contains_range("3.5-5.5"));
        assert!(contains_range("3.5 5.5"));
        assert!(contains_range("(7.350 - 7.450) mmol/L"));
    }

    #[test]
    fn range_not_detected_in_single_number() {
        assert!(!contains_range("5.5"));
        assert!(!contains_range("mmol/L"));
        assert!(!contains_range(""));
    }

    // --- status derivation (fixed vectors from the clinical contract) ---

    #[test]
    fn status_high_above_upper_bound() {
        assert_eq!(status_for("6.0", "3.5 - 5.5"), Status::High);
        assert_eq!(status_for("1.8", "0.5 - 1.6"), Status::High);
    }

    #[test]
    fn status_normal_within_bounds() {
        assert_eq!(status_for("7.38", "7.350 - 7.450"), Status::Normal);
    }

    #[test]
    fn status_normal_on_exact_bounds() {
        assert_eq!(status_for("3.5", "3.5 - 5.5"), Status::Normal);
        assert_eq!(status_for("5.5", "3.5 - 5.5"), Status::Normal);
    }

    #[test]
    fn status_low_below_lower_bound() {
        assert_eq!(status_for("2.1", "3.5 - 5.5"), Status::Low);
    }

    #[test]
    fn three_range_numbers_force_undetermined() {
        assert_eq!(status_for("2.0", "1 - 2 - 3"), Status::Undetermined);
    }

    #[test]
    fn unparseable_inputs_are_undetermined() {
        assert_eq!(status_for("", "3.5 - 5.5"), Status::Undetermined);
        assert_eq!(status_for("n/a", "3.5 - 5.5"), Status::Undetermined);
        assert_eq!(status_for("6.0", ""), Status::Undetermined);
        assert_eq!(status_for("6.0", "5.5"), Status::Undetermined);
    }

    #[test]
    fn status_uses_first_numeric_token_of_results() {
        // "6.0 mmol/L" → value 6.0, not 0
        assert_eq!(status_for("6.0 mmol/L", "3.5 - 5.5"), Status::High);
    }

    #[test]
    fn status_serializes_as_plain_word() {
        assert_eq!(serde_json::to_string(&Status::High).unwrap(), "\"High\"");
        assert_eq!(
            serde_json::from_str::<Status>("\"Undetermined\"").unwrap(),
            Status::Undetermined
        );
    }

    // --- row filtering ---

    #[test]
    fn row_without_parameter_dropped() {
        let report = normalize_rows(&rows(&[&["", "6.0", "3.5 - 5.5"]]));
        assert!(report.is_empty());
    }

    #[test]
    fn row_without_result_dropped() {
        let report = normalize_rows(&rows(&[&["Notes", "see below", "ask lab"]]));
        assert!(report.is_empty());
    }

    #[test]
    fn row_without_range_dropped() {
        let report = normalize_rows(&rows(&[&["Hemoglobin", "13.5", "g/dL"]]));
        assert!(report.is_empty());
    }

    #[test]
    fn empty_row_dropped() {
        let report = normalize_rows(&rows(&[&[]]));
        assert!(report.is_empty());
    }

    #[test]
    fn retained_row_fully_populated() {
        let report = normalize_rows(&rows(&[&["Potassium", "6.0 mmol/L", "3.5 - 5.5"]]));
        assert_eq!(report.len(), 1);
        let record = &report[&0];
        assert_eq!(record.parameter, "Potassium");
        assert_eq!(record.results, "6.0 mmol/L");
        assert_eq!(record.range, "3.5 - 5.5");
        assert_eq!(record.status, Status::High);
    }

    #[test]
    fn dropped_rows_leave_no_index_gaps() {
        let report = normalize_rows(&rows(&[
            &["Parameter", "Result", "Range"], // header, no numbers
            &["pH", "7.38", "7.350 - 7.450"],
            &["", "6.0", "3.5 - 5.5"], // no parameter
            &["cLac", "1.8 mmol/L", "0.5 - 1.6"],
        ]));
        assert_eq!(report.len(), 2);
        assert_eq!(report[&0].parameter, "pH");
        assert_eq!(report[&1].parameter, "cLac");
    }

    #[test]
    fn output_count_never_exceeds_input() {
        let input = rows(&[
            &["pH", "7.38", "7.350 - 7.450"],
            &["junk"],
            &["Na", "140", "136 - 145"],
        ]);
        let report = normalize_rows(&input);
        assert!(report.len() <= input.len());
    }

    #[test]
    fn first_range_cell_wins_left_to_right() {
        // Two range-like cells: the leftmost is claimed as the range.
        let report = normalize_rows(&rows(&[&[
            "Potassium",
            "3.5 - 5.5",
            "6.0",
            "1.0 - 2.0",
        ]]));
        let record = &report[&0];
        assert_eq!(record.range, "3.5 - 5.5");
        assert_eq!(record.results, "6.0");
        assert_eq!(record.status, Status::High);
    }

    #[test]
    fn result_skips_the_claimed_range_cell() {
        // The range cell also full-matches the result predicate; the result
        // must come from a different cell.
        let report = normalize_rows(&rows(&[&["Potassium", "3.5 - 5.5", "4.0"]]));
        let record = &report[&0];
        assert_eq!(record.range, "3.5 - 5.5");
        assert_eq!(record.results, "4.0");
        assert_eq!(record.status, Status::Normal);
    }

    #[test]
    fn padded_empty_cells_do_not_confuse_assignment() {
        let report = normalize_rows(&rows(&[&["Glucose", "", "5.4", "3.9 - 5.6", ""]]));
        let record = &report[&0];
        assert_eq!(record.results, "5.4");
        assert_eq!(record.range, "3.9 - 5.6");
        assert_eq!(record.status, Status::Normal);
    }
}
