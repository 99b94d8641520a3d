use serde::{Deserialize, Serialize};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub id: String,
    pub phone: String,
    pub dob: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub processed_rows: usize,
    pub normalized_rows: usize,
    pub skipped_rows: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Everything a transport layer needs to hand the normalized file back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationResult {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub content_type: &'static str,
    pub processed_rows: usize,
    pub normalized_rows: usize,
    pub skipped_rows: usize,
    pub skipped: Vec<SkippedRow>,
}

impl NormalizationResult {
    pub fn new(filename: String, content: Vec<u8>, summary: ProcessingSummary) -> Self {
        Self {
            filename,
            content,
            content_type: CSV_CONTENT_TYPE,
            processed_rows: summary.processed_rows,
            normalized_rows: summary.normalized_rows,
            skipped_rows: summary.skipped_rows,
            skipped: summary.skipped,
        }
    }
}
