use crate::dto::NormalizationResult;
use crate::error::{PipelineError, Result};
use crate::normalize::{ContactNormalizer, DataNormalizer};
use crate::pipeline::normalize_table;
use std::io::Read;
use tracing::info;

pub const DEFAULT_INPUT_FILENAME: &str = "contacts.csv";
pub const OUTPUT_PREFIX: &str = "normalized-";
pub const OUTPUT_EXTENSION: &str = ".csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Turns an uploaded contacts table into its normalized form.
#[derive(Debug, Clone, Default)]
pub struct NormalizationService<N = DataNormalizer> {
    normalizer: N,
}

impl<N: ContactNormalizer> NormalizationService<N> {
    pub fn new(normalizer: N) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    pub fn process_reader<R: Read>(
        &self,
        mut reader: R,
        filename: Option<&str>,
    ) -> Result<NormalizationResult> {
        let mut payload = Vec::new();
        reader
            .read_to_end(&mut payload)
            .map_err(PipelineError::Read)?;
        self.process(&payload, filename)
    }

    pub fn process(&self, payload: &[u8], filename: Option<&str>) -> Result<NormalizationResult> {
        let text = decode_payload(payload)?;
        let output_name = output_filename(filename);

        let table = normalize_table(text, &self.normalizer)?;
        let content = table.to_csv()?;
        let summary = table.summary;

        info!(
            input = filename.unwrap_or(DEFAULT_INPUT_FILENAME),
            output = %output_name,
            processed = summary.processed_rows,
            normalized = summary.normalized_rows,
            skipped = summary.skipped_rows,
            "csv normalization finished"
        );

        Ok(NormalizationResult::new(output_name, content, summary))
    }
}

pub fn decode_payload(payload: &[u8]) -> Result<&str> {
    if payload.is_empty() {
        return Err(PipelineError::EmptyPayload);
    }
    let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
    std::str::from_utf8(payload).map_err(PipelineError::InvalidEncoding)
}

/// `normalized-` prefixed, `.csv` suffixed name for the output file. Both
/// checks ignore case so an already normalized name is left alone.
pub fn output_filename(original: Option<&str>) -> String {
    let trimmed = original.map(str::trim).unwrap_or_default();
    let mut name = if trimmed.is_empty() {
        DEFAULT_INPUT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    };
    let lower = name.to_lowercase();
    if !lower.starts_with(OUTPUT_PREFIX) {
        name.insert_str(0, OUTPUT_PREFIX);
    }
    if !lower.ends_with(OUTPUT_EXTENSION) {
        name.push_str(OUTPUT_EXTENSION);
    }
    name
}
