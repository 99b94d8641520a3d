use crate::dto::{NormalizedRow, ProcessingSummary, SkippedRow};
use crate::error::{PipelineError, Result, RowError};
use crate::normalize::ContactNormalizer;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::collections::HashMap;
use tracing::debug;

pub const DELIMITER: u8 = b';';
pub const REQUIRED_COLUMNS: [&str; 3] = ["id", "phone", "dob"];

/// Line number of the first data row; the header is line 1.
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub rows: Vec<NormalizedRow>,
    pub summary: ProcessingSummary,
}

impl NormalizedTable {
    /// Serializes the normalized rows as `id;phone;dob` with `\n` line endings.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .write_record(REQUIRED_COLUMNS)
            .map_err(|err| PipelineError::Write(err.to_string()))?;
        for row in &self.rows {
            writer
                .write_record([&row.id, &row.phone, &row.dob])
                .map_err(|err| PipelineError::Write(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| PipelineError::Write(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    id: usize,
    phone: usize,
    dob: usize,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        if headers.is_empty() {
            return Err(PipelineError::MissingHeader);
        }

        let mut lookup: HashMap<String, usize> = HashMap::new();
        for (index, name) in headers.iter().enumerate() {
            let key = name.trim_matches('\u{feff}').trim().to_lowercase();
            if !key.is_empty() {
                lookup.insert(key, index);
            }
        }

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !lookup.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(PipelineError::MissingColumns(missing));
        }

        Ok(Self {
            id: lookup["id"],
            phone: lookup["phone"],
            dob: lookup["dob"],
        })
    }
}

#[derive(Debug)]
struct RawRow<'a> {
    row_number: usize,
    id: Option<&'a str>,
    phone: Option<&'a str>,
    dob: Option<&'a str>,
}

impl<'a> RawRow<'a> {
    fn read(row_number: usize, record: &'a StringRecord, layout: ColumnLayout) -> Self {
        Self {
            row_number,
            id: record.get(layout.id),
            phone: record.get(layout.phone),
            dob: record.get(layout.dob),
        }
    }

    fn normalize<N>(&self, normalizer: &N) -> std::result::Result<NormalizedRow, RowError>
    where
        N: ContactNormalizer + ?Sized,
    {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RowError::MissingId),
        };
        let phone = normalizer.normalize_phone(self.phone)?;
        let dob = normalizer.normalize_date(self.dob)?;
        Ok(NormalizedRow {
            id: id.to_string(),
            phone,
            dob,
        })
    }
}

/// Normalizes every data row of a `;`-delimited table.
///
/// Structural problems (no header, required columns missing, unreadable
/// records) abort the run. Problems with a single row never do: the row is
/// recorded as skipped and processing continues.
pub fn normalize_table<N>(text: &str, normalizer: &N) -> Result<NormalizedTable>
where
    N: ContactNormalizer + ?Sized,
{
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers = reader.headers().map_err(PipelineError::Malformed)?.clone();
    // The reader skips blank lines; a blank first line still means no column names.
    if !headers.is_empty() && starts_with_blank_line(text) {
        headers = StringRecord::from(vec![""]);
    }
    let layout = ColumnLayout::resolve(&headers)?;
    debug!(
        id = layout.id,
        phone = layout.phone,
        dob = layout.dob,
        "resolved column positions"
    );

    let mut rows: Vec<NormalizedRow> = Vec::new();
    let mut skipped: Vec<SkippedRow> = Vec::new();
    let mut processed_rows = 0;

    for (offset, record) in reader.records().enumerate() {
        let record = record.map_err(PipelineError::Malformed)?;
        let raw = RawRow::read(FIRST_DATA_ROW + offset, &record, layout);
        processed_rows += 1;

        match raw.normalize(normalizer) {
            Ok(row) => rows.push(row),
            Err(err) => {
                debug!(row = raw.row_number, reason = %err, "row skipped");
                skipped.push(SkippedRow {
                    row_number: raw.row_number,
                    reason: err.to_string(),
                });
            }
        }
    }

    let summary = ProcessingSummary {
        processed_rows,
        normalized_rows: rows.len(),
        skipped_rows: skipped.len(),
        skipped,
    };
    Ok(NormalizedTable { rows, summary })
}

fn starts_with_blank_line(text: &str) -> bool {
    text.trim_start_matches('\u{feff}')
        .lines()
        .next()
        .is_some_and(|line| line.is_empty())
}
