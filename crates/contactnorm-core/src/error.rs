use thiserror::Error;

/// Failure to normalize a single field. The display text is used verbatim as
/// the skip reason for the row that produced it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Missing phone value")]
    MissingPhone,
    #[error("Input phone value must contain digits")]
    PhoneWithoutDigits,
    #[error("Phone value is too short for E.164 format")]
    PhoneTooShort,
    #[error("Missing date of birth value")]
    MissingDob,
    #[error("Unrecognized date of birth format: {0}")]
    UnrecognizedDob(String),
    #[error("Unrecognized token in date of birth value: {0}")]
    UnrecognizedDobToken(String),
    #[error("Ambiguous month tokens in date of birth value")]
    AmbiguousMonth,
    #[error("Date of birth value needs a month name and at least two numbers")]
    IncompleteDob,
    #[error("Ambiguous day position in date of birth value")]
    AmbiguousDay,
    #[error("Invalid calendar date in date of birth value: {0}")]
    InvalidDob(String),
}

/// Reason a single input row was left out of the output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("ID value is missing")]
    MissingId,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Fatal failure that aborts a whole normalization run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read uploaded file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Uploaded file is empty")]
    EmptyPayload,
    #[error("CSV must be encoded as UTF-8")]
    InvalidEncoding(#[source] std::str::Utf8Error),
    #[error("CSV header is missing")]
    MissingHeader,
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("malformed CSV record: {0}")]
    Malformed(#[source] csv::Error),
    #[error("failed to write normalized CSV: {0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    Input,
    Schema,
    Malformed,
    Output,
}

impl PipelineError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Read(_)
            | PipelineError::EmptyPayload
            | PipelineError::InvalidEncoding(_) => PipelineErrorKind::Input,
            PipelineError::MissingHeader | PipelineError::MissingColumns(_) => {
                PipelineErrorKind::Schema
            }
            PipelineError::Malformed(_) => PipelineErrorKind::Malformed,
            PipelineError::Write(_) => PipelineErrorKind::Output,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid default country code: {0:?}")]
    InvalidCountryCode(String),
    #[error("invalid pivot year: {0}")]
    InvalidPivotYear(u32),
    #[error("invalid base year: {0}")]
    InvalidBaseYear(i32),
    #[error("invalid month alias: {0:?}")]
    InvalidMonthAlias(String),
    #[error("invalid month number for {name:?}: {month}")]
    InvalidMonthNumber { name: String, month: u32 },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
