pub mod dto;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod service;
pub mod settings;

pub use dto::*;
pub use error::{FieldError, PipelineError, PipelineErrorKind, RowError, SettingsError};
pub use normalize::{ContactNormalizer, DataNormalizer};
pub use pipeline::{normalize_table, NormalizedTable};
pub use service::{output_filename, NormalizationService};
pub use settings::NormalizerSettings;
