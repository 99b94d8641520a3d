pub mod dob;
pub mod phone;

use crate::error::{FieldError, SettingsError};
use crate::settings::NormalizerSettings;

pub use dob::{expand_year, format_iso_date, normalize_date_of_birth, parse_date_of_birth};
pub use phone::{normalize_phone, MIN_E164_DIGITS};

/// Field-level normalization used by the row pipeline.
///
/// Implementations must be pure over their inputs and their own immutable
/// settings so rows can be normalized independently of each other.
pub trait ContactNormalizer {
    /// Returns an ISO `YYYY-MM-DD` date.
    fn normalize_date(&self, raw: Option<&str>) -> Result<String, FieldError>;
    /// Returns an E.164 `+<digits>` number.
    fn normalize_phone(&self, raw: Option<&str>) -> Result<String, FieldError>;
}

#[derive(Debug, Clone, Default)]
pub struct DataNormalizer {
    settings: NormalizerSettings,
}

impl DataNormalizer {
    pub fn new(settings: NormalizerSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }
}

impl ContactNormalizer for DataNormalizer {
    fn normalize_date(&self, raw: Option<&str>) -> Result<String, FieldError> {
        normalize_date_of_birth(raw, &self.settings)
    }

    fn normalize_phone(&self, raw: Option<&str>) -> Result<String, FieldError> {
        normalize_phone(raw, &self.settings.default_country_code)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactNormalizer, DataNormalizer};
    use crate::settings::NormalizerSettings;

    #[test]
    fn data_normalizer_uses_configured_country_code() {
        let settings = NormalizerSettings {
            default_country_code: "44".to_string(),
            ..NormalizerSettings::default()
        };
        let normalizer = DataNormalizer::new(settings).expect("settings");
        assert_eq!(
            normalizer.normalize_phone(Some("07946 095812")).unwrap(),
            "+447946095812"
        );
        assert_eq!(
            normalizer.normalize_date(Some("3 Jan 1985")).unwrap(),
            "1985-01-03"
        );
    }

    #[test]
    fn data_normalizer_rejects_invalid_settings() {
        let settings = NormalizerSettings {
            pivot_year: 150,
            ..NormalizerSettings::default()
        };
        assert!(DataNormalizer::new(settings).is_err());
    }
}
