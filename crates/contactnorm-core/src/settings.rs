use crate::error::SettingsError;
use std::collections::BTreeMap;

pub const DEFAULT_COUNTRY_CODE: &str = "971";
pub const DEFAULT_PIVOT_YEAR: u32 = 25;
pub const DEFAULT_BASE_YEAR: i32 = 1900;

pub const MAX_COUNTRY_CODE_LEN: usize = 3;
pub const MAX_PIVOT_YEAR: u32 = 99;
pub const MIN_BASE_YEAR: i32 = 1000;
pub const MAX_BASE_YEAR: i32 = 9899;

const DEFAULT_MONTH_NAMES: [(&str, u32); 24] = [
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

/// Immutable inputs of the field normalizers.
///
/// `pivot_year` decides which century a two-digit year lands in: values up to
/// and including the pivot go to `base_year + 100`, the rest to `base_year`.
/// `base_year` also separates `YYYYMMDD` from `DDMMYYYY` in compact dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerSettings {
    pub default_country_code: String,
    pub pivot_year: u32,
    pub base_year: i32,
    pub month_names: BTreeMap<String, u32>,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            pivot_year: DEFAULT_PIVOT_YEAR,
            base_year: DEFAULT_BASE_YEAR,
            month_names: default_month_names(),
        }
    }
}

impl NormalizerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_country_code(&self.default_country_code)?;
        validate_pivot_year(self.pivot_year)?;
        validate_base_year(self.base_year)?;
        for (name, month) in &self.month_names {
            validate_month_alias(name, *month)?;
        }
        Ok(())
    }

    /// Adds or replaces a month alias. The name is trimmed and lowercased
    /// before it is stored.
    pub fn insert_month_name(&mut self, name: &str, month: u32) -> Result<(), SettingsError> {
        let key = normalize_month_alias(name);
        validate_month_alias(&key, month)?;
        self.month_names.insert(key, month);
        Ok(())
    }

    pub fn month_number(&self, token: &str) -> Option<u32> {
        self.month_names.get(&token.to_lowercase()).copied()
    }
}

pub fn default_month_names() -> BTreeMap<String, u32> {
    DEFAULT_MONTH_NAMES
        .iter()
        .map(|(name, month)| (name.to_string(), *month))
        .collect()
}

pub fn normalize_month_alias(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn validate_country_code(code: &str) -> Result<(), SettingsError> {
    if code.is_empty()
        || code.len() > MAX_COUNTRY_CODE_LEN
        || !code.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(SettingsError::InvalidCountryCode(code.to_string()));
    }
    Ok(())
}

pub fn validate_pivot_year(pivot: u32) -> Result<u32, SettingsError> {
    if pivot > MAX_PIVOT_YEAR {
        return Err(SettingsError::InvalidPivotYear(pivot));
    }
    Ok(pivot)
}

pub fn validate_base_year(year: i32) -> Result<i32, SettingsError> {
    if !(MIN_BASE_YEAR..=MAX_BASE_YEAR).contains(&year) {
        return Err(SettingsError::InvalidBaseYear(year));
    }
    Ok(year)
}

fn validate_month_alias(name: &str, month: u32) -> Result<(), SettingsError> {
    // Aliases must survive date tokenization intact to ever match.
    if name.is_empty()
        || name
            .chars()
            .any(|ch| ch.is_ascii_digit() || is_date_separator(ch))
    {
        return Err(SettingsError::InvalidMonthAlias(name.to_string()));
    }
    if !(1..=12).contains(&month) {
        return Err(SettingsError::InvalidMonthNumber {
            name: name.to_string(),
            month,
        });
    }
    Ok(())
}

pub(crate) fn is_date_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, ',' | '.' | '_' | '/' | ':' | ';' | '-')
}
