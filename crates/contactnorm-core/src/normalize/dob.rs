use crate::error::FieldError;
use crate::settings::{is_date_separator, NormalizerSettings};
use chrono::{Datelike, NaiveDate};

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

pub fn normalize_date_of_birth(
    raw: Option<&str>,
    settings: &NormalizerSettings,
) -> Result<String, FieldError> {
    let date = parse_date_of_birth(raw, settings)?;
    Ok(format_iso_date(date))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Best-effort reading of a birth date written in any of the common
/// day-first, month-first, year-first, compact or month-name forms.
///
/// When the candidate triple is not a real date, day and month are swapped
/// once before giving up.
pub fn parse_date_of_birth(
    raw: Option<&str>,
    settings: &NormalizerSettings,
) -> Result<NaiveDate, FieldError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::MissingDob);
    }

    let (year, month, day) = if trimmed.chars().any(char::is_alphabetic) {
        parse_with_month_name(trimmed, settings)?
    } else {
        parse_numeric(trimmed, settings)?
    };

    validate_or_swap(trimmed, year, month, day)
}

/// Two-digit years land in `base_year + 100` up to the pivot, in `base_year`
/// above it. Anything from 100 up is taken literally.
pub fn expand_year(year: u32, settings: &NormalizerSettings) -> i64 {
    let base = i64::from(settings.base_year);
    if year >= 100 {
        return i64::from(year);
    }
    if year <= settings.pivot_year {
        base + 100 + i64::from(year)
    } else {
        base + i64::from(year)
    }
}

fn parse_numeric(raw: &str, settings: &NormalizerSettings) -> Result<(i64, u32, u32), FieldError> {
    let runs = digit_runs(raw);
    match runs.as_slice() {
        [first, second, third] => {
            let first = parse_number(raw, first)?;
            let second = parse_number(raw, second)?;
            let third = parse_number(raw, third)?;
            if first >= 1000 {
                return Ok((expand_year(first, settings), second, third));
            }
            let (mut day, mut month) = (first, second);
            if month > 12 && day <= 12 {
                std::mem::swap(&mut day, &mut month);
            }
            Ok((expand_year(third, settings), month, day))
        }
        [compact] if compact.len() == 8 => {
            let leading = parse_number(raw, &compact[..4])?;
            if i64::from(leading) >= i64::from(settings.base_year) {
                let month = parse_number(raw, &compact[4..6])?;
                let day = parse_number(raw, &compact[6..8])?;
                Ok((expand_year(leading, settings), month, day))
            } else {
                let day = parse_number(raw, &compact[..2])?;
                let month = parse_number(raw, &compact[2..4])?;
                let year = parse_number(raw, &compact[4..8])?;
                Ok((expand_year(year, settings), month, day))
            }
        }
        [compact] if compact.len() == 6 => {
            let day = parse_number(raw, &compact[..2])?;
            let month = parse_number(raw, &compact[2..4])?;
            let year = parse_number(raw, &compact[4..6])?;
            Ok((expand_year(year, settings), month, day))
        }
        _ => Err(FieldError::UnrecognizedDob(raw.to_string())),
    }
}

#[derive(Debug, Clone, Copy)]
struct NumericToken {
    position: usize,
    value: u32,
}

fn parse_with_month_name(
    raw: &str,
    settings: &NormalizerSettings,
) -> Result<(i64, u32, u32), FieldError> {
    let cleaned = strip_ordinal_suffixes(raw);
    let tokens = cleaned
        .split(is_date_separator)
        .filter(|token| !token.is_empty());

    let mut month: Option<(usize, u32)> = None;
    let mut numbers: Vec<NumericToken> = Vec::new();

    for (position, token) in tokens.enumerate() {
        if let Some(value) = settings.month_number(token) {
            if month.is_some() {
                return Err(FieldError::AmbiguousMonth);
            }
            month = Some((position, value));
        } else if token.chars().all(|ch| ch.is_ascii_digit()) {
            numbers.push(NumericToken {
                position,
                value: parse_number(raw, token)?,
            });
        } else {
            return Err(FieldError::UnrecognizedDobToken(token.to_string()));
        }
    }

    let Some((month_position, month_value)) = month else {
        return Err(FieldError::IncompleteDob);
    };
    if numbers.len() < 2 {
        return Err(FieldError::IncompleteDob);
    }

    let year_token = select_year(month_position, &numbers);
    let year = expand_year(year_token.value, settings);

    let mut left: Option<u32> = None;
    let mut right: Option<u32> = None;
    for token in numbers
        .iter()
        .filter(|token| token.position != year_token.position)
    {
        if token.position < month_position {
            left = Some(token.value);
        } else if right.is_none() {
            right = Some(token.value);
        }
    }

    let day = match (left, right) {
        (Some(_), Some(_)) => return Err(FieldError::AmbiguousDay),
        (Some(day), None) | (None, Some(day)) => day,
        (None, None) => return Err(FieldError::IncompleteDob),
    };

    Ok((year, month_value, day))
}

/// A four-digit number wins outright (first one in reading order), then the
/// rightmost number after the month, then the last number overall.
fn select_year(month_position: usize, numbers: &[NumericToken]) -> NumericToken {
    if let Some(token) = numbers.iter().find(|token| token.value >= 1000) {
        return *token;
    }
    if let Some(token) = numbers
        .iter()
        .rev()
        .find(|token| token.position > month_position)
    {
        return *token;
    }
    // Callers guarantee at least two numbers.
    numbers[numbers.len() - 1]
}

fn validate_or_swap(raw: &str, year: i64, month: u32, day: u32) -> Result<NaiveDate, FieldError> {
    let invalid = || FieldError::InvalidDob(raw.to_string());
    let year = i32::try_from(year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, day, month))
        .ok_or_else(invalid)
}

fn digit_runs(raw: &str) -> Vec<&str> {
    raw.split(|ch: char| !ch.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect()
}

fn parse_number(raw: &str, digits: &str) -> Result<u32, FieldError> {
    digits
        .parse::<u32>()
        .map_err(|_| FieldError::UnrecognizedDob(raw.to_string()))
}

/// Drops `st`/`nd`/`rd`/`th` right after a digit, as in `3rd`, unless the
/// suffix runs straight into another word character.
fn strip_ordinal_suffixes(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut index = 0;
    while index < chars.len() {
        let ch = chars[index];
        out.push(ch);
        index += 1;
        if !ch.is_ascii_digit() || index + 2 > chars.len() {
            continue;
        }
        let suffix: String = chars[index..index + 2]
            .iter()
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        let boundary = chars
            .get(index + 2)
            .is_none_or(|next| !(next.is_alphanumeric() || *next == '_'));
        if boundary && ORDINAL_SUFFIXES.contains(&suffix.as_str()) {
            index += 2;
        }
    }
    out
}
