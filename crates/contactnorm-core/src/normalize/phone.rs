use crate::error::FieldError;

pub const MIN_E164_DIGITS: usize = 6;

const INTERNATIONAL_PREFIX: &str = "00";

/// Rewrites a free-form phone value as `+<digits>`.
///
/// Numbers that look local (a single trunk `0`, or 9-10 bare digits) get the
/// default country code; `+` and `00` prefixed numbers keep their own.
pub fn normalize_phone(raw: Option<&str>, default_country_code: &str) -> Result<String, FieldError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::MissingPhone);
    }

    let mut digits = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            // Letter O typed in place of zero.
            'o' | 'O' => digits.push('0'),
            ch if ch.is_ascii_digit() => digits.push(ch),
            _ => {}
        }
    }

    if digits.is_empty() {
        return Err(FieldError::PhoneWithoutDigits);
    }

    let normalized = if trimmed.starts_with('+') {
        digits
    } else if let Some(rest) = digits.strip_prefix(INTERNATIONAL_PREFIX) {
        rest.to_string()
    } else if digits.starts_with(default_country_code) {
        digits
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{default_country_code}{rest}")
    } else if matches!(digits.len(), 9 | 10) {
        format!("{default_country_code}{digits}")
    } else {
        digits
    };

    if normalized.len() < MIN_E164_DIGITS {
        return Err(FieldError::PhoneTooShort);
    }

    Ok(format!("+{normalized}"))
}

#[cfg(test)]
mod tests {
    use super::normalize_phone;
    use crate::error::FieldError;

    const UAE: &str = "971";

    fn phone(raw: &str) -> Result<String, FieldError> {
        normalize_phone(Some(raw), UAE)
    }

    #[test]
    fn normalize_phone_replaces_trunk_zero() {
        assert_eq!(phone("0501234567").unwrap(), "+971501234567");
        assert_eq!(phone("050 123 4567").unwrap(), "+971501234567");
    }

    #[test]
    fn normalize_phone_drops_double_zero_prefix() {
        assert_eq!(phone("00971501234567").unwrap(), "+971501234567");
        assert_eq!(phone("0044 20 7946 0958").unwrap(), "+442079460958");
    }

    #[test]
    fn normalize_phone_keeps_explicit_plus() {
        assert_eq!(phone("+1 (415) 555-1212").unwrap(), "+14155551212");
        assert_eq!(phone("+971501234567").unwrap(), "+971501234567");
    }

    #[test]
    fn normalize_phone_keeps_numbers_with_country_code() {
        assert_eq!(phone("971-50-123-4567").unwrap(), "+971501234567");
    }

    #[test]
    fn normalize_phone_prefixes_bare_local_numbers() {
        assert_eq!(phone("501234567").unwrap(), "+971501234567");
        assert_eq!(phone("5012345678").unwrap(), "+9715012345678");
    }

    #[test]
    fn normalize_phone_passes_other_lengths_through() {
        assert_eq!(phone("44207946095812").unwrap(), "+44207946095812");
        assert_eq!(phone("1234567").unwrap(), "+1234567");
    }

    #[test]
    fn normalize_phone_reads_letter_o_as_zero() {
        assert_eq!(phone("O5O1234567").unwrap(), "+971501234567");
        assert_eq!(phone("oo971501234567").unwrap(), "+971501234567");
    }

    #[test]
    fn normalize_phone_rejects_short_values() {
        assert_eq!(phone("12345"), Err(FieldError::PhoneTooShort));
        assert_eq!(
            FieldError::PhoneTooShort.to_string(),
            "Phone value is too short for E.164 format"
        );
    }

    #[test]
    fn normalize_phone_rejects_missing_and_digitless_values() {
        assert_eq!(normalize_phone(None, UAE), Err(FieldError::MissingPhone));
        assert_eq!(phone("   "), Err(FieldError::MissingPhone));
        assert_eq!(phone("n/a"), Err(FieldError::PhoneWithoutDigits));
    }

    #[test]
    fn normalize_phone_reads_only_ascii_digits() {
        assert_eq!(phone("٠٥٠١٢٣٤٥٦٧"), Err(FieldError::PhoneWithoutDigits));
    }

    #[test]
    fn normalize_phone_is_idempotent_on_e164() {
        let once = phone("0501234567").unwrap();
        assert_eq!(phone(&once).unwrap(), once);
    }
}
