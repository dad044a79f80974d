//! French phone number normalization.

use super::FieldRule;
use super::patterns::{
    PHONE_BARE_PREFIX, PHONE_INTERNATIONAL, PHONE_INTERNATIONAL_ZEROS, PHONE_NATIONAL,
};
use crate::models::field::FieldValue;

/// Phone number rule.
pub struct PhoneRule;

impl FieldRule for PhoneRule {
    fn name(&self) -> &'static str {
        "phone"
    }

    fn normalize(&self, value: &FieldValue) -> Option<FieldValue> {
        let text = value.as_text()?;
        normalize_phone(&text).map(FieldValue::Text)
    }
}

/// How a phone number was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneFormat {
    /// 06 12 34 56 78, 06.12.34.56.78, 0612345678
    National,
    /// +33 6 12 34 56 78, +33 (0)6 12 34 56 78
    International,
    /// 0033 6 12 34 56 78
    InternationalZeros,
    /// 33 6 12 34 56 78
    BarePrefix,
}

impl PhoneFormat {
    /// Recognize the notation. The domestic form is checked first.
    pub fn detect(phone: &str) -> Option<Self> {
        let phone = phone.trim();
        if PHONE_NATIONAL.is_match(phone) {
            Some(PhoneFormat::National)
        } else if PHONE_INTERNATIONAL.is_match(phone) {
            Some(PhoneFormat::International)
        } else if PHONE_INTERNATIONAL_ZEROS.is_match(phone) {
            Some(PhoneFormat::InternationalZeros)
        } else if PHONE_BARE_PREFIX.is_match(phone) {
            Some(PhoneFormat::BarePrefix)
        } else {
            None
        }
    }

    fn country_prefix_len(&self) -> usize {
        match self {
            PhoneFormat::National => 0,
            PhoneFormat::International | PhoneFormat::BarePrefix => 2,
            PhoneFormat::InternationalZeros => 4,
        }
    }
}

/// Normalize a French phone number to ten digits starting with 0.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let format = PhoneFormat::detect(phone)?;
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = match format {
        PhoneFormat::National => digits,
        _ => {
            let significant = &digits[format.country_prefix_len()..];
            // "+33 (0)6..." keeps the trunk zero in the digit string
            let significant = if significant.len() == 10 {
                significant.strip_prefix('0')?
            } else {
                significant
            };
            format!("0{}", significant)
        }
    };

    is_valid_phone(&normalized).then_some(normalized)
}

/// Ten ASCII digits with a leading zero.
pub fn is_valid_phone(digits: &str) -> bool {
    digits.len() == 10 && digits.starts_with('0') && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_formats() {
        assert_eq!(normalize_phone("06 12 34 56 78"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("06.12.34.56.78"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("06-12-34-56-78"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("0612345678"), Some("0612345678".to_string()));
    }

    #[test]
    fn test_international_formats() {
        assert_eq!(normalize_phone("+33 6 12 34 56 78"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("+33612345678"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("0033 6 12 34 56 78"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("33 6 12 34 56 78"), Some("0612345678".to_string()));
        assert_eq!(normalize_phone("+33 (0)251775356"), Some("0251775356".to_string()));
    }

    #[test]
    fn test_domestic_number_starting_with_33() {
        assert_eq!(PhoneFormat::detect("03 36 40 87 89"), Some(PhoneFormat::National));
        assert_eq!(normalize_phone("03 36 40 87 89"), Some("0336408789".to_string()));
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(normalize_phone("12 34 56 78"), None);
        assert_eq!(normalize_phone("06 12 34 56"), None);
        assert_eq!(normalize_phone("00 12 34 56 78"), None);
        assert_eq!(normalize_phone("+44 20 7946 0958"), None);
        assert_eq!(normalize_phone("appeler le gardien"), None);
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("0612345678"));
        assert!(!is_valid_phone("612345678"));
        assert!(!is_valid_phone("1612345678"));
    }
}
