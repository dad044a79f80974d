//! French postal code normalization.

use super::FieldRule;
use crate::models::field::FieldValue;

/// Postal code rule.
pub struct PostalCodeRule;

impl FieldRule for PostalCodeRule {
    fn name(&self) -> &'static str {
        "postal_code"
    }

    fn normalize(&self, value: &FieldValue) -> Option<FieldValue> {
        let text = value.as_text()?;
        normalize_postal_code(&text).map(FieldValue::Text)
    }
}

/// Normalize a postal code to five digits.
///
/// Non-digits are dropped. Four digits get a leading zero back, since OCR
/// and LLMs both tend to lose it (e.g. "7500" for "07500").
pub fn normalize_postal_code(code: &str) -> Option<String> {
    let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        5 => Some(digits),
        4 => Some(format!("0{}", digits)),
        _ => None,
    }
}
