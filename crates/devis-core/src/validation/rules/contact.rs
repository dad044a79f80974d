//! Email address normalization.

use super::FieldRule;
use super::patterns::EMAIL;
use crate::models::field::FieldValue;

/// Email rule.
pub struct EmailRule;

impl FieldRule for EmailRule {
    fn name(&self) -> &'static str {
        "email"
    }

    fn normalize(&self, value: &FieldValue) -> Option<FieldValue> {
        let text = value.as_text()?;
        normalize_email(&text).map(FieldValue::Text)
    }
}

/// Trim and lowercase an email address, rejecting anything malformed.
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim().to_lowercase();
    EMAIL.is_match(&email).then_some(email)
}
