//! Yes/no flags such as `urgence`.

use super::FieldRule;
use crate::models::field::FieldValue;

/// Boolean flag rule.
pub struct FlagRule;

impl FieldRule for FlagRule {
    fn name(&self) -> &'static str {
        "flag"
    }

    fn normalize(&self, value: &FieldValue) -> Option<FieldValue> {
        match value {
            FieldValue::Bool(b) => Some(FieldValue::Bool(*b)),
            FieldValue::Number(n) => match n.as_i64() {
                Some(1) => Some(FieldValue::Bool(true)),
                Some(0) => Some(FieldValue::Bool(false)),
                _ => None,
            },
            FieldValue::Text(text) => parse_flag(text).map(FieldValue::Bool),
            _ => None,
        }
    }
}

/// Read a French or English yes/no answer.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "oui" | "o" | "yes" | "y" | "true" | "vrai" | "urgent" | "1" => Some(true),
        "non" | "n" | "no" | "false" | "faux" | "non urgent" | "0" => Some(false),
        _ => None,
    }
}
