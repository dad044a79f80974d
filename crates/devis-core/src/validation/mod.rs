//! Field validation and normalization.
//!
//! A rule that accepts a value rewrites it to canonical form and leaves the
//! confidence untouched. A rule that rejects it keeps the raw value for the
//! reviewer and multiplies the confidence by the configured penalty. No
//! rejection is ever an error.

pub mod rules;

use tracing::{debug, warn};

use crate::error::Result;
use crate::extraction::{self, RawResponse};
use crate::models::config::ValidationConfig;
use crate::models::field::{Confidence, ExtractedField};
use crate::models::record::{ExtractedRecord, FieldName};

use rules::{DateRule, EmailRule, FieldRule, FlagRule, PhoneRule, PostalCodeRule};

/// Applies the normalization rules to a record.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    postal_code_penalty: Confidence,
    phone_penalty: Confidence,
    date_penalty: Confidence,
    email_penalty: Confidence,
    flag_penalty: Confidence,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self {
            postal_code_penalty: Confidence::clamped(0.5),
            phone_penalty: Confidence::clamped(0.5),
            date_penalty: Confidence::clamped(0.3),
            email_penalty: Confidence::clamped(0.5),
            flag_penalty: Confidence::clamped(0.5),
        }
    }
}

impl FieldValidator {
    /// Create a validator with the given penalties.
    pub fn new(config: &ValidationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            postal_code_penalty: Confidence::new(config.postal_code_penalty)?,
            phone_penalty: Confidence::new(config.phone_penalty)?,
            date_penalty: Confidence::new(config.date_penalty)?,
            email_penalty: Confidence::new(config.email_penalty)?,
            flag_penalty: Confidence::new(config.flag_penalty)?,
        })
    }

    /// Normalize the record in place and return the fields that failed.
    ///
    /// Postal code, phone and request date run first; the optional extras
    /// follow and never touch the required fields.
    pub fn validate(&self, record: &mut ExtractedRecord) -> Vec<FieldName> {
        let mut failed = Vec::new();

        let mut check = |name: FieldName, field: &mut ExtractedField, rule: &dyn FieldRule, penalty: Confidence| {
            if !apply_rule(name, field, rule, penalty) {
                failed.push(name);
            }
        };

        check(
            FieldName::PostalCode,
            &mut record.required.postal_code,
            &PostalCodeRule,
            self.postal_code_penalty,
        );
        if let Some(phone) = record.optional.phone.as_mut() {
            check(FieldName::Phone, phone, &PhoneRule, self.phone_penalty);
        }
        check(
            FieldName::RequestDate,
            &mut record.required.request_date,
            &DateRule,
            self.date_penalty,
        );

        if let Some(date) = record.optional.desired_response_date.as_mut() {
            check(FieldName::DesiredResponseDate, date, &DateRule, self.date_penalty);
        }
        if let Some(email) = record.optional.email.as_mut() {
            check(FieldName::Email, email, &EmailRule, self.email_penalty);
        }
        if let Some(urgency) = record.optional.urgency.as_mut() {
            check(FieldName::Urgency, urgency, &FlagRule, self.flag_penalty);
        }

        debug!(
            "Validation finished with {} rejected fields, overall confidence {:.2}",
            failed.len(),
            record.overall_confidence()
        );

        failed
    }

    /// Adapt a raw response and validate the resulting record.
    pub fn validate_extraction(&self, raw: &RawResponse) -> extraction::Result<ExtractedRecord> {
        let mut record = extraction::adapt_response(raw)?;
        self.validate(&mut record);
        Ok(record)
    }
}

fn apply_rule(
    name: FieldName,
    field: &mut ExtractedField,
    rule: &dyn FieldRule,
    penalty: Confidence,
) -> bool {
    match field.value.as_ref().and_then(|v| rule.normalize(v)) {
        Some(normalized) => {
            field.value = Some(normalized);
            true
        }
        None => {
            let before = field.confidence();
            field.penalize(penalty);
            warn!(
                "{} rule rejected {}: {:?}, confidence {:.2} -> {:.2}",
                rule.name(),
                name.key(),
                field.value.as_ref().map(|v| v.to_string()),
                before,
                field.confidence()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldValue;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(postal_code: serde_json::Value, date: &str) -> RawResponse {
        let value = json!({
            "nom_client": {"value": "Dupont", "confidence": 0.95},
            "prenom_client": {"value": "Jean", "confidence": 0.9},
            "adresse": {"value": "12 rue des Lilas", "confidence": 0.8},
            "code_postal": {"value": postal_code, "confidence": 0.8},
            "ville": {"value": "Paris", "confidence": 0.9},
            "date_demande": {"value": date, "confidence": 0.9},
            "objet_devis": {"value": "Fuite", "confidence": 1.0},
            "message_principal": {"value": "Fuite sous évier", "confidence": 1.0},
        });
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_postal_code_leading_zero() {
        let validator = FieldValidator::default();
        let record = validator.validate_extraction(&raw(json!("7500"), "23/09/2025")).unwrap();

        assert_eq!(record.required.postal_code.text_value().as_deref(), Some("07500"));
        assert_eq!(record.required.postal_code.confidence(), 0.8);
    }

    #[test]
    fn test_invalid_postal_code_penalized() {
        let validator = FieldValidator::default();
        let mut record = extraction::adapt_response(&raw(json!("ABCDE"), "23/09/2025")).unwrap();
        let before = record.overall_confidence();

        let failed = validator.validate(&mut record);

        assert_eq!(failed, vec![FieldName::PostalCode]);
        assert_eq!(record.required.postal_code.text_value().as_deref(), Some("ABCDE"));
        assert!((record.required.postal_code.confidence() - 0.4).abs() < 1e-6);
        assert!(record.overall_confidence() < before);
    }

    #[test]
    fn test_date_rewritten_and_penalized() {
        let validator = FieldValidator::default();

        let record = validator.validate_extraction(&raw(json!("75001"), "23/09/2025")).unwrap();
        assert_eq!(
            record.required.request_date.value,
            Some(FieldValue::Date(NaiveDate::from_ymd_opt(2025, 9, 23).unwrap()))
        );

        let record = validator.validate_extraction(&raw(json!("75001"), "demain")).unwrap();
        assert_eq!(record.required.request_date.text_value().as_deref(), Some("demain"));
        assert!((record.required.request_date.confidence() - 0.27).abs() < 1e-6);
    }

    #[test]
    fn test_optional_phone_and_extras() {
        let mut response = raw(json!("75001"), "2025-09-23");
        response.insert("telephone".into(), json!({"value": "+33 6 12 34 56 78", "confidence": 0.9}));
        response.insert("email".into(), json!({"value": "pas un email", "confidence": 0.8}));
        response.insert("urgence".into(), json!({"value": "Oui", "confidence": 0.7}));

        let validator = FieldValidator::default();
        let mut record = extraction::adapt_response(&response).unwrap();
        let failed = validator.validate(&mut record);

        assert_eq!(failed, vec![FieldName::Email]);
        let phone = record.optional.phone.as_ref().unwrap();
        assert_eq!(phone.text_value().as_deref(), Some("0612345678"));
        assert_eq!(record.optional.urgency.as_ref().unwrap().value, Some(FieldValue::Bool(true)));
        assert!((record.optional.email.as_ref().unwrap().confidence() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_configured_penalties() {
        let config = ValidationConfig {
            postal_code_penalty: 0.0,
            ..Default::default()
        };
        let validator = FieldValidator::new(&config).unwrap();
        let record = validator.validate_extraction(&raw(json!("1"), "23/09/2025")).unwrap();
        assert_eq!(record.required.postal_code.confidence(), 0.0);

        let bad = ValidationConfig {
            date_penalty: 1.5,
            ..Default::default()
        };
        assert!(FieldValidator::new(&bad).is_err());
    }
}
