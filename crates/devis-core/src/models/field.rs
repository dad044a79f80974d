//! Extracted field values and their confidence metadata.

use std::borrow::Cow;
use std::fmt;
use std::ops::Mul;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::FieldError;

/// A confidence score guaranteed to lie in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Confidence(f32);

impl Confidence {
    /// Full confidence.
    pub const ONE: Confidence = Confidence(1.0);
    /// No confidence.
    pub const ZERO: Confidence = Confidence(0.0);

    /// Build a confidence, rejecting values outside [0, 1] and NaN.
    pub fn new(value: f32) -> Result<Self, FieldError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FieldError::ConfidenceOutOfRange(value))
        }
    }

    /// Build a confidence, clamping into [0, 1]. NaN becomes zero.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() { Self(0.0) } else { Self(value.clamp(0.0, 1.0)) }
    }

    /// Raw score.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Coarse band for this score.
    pub fn level(self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.0)
    }
}

impl Mul for Confidence {
    type Output = Confidence;

    // Both factors are in [0, 1], so the product is too.
    fn mul(self, rhs: Confidence) -> Confidence {
        Confidence(self.0 * rhs.0)
    }
}

impl TryFrom<f32> for Confidence {
    type Error = FieldError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.0)
    }
}

/// Confidence band derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Score >= 0.90.
    High,
    /// 0.70 <= score < 0.90.
    Medium,
    /// Score < 0.70.
    Low,
}

impl ConfidenceLevel {
    /// Band a raw score.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.9 {
            ConfidenceLevel::High
        } else if score >= 0.7 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// Value carried by an extracted field.
///
/// Providers return loosely typed JSON; normalization may upgrade a text
/// value into a richer variant (e.g. [`FieldValue::Date`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Date(NaiveDate),
    /// Arrays and objects, kept verbatim.
    Structured(serde_json::Value),
}

impl FieldValue {
    /// Convert a non-null JSON value. Returns `None` for `null`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Number(n.clone())),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            other => Some(FieldValue::Structured(other.clone())),
        }
    }

    /// Textual view for rules that work on strings.
    ///
    /// Numbers are rendered because providers sometimes emit postal codes
    /// or phone numbers as JSON numbers.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Parsed date, when normalization succeeded.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// True for text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// One extracted datum with trust metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedField {
    /// Extracted value; `None` when the provider found nothing.
    pub value: Option<FieldValue>,

    confidence: Confidence,

    /// Literal text the provider attributes the value to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,

    /// Other candidate values, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<serde_json::Value>,
}

impl ExtractedField {
    /// Create a field. Fails if `confidence` is outside [0, 1].
    pub fn new(value: Option<FieldValue>, confidence: f32) -> Result<Self, FieldError> {
        Ok(Self {
            value,
            confidence: Confidence::new(confidence)?,
            source_text: None,
            alternatives: Vec::new(),
        })
    }

    /// Create a text field.
    pub fn text(value: impl Into<String>, confidence: f32) -> Result<Self, FieldError> {
        Self::new(Some(FieldValue::Text(value.into())), confidence)
    }

    pub fn with_source_text(mut self, source: impl Into<String>) -> Self {
        self.source_text = Some(source.into());
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<serde_json::Value>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn confidence(&self) -> f32 {
        self.confidence.value()
    }

    /// Replace the confidence. Out-of-range values are rejected, not clamped.
    pub fn set_confidence(&mut self, confidence: f32) -> Result<(), FieldError> {
        self.confidence = Confidence::new(confidence)?;
        Ok(())
    }

    /// Multiply the confidence by a penalty factor.
    pub fn penalize(&mut self, factor: Confidence) {
        self.confidence = self.confidence * factor;
    }

    /// Band derived from the current confidence.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence.level()
    }

    /// Text view of the value, if it has one.
    pub fn text_value(&self) -> Option<Cow<'_, str>> {
        self.value.as_ref().and_then(FieldValue::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_rejects_out_of_range() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
        assert_eq!(Confidence::new(1.2), Err(FieldError::ConfidenceOutOfRange(1.2)));
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(f32::NAN).is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Confidence::clamped(1.2), Confidence::ONE);
        assert_eq!(Confidence::clamped(-0.1), Confidence::ZERO);
        assert_eq!(Confidence::clamped(f32::NAN), Confidence::ZERO);
        assert_eq!(Confidence::clamped(0.4).value(), 0.4);
    }

    #[test]
    fn test_confidence_level_bands() {
        assert_eq!(ConfidenceLevel::from_score(0.95), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.9), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.89), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.7), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.69), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.0), ConfidenceLevel::Low);
    }

    #[test]
    fn test_level_follows_penalty() {
        let mut field = ExtractedField::text("75001", 0.95).unwrap();
        assert_eq!(field.confidence_level(), ConfidenceLevel::High);

        field.penalize(Confidence::new(0.5).unwrap());
        assert_eq!(field.confidence(), 0.95 * 0.5);
        assert_eq!(field.confidence_level(), ConfidenceLevel::Low);
    }

    #[test]
    fn test_set_confidence_is_checked() {
        let mut field = ExtractedField::text("Dupont", 0.8).unwrap();
        assert!(field.set_confidence(1.5).is_err());
        assert_eq!(field.confidence(), 0.8);

        field.set_confidence(0.92).unwrap();
        assert_eq!(field.confidence_level(), ConfidenceLevel::High);
    }

    #[test]
    fn test_number_value_as_text() {
        let value = FieldValue::from_json(&serde_json::json!(7501)).unwrap();
        assert_eq!(value.as_text().as_deref(), Some("7501"));
        assert!(FieldValue::from_json(&serde_json::Value::Null).is_none());
    }
}
