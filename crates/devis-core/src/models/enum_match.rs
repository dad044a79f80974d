//! Outcome of mapping free text onto a closed enumeration.

use serde::Serialize;

use crate::error::FieldError;
use crate::models::field::Confidence;

/// Upper bound on suggestions carried by a match.
pub const MAX_SUGGESTIONS: usize = 5;

/// A scored enumeration member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub member: String,
    pub score: f32,
}

impl Suggestion {
    pub fn new(member: impl Into<String>, score: f32) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

/// Result of matching one snippet against an enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMatch {
    matched_value: Option<String>,
    confidence: Confidence,
    original_text: String,
    suggestions: Vec<Suggestion>,
    requires_validation: bool,
}

impl EnumMatch {
    /// Build a match, checking that suggestions are bounded, sorted, and
    /// led by the matched value. An unmatched result must be flagged for
    /// review with zero confidence.
    pub fn new(
        matched_value: Option<String>,
        confidence: f32,
        original_text: impl Into<String>,
        suggestions: Vec<Suggestion>,
        requires_validation: bool,
    ) -> Result<Self, FieldError> {
        let confidence = Confidence::new(confidence)?;

        if suggestions.len() > MAX_SUGGESTIONS {
            return Err(FieldError::TooManySuggestions(suggestions.len()));
        }
        if suggestions.windows(2).any(|w| w[0].score < w[1].score) {
            return Err(FieldError::UnsortedSuggestions);
        }
        if let (Some(matched), Some(first)) = (&matched_value, suggestions.first()) {
            if &first.member != matched {
                return Err(FieldError::MatchNotFirstSuggestion(matched.clone()));
            }
        }
        if matched_value.is_none() {
            if !requires_validation {
                return Err(FieldError::UnmatchedNotFlagged);
            }
            if confidence != Confidence::ZERO {
                return Err(FieldError::UnmatchedWithConfidence(confidence.value()));
            }
        }

        Ok(Self {
            matched_value,
            confidence,
            original_text: original_text.into(),
            suggestions,
            requires_validation,
        })
    }

    pub fn matched_value(&self) -> Option<&str> {
        self.matched_value.as_deref()
    }

    pub fn confidence(&self) -> f32 {
        self.confidence.value()
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn requires_validation(&self) -> bool {
        self.requires_validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_value_must_lead() {
        let err = EnumMatch::new(
            Some("PLOMBERIE".to_string()),
            0.9,
            "fuite",
            vec![Suggestion::new("MENAGE", 0.95), Suggestion::new("PLOMBERIE", 0.9)],
            false,
        )
        .unwrap_err();
        assert_eq!(err, FieldError::MatchNotFirstSuggestion("PLOMBERIE".to_string()));
    }

    #[test]
    fn test_unmatched_must_be_flagged_with_zero_confidence() {
        assert_eq!(
            EnumMatch::new(None, 0.0, "x", Vec::new(), false).unwrap_err(),
            FieldError::UnmatchedNotFlagged
        );
        assert_eq!(
            EnumMatch::new(None, 0.7, "x", Vec::new(), true).unwrap_err(),
            FieldError::UnmatchedWithConfidence(0.7)
        );
        assert!(EnumMatch::new(None, 0.7, "x", Vec::new(), false).is_err());
    }

    #[test]
    fn test_suggestions_bounded_and_sorted() {
        let many = (0..6).map(|i| Suggestion::new(format!("M{}", i), 0.5)).collect();
        assert_eq!(
            EnumMatch::new(None, 0.0, "x", many, true).unwrap_err(),
            FieldError::TooManySuggestions(6)
        );

        let unsorted = vec![Suggestion::new("A", 0.4), Suggestion::new("B", 0.5)];
        assert_eq!(
            EnumMatch::new(None, 0.0, "x", unsorted, true).unwrap_err(),
            FieldError::UnsortedSuggestions
        );
    }

    #[test]
    fn test_unmatched_without_suggestions() {
        let m = EnumMatch::new(None, 0.0, "???", Vec::new(), true).unwrap();
        assert!(m.matched_value().is_none());
        assert!(m.requires_validation());
    }
}
