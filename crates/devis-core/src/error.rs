//! Error types for the devis-core library.

use thiserror::Error;

/// Main error type for the devis library.
#[derive(Error, Debug)]
pub enum DevisError {
    /// Structural problem in a provider response.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Invariant violation while building a field or match.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while adapting a raw provider response.
///
/// These are the only errors that abort a document's pipeline run. Anything
/// semantic is reported through confidence penalties instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field payload does not have the expected shape.
    #[error("invalid payload for {field}: {reason}")]
    InvalidPayload { field: String, reason: String },

    /// Provider reported a confidence outside [0, 1].
    #[error("confidence for {field} out of range: {value}")]
    InvalidConfidence { field: String, value: f64 },

    /// The response could not be read as a JSON object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Invariant violations on the confidence model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Confidence outside [0, 1] or NaN.
    #[error("confidence out of range: {0}")]
    ConfidenceOutOfRange(f32),

    /// More suggestions than an enumeration match may carry.
    #[error("too many suggestions: {0}")]
    TooManySuggestions(usize),

    /// The matched value is not the best-ranked suggestion.
    #[error("matched value {0} is not the first suggestion")]
    MatchNotFirstSuggestion(String),

    /// Suggestions are not ordered by descending score.
    #[error("suggestions are not sorted by descending score")]
    UnsortedSuggestions,

    /// A result without a matched value is not flagged for review.
    #[error("unmatched result must require validation")]
    UnmatchedNotFlagged,

    /// A result without a matched value carries a confidence.
    #[error("unmatched result must have zero confidence, got {0}")]
    UnmatchedWithConfidence(f32),
}

/// Result type for the devis library.
pub type Result<T> = std::result::Result<T, DevisError>;
