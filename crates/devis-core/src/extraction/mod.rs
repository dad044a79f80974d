//! Provider response adaptation.
//!
//! The OCR and LLM calls happen upstream; this module only turns their
//! JSON output into the typed record the rest of the pipeline works on.

mod adapter;

pub use adapter::{
    DEFAULT_CONFIDENCE, RawResponse, adapt_response, parse_response_text, payload_text,
};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
