//! Core library for confidence-scored extraction of maintenance quote requests.
//!
//! This crate provides:
//! - Adaptation of OCR/LLM provider responses into typed records
//! - French postal code, phone, date, email and flag normalization
//! - Fuzzy mapping of free text onto trade and agency enumerations
//! - A review report telling a human what still needs checking

pub mod error;
pub mod extraction;
pub mod mapping;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod validation;

pub use error::{DevisError, ExtractionError, FieldError, Result};
pub use extraction::{RawResponse, adapt_response, parse_response_text};
pub use mapping::EnumMapper;
pub use models::config::DevisConfig;
pub use models::enum_match::{EnumMatch, Suggestion};
pub use models::field::{Confidence, ConfidenceLevel, ExtractedField, FieldValue};
pub use models::record::{ExtractedRecord, FieldName};
pub use models::taxonomy::{Taxonomy, TaxonomyEntry};
pub use pipeline::ExtractionPipeline;
pub use report::{FieldReview, ReviewReport};
pub use validation::FieldValidator;
