//! Data models for quote-request extraction.

pub mod config;
pub mod enum_match;
pub mod field;
pub mod record;
pub mod taxonomy;
