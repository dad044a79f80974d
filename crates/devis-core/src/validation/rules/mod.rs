//! Normalization rules for French quote-request fields.

pub mod contact;
pub mod dates;
pub mod flags;
pub mod patterns;
pub mod phone;
pub mod postal;

pub use contact::{EmailRule, normalize_email};
pub use dates::{DateFormat, DateRule, parse_date};
pub use flags::{FlagRule, parse_flag};
pub use phone::{PhoneFormat, PhoneRule, is_valid_phone, normalize_phone};
pub use postal::{PostalCodeRule, normalize_postal_code};

use crate::models::field::FieldValue;

/// A normalization rule for one kind of field.
pub trait FieldRule {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Canonical form of `value`, or `None` when it cannot be normalized.
    fn normalize(&self, value: &FieldValue) -> Option<FieldValue>;
}
