//! Date parsing for French quote requests.

use chrono::NaiveDate;
use regex::Regex;

use super::FieldRule;
use super::patterns::{
    DATE_DMY_DASH, DATE_DMY_DASH_SHORT, DATE_DMY_DOT, DATE_DMY_SLASH, DATE_DMY_SLASH_SHORT,
    DATE_DMY_SPACE, DATE_FRENCH_LONG, DATE_ISO,
};
use crate::models::field::FieldValue;

/// Date rule.
pub struct DateRule;

impl FieldRule for DateRule {
    fn name(&self) -> &'static str {
        "date"
    }

    fn normalize(&self, value: &FieldValue) -> Option<FieldValue> {
        match value {
            FieldValue::Date(d) => Some(FieldValue::Date(*d)),
            other => {
                let text = other.as_text()?;
                parse_date(&text).map(|(date, _)| FieldValue::Date(date))
            }
        }
    }
}

/// Accepted date notations, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// 2025-09-23
    Iso,
    /// 23/09/2025
    DmySlash,
    /// 23-09-2025
    DmyDash,
    /// 23/09/25
    DmySlashShort,
    /// 23-09-25
    DmyDashShort,
    /// 23 09 2025
    DmySpace,
    /// 23.09.2025
    DmyDot,
    /// 23 septembre 2025
    FrenchLong,
}

impl DateFormat {
    /// Try order. The first format yielding a real calendar date wins.
    pub const ORDER: [DateFormat; 8] = [
        DateFormat::Iso,
        DateFormat::DmySlash,
        DateFormat::DmyDash,
        DateFormat::DmySlashShort,
        DateFormat::DmyDashShort,
        DateFormat::DmySpace,
        DateFormat::DmyDot,
        DateFormat::FrenchLong,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            DateFormat::Iso => &DATE_ISO,
            DateFormat::DmySlash => &DATE_DMY_SLASH,
            DateFormat::DmyDash => &DATE_DMY_DASH,
            DateFormat::DmySlashShort => &DATE_DMY_SLASH_SHORT,
            DateFormat::DmyDashShort => &DATE_DMY_DASH_SHORT,
            DateFormat::DmySpace => &DATE_DMY_SPACE,
            DateFormat::DmyDot => &DATE_DMY_DOT,
            DateFormat::FrenchLong => &DATE_FRENCH_LONG,
        }
    }

    /// Parse `text` strictly in this format.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.pattern().captures(text.trim())?;

        let (year, month, day): (i32, u32, u32) = match self {
            DateFormat::Iso => (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?),
            DateFormat::DmySlashShort | DateFormat::DmyDashShort => (
                expand_short_year(caps[3].parse().ok()?),
                caps[2].parse().ok()?,
                caps[1].parse().ok()?,
            ),
            DateFormat::FrenchLong => (
                caps[3].parse().ok()?,
                french_month_to_number(&caps[2])?,
                caps[1].parse().ok()?,
            ),
            _ => (caps[3].parse().ok()?, caps[2].parse().ok()?, caps[1].parse().ok()?),
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Parse a date with the first matching format.
pub fn parse_date(text: &str) -> Option<(NaiveDate, DateFormat)> {
    DateFormat::ORDER
        .iter()
        .find_map(|format| format.parse(text).map(|date| (date, *format)))
}

/// Two-digit years: 00-68 are 2000s, 69-99 are 1900s.
fn expand_short_year(year: i32) -> i32 {
    if year <= 68 { 2000 + year } else { 1900 + year }
}

fn french_month_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.as_str() {
        "janvier" => 1,
        "février" | "fevrier" => 2,
        "mars" => 3,
        "avril" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" => 7,
        "août" | "aout" => 8,
        "septembre" => 9,
        "octobre" => 10,
        "novembre" => 11,
        "décembre" | "decembre" => 12,
        _ => return None,
    };
    Some(number)
}
