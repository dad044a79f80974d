//! Common regex patterns for French quote-request fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Phone numbers (French numbering plan)
    pub static ref PHONE_NATIONAL: Regex = Regex::new(
        r"^0[1-9](?:[\s.\-]?\d{2}){4}$"
    ).unwrap();

    pub static ref PHONE_INTERNATIONAL: Regex = Regex::new(
        r"^\+33[\s.\-]?(?:\(0\)[\s.\-]?)?[1-9](?:[\s.\-]?\d{2}){4}$"
    ).unwrap();

    pub static ref PHONE_INTERNATIONAL_ZEROS: Regex = Regex::new(
        r"^0033[\s.\-]?(?:\(0\)[\s.\-]?)?[1-9](?:[\s.\-]?\d{2}){4}$"
    ).unwrap();

    // Bare "33" prefix: exactly nine significant digits must follow, so a
    // domestic number such as 03 36 40 87 89 never qualifies.
    pub static ref PHONE_BARE_PREFIX: Regex = Regex::new(
        r"^33[\s.\-]?[1-9](?:[\s.\-]?\d{2}){4}$"
    ).unwrap();

    // Dates, tried in this order
    pub static ref DATE_ISO: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})$"
    ).unwrap();

    pub static ref DATE_DMY_SLASH: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{4})$"
    ).unwrap();

    pub static ref DATE_DMY_DASH: Regex = Regex::new(
        r"^(\d{1,2})-(\d{1,2})-(\d{4})$"
    ).unwrap();

    pub static ref DATE_DMY_SLASH_SHORT: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{2})$"
    ).unwrap();

    pub static ref DATE_DMY_DASH_SHORT: Regex = Regex::new(
        r"^(\d{1,2})-(\d{1,2})-(\d{2})$"
    ).unwrap();

    pub static ref DATE_DMY_SPACE: Regex = Regex::new(
        r"^(\d{1,2})\s+(\d{1,2})\s+(\d{4})$"
    ).unwrap();

    pub static ref DATE_DMY_DOT: Regex = Regex::new(
        r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$"
    ).unwrap();

    pub static ref DATE_FRENCH_LONG: Regex = Regex::new(
        r"(?i)^(\d{1,2})(?:er)?\s+(janvier|f[ée]vrier|mars|avril|mai|juin|juillet|ao[uû]t|septembre|octobre|novembre|d[ée]cembre)\s+(\d{4})$"
    ).unwrap();

    // Email
    pub static ref EMAIL: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();
}
