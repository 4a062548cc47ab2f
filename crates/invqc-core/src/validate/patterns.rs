//! Anchored regex patterns for date parsing.
//!
//! Every pattern matches the whole input, so a date embedded in
//! surrounding text never parses.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 2024-01-15, 2024/01/15, 2024.01.15
    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})$"
    ).unwrap();

    // 15.01.2024, 15/01/2024, 15-01-24
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})$"
    ).unwrap();

    // 15 January 2024, 3rd Mar 2024, 15 January, 2024
    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        r"(?i)^(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+),?\s+(\d{4})$"
    ).unwrap();

    // January 15, 2024 / Jan 15 2024
    pub static ref DATE_MONTH_NAME_DAY: Regex = Regex::new(
        r"(?i)^([A-Za-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$"
    ).unwrap();
}
