use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// The only accepted rendering of a resolved timestamp.
pub const CANONICAL_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Shape of a candidate timestamp inside completion text. Matching validates
/// shape only; calendar validity is checked separately so the two failure
/// modes stay distinguishable.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}-\d{4} \d{2}:\d{2}").unwrap());

/// Outcome of scanning raw completion text for a canonical timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateResolution {
    /// A shape-matching, calendar-valid timestamp, re-rendered canonically.
    Resolved(String),
    /// No substring matched the dd-mm-yyyy hh:mm shape.
    NotFound,
    /// A substring matched the shape but is not a real calendar date/time.
    NotCalendarValid,
}

/// Extract a canonical timestamp from noisy completion text. The first
/// shape-matching substring is taken, parsed strictly, and re-rendered
/// through [`CANONICAL_DATE_FORMAT`].
pub fn resolve_date(raw: &str) -> DateResolution {
    let Some(candidate) = DATE_PATTERN.find(raw) else {
        return DateResolution::NotFound;
    };

    match NaiveDateTime::parse_from_str(candidate.as_str(), CANONICAL_DATE_FORMAT) {
        Ok(parsed) => DateResolution::Resolved(parsed.format(CANONICAL_DATE_FORMAT).to_string()),
        Err(_) => DateResolution::NotCalendarValid,
    }
}
