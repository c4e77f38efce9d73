//! Turns user date terms into calendar days.

use chrono::{Local, NaiveDate};

const TODAY_TERMS: &[&str] = &[
    "today",
    "heute",
    "hoy",
    "aujourd'hui",
    "oggi",
    "hoje",
    "vandaag",
];

const YESTERDAY_TERMS: &[&str] = &[
    "yesterday",
    "gestern",
    "ayer",
    "hier",
    "ieri",
    "ontem",
    "gisteren",
];

/// Tried in order; the first format yielding a valid date wins.
const FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Parses `term` relative to the current local day.
pub fn parse_date(term: &str) -> Option<NaiveDate> {
    parse_date_on(term, Local::now().date_naive())
}

/// Parses `term` relative to `today`.
pub fn parse_date_on(term: &str, today: NaiveDate) -> Option<NaiveDate> {
    let term = term.trim();
    let lower = term.to_lowercase();

    if TODAY_TERMS.contains(&lower.as_str()) {
        return Some(today);
    }
    if YESTERDAY_TERMS.contains(&lower.as_str()) {
        return today.pred_opt();
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(term, format).ok())
}
