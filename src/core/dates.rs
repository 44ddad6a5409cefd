// src/core/dates.rs
//! Date normalization for registry pages.
//!
//! The registry mixes several date spellings across its pages. Everything that
//! leaves this module is either a canonical `YYYY-MM-DD` string or the empty
//! string; nothing here returns an error.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::config::consts::DATE_FMT;

/// Tried in order; first successful parse wins.
const FORMATS: [&str; 5] = [
    "%Y-%m-%d", // 2024-01-31
    "%d-%b-%Y", // 31-Jan-2024
    "%Y/%m/%d", // 2024/01/31
    "%d/%m/%Y", // 31/01/2024
    "%d-%m-%Y", // 31-01-2024
];

static RE_EMBEDDED_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("invalid regex: embedded iso date"));

/// Canonicalize `raw` to `YYYY-MM-DD`, or return an empty string.
pub fn parse_date(raw: &str) -> String {
    parse_naive(raw)
        .map(|d| d.format(DATE_FMT).to_string())
        .unwrap_or_default()
}

/// Same rules as [`parse_date`], but keeps the typed date.
pub fn parse_naive(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(has_full_year)
        .or_else(|| {
            RE_EMBEDDED_ISO
                .find_iter(s)
                .find_map(|m| NaiveDate::parse_from_str(m.as_str(), DATE_FMT).ok())
        })
}

// chrono's `%Y` also takes 1-3 digit years; `12/03/23` is not year 12.
fn has_full_year(d: &NaiveDate) -> bool {
    (1000..=9999).contains(&d.year())
}

/// An empty expiry is open-ended and counts as active. A value that is not a
/// canonical date counts as inactive.
pub fn is_active(until: &str, today: NaiveDate) -> bool {
    let until = until.trim();
    if until.is_empty() {
        return true;
    }
    match NaiveDate::parse_from_str(until, DATE_FMT) {
        Ok(d) => d >= today,
        Err(_) => false,
    }
}
