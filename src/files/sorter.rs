//! Sort strategies for discovered files
//!
//! Every strategy is a stable sort and reassigns `order` densely from 1 afterwards.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

use crate::error::RenameError;
use crate::types::{FileRecord, SortMode};

/// ASCII digits only; `str::parse` rejects other decimal digits
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digit run regex"));

/// Primary sort key extracted from a file name
///
/// Keys order in three tiers: numbers (by value), then text (by code point),
/// then `Unmatched`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Numeric(i128),
    Text(String),
    /// Nothing extracted; sorts after every other key
    Unmatched,
}

impl SortKey {
    fn tier(&self) -> u8 {
        match self {
            SortKey::Numeric(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Unmatched => 2,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(a), SortKey::Numeric(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (a, b) => a.tier().cmp(&b.tier()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse an integer the way users type it: surrounding blanks and a sign are allowed
fn parse_integer(text: &str) -> Option<i128> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i128>().ok()
}

/// Digit runs too long for i128 saturate; the name tie-break still orders them
fn parse_digit_run(digits: &str) -> i128 {
    digits.parse::<i128>().unwrap_or(i128::MAX)
}

/// Key of the first run of digits anywhere in the name
pub fn numeric_key(name: &str) -> SortKey {
    match DIGIT_RUN.find(name) {
        Some(m) => SortKey::Numeric(parse_digit_run(m.as_str())),
        None => SortKey::Unmatched,
    }
}

/// Key from the first capture group, or the whole match when the pattern has no group
pub fn regex_key(name: &str, regex: &Regex) -> SortKey {
    let Some(caps) = regex.captures(name) else {
        return SortKey::Unmatched;
    };

    let text = if regex.captures_len() > 1 {
        caps.get(1).map(|m| m.as_str()).unwrap_or("")
    } else {
        caps.get(0).map(|m| m.as_str()).unwrap_or("")
    };

    match parse_integer(text) {
        Some(n) => SortKey::Numeric(n),
        None => SortKey::Text(text.to_string()),
    }
}

/// Number in the name first, names without digits last, ties by name
pub fn sort_by_numeric(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by_cached_key(|r| (numeric_key(&r.original_name), r.original_name.clone()));
    records
}

/// Case-insensitive name order
pub fn sort_by_alphabetic(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by_cached_key(|r| r.original_name.to_lowercase());
    records
}

/// Oldest creation time first
pub fn sort_by_date(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by_key(|r| r.creation_time);
    records
}

/// Grouped by extension, case-insensitive name order inside each group
pub fn sort_by_extension(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by_cached_key(|r| (r.extension.clone(), r.original_name.to_lowercase()));
    records
}

/// Order by a value extracted with a user pattern
///
/// Fails without touching anything if the pattern does not compile.
pub fn sort_by_regex(records: Vec<FileRecord>, pattern: &str) -> Result<Vec<FileRecord>, RenameError> {
    let regex = Regex::new(pattern)?;
    let mut records = records;
    records.sort_by_cached_key(|r| (regex_key(&r.original_name, &regex), r.original_name.clone()));
    Ok(records)
}

/// Reassign `order` as 1..=len in slice order
pub fn update_order(records: &mut [FileRecord]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.order = i + 1;
    }
}

/// Sort a copy of `records` with `mode` and renumber it
///
/// The input is left untouched, so a failed regex sort keeps the caller's current order.
pub fn sort(records: &[FileRecord], mode: &SortMode) -> Result<Vec<FileRecord>, RenameError> {
    let records = records.to_vec();
    let mut sorted = match mode {
        SortMode::Numeric => sort_by_numeric(records),
        SortMode::Alphabetic => sort_by_alphabetic(records),
        SortMode::Date => sort_by_date(records),
        SortMode::Extension => sort_by_extension(records),
        SortMode::Regex(pattern) => sort_by_regex(records, pattern)?,
    };
    update_order(&mut sorted);

    debug!("Sorted {} files by {:?}", sorted.len(), mode);
    Ok(sorted)
}
