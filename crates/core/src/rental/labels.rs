//! Sequential display labels for dress instances ("Dress #1", "Dress #2", ...).

use std::ops::RangeInclusive;

/// Prefix shared by every generated instance label.
pub const LABEL_PREFIX: &str = "Dress #";

pub fn format_label(number: i64) -> String {
    format!("{LABEL_PREFIX}{number}")
}

/// Parse the trailing integer of a label, ignoring trailing whitespace.
///
/// Labels that do not end in digits (or whose digits overflow) yield `None`.
pub fn trailing_number(label: &str) -> Option<i64> {
    let trimmed = label.trim_end();
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    trimmed[digits_start..].parse().ok()
}

/// Label numbers for `count` new instances, continuing after the highest
/// number found among `existing` labels (or starting at 1).
pub fn next_label_numbers<'a, I>(existing: I, count: i64) -> RangeInclusive<i64>
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(trailing_number)
        .max()
        .unwrap_or(0);
    (max + 1)..=(max + count)
}
