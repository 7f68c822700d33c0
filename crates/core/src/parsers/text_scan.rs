//! Small regex and line helpers shared by the institution parsers.

use regex::Regex;
use rust_decimal::Decimal;

use crate::statements::{clean_currency_value, HoldingsExtraction};

/// First capture group of the first match, trimmed.
pub(crate) fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Text of capture group 1 of the first match of the first pattern that
/// matches.
pub(crate) fn first_capture_of<'t>(patterns: &[&Regex], text: &'t str) -> Option<&'t str> {
    patterns.iter().find_map(|re| first_capture(re, text))
}

/// First capture group parsed as a currency amount.
pub(crate) fn capture_amount(re: &Regex, text: &str) -> Option<Decimal> {
    first_capture(re, text).and_then(clean_currency_value)
}

/// Capture group `index` of `caps` parsed as a currency amount.
pub(crate) fn amount_at(caps: &regex::Captures<'_>, index: usize) -> Option<Decimal> {
    caps.get(index).and_then(|m| clean_currency_value(m.as_str()))
}

/// Trimmed lines of a holdings section with their 1-based line numbers.
pub(crate) fn numbered_lines(section: &str) -> Vec<(usize, &str)> {
    section
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .collect()
}

/// Lines that carry figures but are not holdings: totals, page furniture.
pub(crate) fn is_summary_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("total")
        || lower.contains("subtotal")
        || lower.starts_with("page ")
        || lower.contains("pending")
}

/// Records a line that looked like a holding but could not be parsed.
///
/// Only lines that contain a digit are reported: headings and name
/// continuations are expected noise inside a holdings section.
pub(crate) fn warn_unparsed(
    extraction: &mut HoldingsExtraction,
    line_number: usize,
    line: &str,
    reason: &str,
) {
    if line.chars().any(|c| c.is_ascii_digit()) && !is_summary_line(line) {
        extraction.push_warning(line_number, line, reason);
    }
}
