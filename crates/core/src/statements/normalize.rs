//! Value normalization shared by every statement parser.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use super::statements_constants::STATEMENT_DATE_FORMATS;
use super::statements_errors::ParseError;

static CURRENCY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:CAD|USD|CDN|US)\b|[A-Z]{2}\$").expect("Invalid regex pattern")
});

/// Converts a currency string to a decimal.
///
/// Handles `$1,234.56`, `-$1,234.56`, `($1,234.56)`, `1,234.56-` and
/// currency codes. Returns `None` for empty or unparseable input; never zero
/// as a stand-in for "missing".
pub fn clean_currency_value(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_codes = CURRENCY_CODE.replace_all(trimmed, "");
    let mut body: String = without_codes
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '\u{a0}') && !c.is_whitespace())
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();

    let mut negative = false;
    if body.starts_with('(') && body.ends_with(')') && body.len() >= 2 {
        negative = true;
        body = body[1..body.len() - 1].to_string();
    }
    if let Some(stripped) = body.strip_suffix('-') {
        negative = !negative;
        body = stripped.to_string();
    }
    if let Some(stripped) = body.strip_prefix('-') {
        negative = !negative;
        body = stripped.to_string();
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let parsed = Decimal::from_str(&body).ok()?;
    Some(if negative { -parsed } else { parsed })
}

/// Parses a statement date in one of the known institution layouts.
///
/// Unknown layouts are an error rather than a guess: a wrong statement date
/// would silently collide with another statement of the same account.
pub fn parse_statement_date(value: &str) -> Result<NaiveDate, ParseError> {
    let cleaned = normalize_date_text(value);
    if cleaned.is_empty() {
        return Err(ParseError::UnrecognizedDate(value.trim().to_string()));
    }
    STATEMENT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
        .ok_or_else(|| ParseError::UnrecognizedDate(value.trim().to_string()))
}

/// Collapses whitespace, tightens "30 , 2025" to "30, 2025" and title-cases
/// month names ("OCTOBER" -> "October").
fn normalize_date_text(value: &str) -> String {
    let joined = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let tightened = joined.replace(" ,", ",");
    tightened
        .split(' ')
        .map(|word| {
            if word.chars().all(|c| c.is_alphabetic() || c == '.') {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
