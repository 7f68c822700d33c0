//! Olympia Trust self-directed plan statements. Holdings are exempt market
//! securities listed with units first.

use regex::Regex;
use std::sync::LazyLock;

use super::text_scan::{amount_at, capture_amount, numbered_lines, warn_unparsed};
use crate::statements::{
    parse_statement_date, AccountInfo, HoldingsExtraction, ParseError, RawHolding,
    StatementParser, StatementText,
};

static ACCOUNT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Statement of Account\s+([A-Z][A-Za-z\s-]+?)\s+#(\d+)")
        .expect("Invalid regex pattern")
});
static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+ \d+, \d{4})\s+To\s+(\w+ \d+, \d{4})").expect("Invalid regex pattern")
});
static TOTAL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total Plan Value:\s+\$?([\d,]+\.?\d*)").expect("Invalid regex pattern")
});
static CASH_BALANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total Cash Balance:\s+\$?([\d,]+\.?\d*)").expect("Invalid regex pattern")
});
static SECURITIES_HELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)SECURITIES HELD \(CAD\)(.*?)Total Securities:").expect("Invalid regex pattern")
});
static EXEMPT_MARKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)EXEMPT MARKET SECURITIES[^\S\n]*\n(.*)").expect("Invalid regex pattern")
});
/// units, description, book value, price, market value
static HOLDING_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\d,]+\.?\d*)\s+(.+?)\s+\$?([\d,]+\.?\d*)\s+\$?([\d.]+)\s+\$?([\d,]+\.?\d*)$")
        .expect("Invalid regex pattern")
});

const EXEMPT_MARKET_SECTION: &str = "Exempt Market Securities";

#[derive(Debug, Default, Clone, Copy)]
pub struct OlympiaParser;

impl OlympiaParser {
    pub fn new() -> Self {
        Self
    }
}

/// A description wraps onto the next line when that line neither starts with
/// a figure nor carries a dollar amount.
fn is_name_continuation(line: &str) -> bool {
    !line.is_empty()
        && !line.starts_with(|c: char| c.is_ascii_digit())
        && !line.contains('$')
        && !is_column_header(line)
}

fn is_column_header(line: &str) -> bool {
    line.contains("Item Description") || line.contains("Units")
}

impl StatementParser for OlympiaParser {
    fn institution(&self) -> &str {
        "Olympia"
    }

    fn extract_account_info(&self, text: &StatementText) -> Result<AccountInfo, ParseError> {
        let text = text.text();
        let mut info = AccountInfo {
            total_value: capture_amount(&TOTAL_VALUE, text),
            cash_balance: capture_amount(&CASH_BALANCE, text),
            ..Default::default()
        };

        // "Statement of Account RRSP - Self-Directed #262412"
        if let Some(caps) = ACCOUNT_HEADER.captures(text) {
            info.account_type = Some(caps[1].trim().to_string());
            info.account_number = Some(caps[2].to_string());
        }

        if let Some(caps) = PERIOD.captures(text) {
            info.period_start = Some(parse_statement_date(&caps[1])?);
            let end = parse_statement_date(&caps[2])?;
            info.period_end = Some(end);
            info.statement_date = Some(end);
        }

        Ok(info)
    }

    fn extract_holdings(&self, text: &StatementText) -> HoldingsExtraction {
        let mut extraction = HoldingsExtraction::default();
        let Some(exempt) = SECURITIES_HELD
            .captures(text.text())
            .and_then(|c| c.get(1))
            .and_then(|held| EXEMPT_MARKET.captures(held.as_str()))
            .and_then(|c| c.get(1))
        else {
            return extraction;
        };

        let lines = numbered_lines(exempt.as_str());
        let mut idx = 0;
        while idx < lines.len() {
            let (line_number, line) = lines[idx];
            idx += 1;
            if line.is_empty() || is_column_header(line) {
                continue;
            }

            let Some(caps) = HOLDING_ROW.captures(line) else {
                warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "row does not match the securities layout",
                );
                continue;
            };

            let mut name = caps[2].trim().to_string();
            if let Some(&(_, next)) = lines.get(idx) {
                if is_name_continuation(next) {
                    name.push(' ');
                    name.push_str(next);
                    idx += 1;
                }
            }

            let (Some(units), Some(market_value)) = (amount_at(&caps, 1), amount_at(&caps, 5))
            else {
                warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "unreadable units or market value",
                );
                continue;
            };
            extraction.holdings.push(RawHolding {
                quantity: Some(units),
                book_value: amount_at(&caps, 3),
                price: amount_at(&caps, 4),
                market_value: Some(market_value),
                section: Some(EXEMPT_MARKET_SECTION.to_string()),
                ..RawHolding::new(name)
            });
        }
        extraction
    }
}
