//! CIBC Investor's Edge self-directed statements (RRSP, TFSA and investment
//! accounts). Holdings may be listed in Canadian and U.S. dollar sections.

use regex::Regex;
use std::sync::LazyLock;

use super::text_scan::{amount_at, capture_amount, first_capture, numbered_lines, warn_unparsed};
use crate::statements::{
    account_types, parse_statement_date, AccountInfo, HoldingsExtraction, ParseError, RawHolding,
    StatementParser, StatementText,
};

static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Account\s*#\s*(\d+-\d+)").expect("Invalid regex pattern"));
// "October 1-October 31, 2025"
static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z]+)\s+(\d+)-([A-Za-z]+)\s+(\d+),\s+(\d{4})")
        .expect("Invalid regex pattern")
});
static TOTAL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)total\s+portfolio\s+\d+%\s+\$?([\d,]+\.?\d*)").expect("Invalid regex pattern")
});
static CASH_BALANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Cash\s*&\s*Cash\s+Equivalents\s+\d+%\s+\$?([\d,]+\.?\d*)")
        .expect("Invalid regex pattern")
});
static PORTFOLIO_ASSETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)Portfolio Assets.*?",
        r"description\s+quantity\s+book\s+value\s+current\s+market\s+value[^\n]*\n",
        r"(.*?)(?:Messages|Disclosures|total portfolio in)",
    ))
    .expect("Invalid regex pattern")
});
static US_DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)U\.?S\.?\s+Dollars").expect("Invalid regex pattern"));
static CANADIAN_DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Canadian\s+Dollars").expect("Invalid regex pattern"));
static CATEGORY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Cash & Cash Equivalents|Equities|Mutual Funds|Fixed Income)$")
        .expect("Invalid regex pattern")
});
/// description, quantity, book value, [ƒ] price, market value, [segregated quantity]
///
/// The "ƒ" marks securities transferred in at an estimated book value.
static HOLDING_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(.+?)\s+([\d,]+(?:\.\d+)?)\s+\$?([\d,]+\.\d+)",
        r"\s+ƒ?\s*([\d,]+\.\d+)\s+\$?([\d,]+\.\d+)\s*(\d+)?",
    ))
    .expect("Invalid regex pattern")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct CibcInvestorsEdgeParser;

impl CibcInvestorsEdgeParser {
    pub fn new() -> Self {
        Self
    }
}

fn is_page_furniture(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("subtotal")
        || lower.starts_with("total portfolio")
        || (lower.contains("description") && lower.contains("quantity"))
        || line.contains("Investor's Edge")
        || line.contains("Account #")
}

impl StatementParser for CibcInvestorsEdgeParser {
    fn institution(&self) -> &str {
        "CIBC"
    }

    fn extract_account_info(&self, text: &StatementText) -> Result<AccountInfo, ParseError> {
        let text = text.text();
        let account_type = if text.contains("Registered Retirement Savings Plan") {
            Some(account_types::RRSP)
        } else if text.contains("Tax Free Savings Account") {
            Some(account_types::TFSA)
        } else if text.contains("Investment Account") && text.contains("Investor's Edge") {
            Some(account_types::NON_REGISTERED)
        } else {
            None
        };

        let mut info = AccountInfo {
            account_number: first_capture(&ACCOUNT_NUMBER, text).map(str::to_string),
            account_type: account_type.map(str::to_string),
            total_value: capture_amount(&TOTAL_VALUE, text),
            cash_balance: capture_amount(&CASH_BALANCE, text),
            ..Default::default()
        };

        if let Some(caps) = PERIOD.captures(text) {
            let year = &caps[5];
            let start = parse_statement_date(&format!("{} {}, {year}", &caps[1], &caps[2]))?;
            let end = parse_statement_date(&format!("{} {}, {year}", &caps[3], &caps[4]))?;
            info.period_start = Some(start);
            info.period_end = Some(end);
            info.statement_date = Some(end);
        }

        Ok(info)
    }

    fn extract_holdings(&self, text: &StatementText) -> HoldingsExtraction {
        let mut extraction = HoldingsExtraction::default();
        let Some(assets) = PORTFOLIO_ASSETS.captures(text.text()).and_then(|c| c.get(1)) else {
            return extraction;
        };

        let mut category: Option<String> = None;
        let mut currency = "CAD";
        for (line_number, line) in numbered_lines(assets.as_str()) {
            if line.is_empty() {
                continue;
            }
            if US_DOLLARS.is_match(line) {
                currency = "USD";
                continue;
            }
            // Not skipped: "subtotal for Canadian Dollars" is handled below.
            if CANADIAN_DOLLARS.is_match(line) {
                currency = "CAD";
            }
            if CATEGORY_HEADING.is_match(line) {
                category = Some(line.to_string());
                continue;
            }
            if is_page_furniture(line) {
                continue;
            }

            let Some(caps) = HOLDING_ROW.captures(line) else {
                warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "row does not match the portfolio layout",
                );
                continue;
            };
            let (Some(quantity), Some(price), Some(market_value)) =
                (amount_at(&caps, 2), amount_at(&caps, 4), amount_at(&caps, 5))
            else {
                warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "unreadable quantity, price or market value",
                );
                continue;
            };

            extraction.holdings.push(RawHolding {
                quantity: Some(quantity),
                book_value: amount_at(&caps, 3),
                price: Some(price),
                market_value: Some(market_value),
                currency: Some(currency.to_string()),
                section: category.clone(),
                ..RawHolding::new(caps[1].trim())
            });
        }
        extraction
    }
}
