//! CIBC Personal Portfolio Services statements: bank-managed pooled fund
//! accounts. A holding row may be prefixed with the asset class it opens.

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use super::text_scan::{amount_at, capture_amount, first_capture, numbered_lines, warn_unparsed};
use crate::statements::{
    parse_statement_date, AccountInfo, HoldingsExtraction, ParseError, RawHolding,
    StatementParser, StatementText,
};

static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Account\s+Number:\s*(\d+)").expect("Invalid regex pattern"));
static ACCOUNT_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Account\s+Type:\s*([^\n]+)").expect("Invalid regex pattern"));
static PERIOD_ENDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)For\s+the\s+period\s+ending:\s*([A-Za-z]+)\s+(\d+),\s+(\d{4})")
        .expect("Invalid regex pattern")
});
static ENDING_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Ending\s+Account\s+Value\s+([\d,]+\.\d+)").expect("Invalid regex pattern")
});
// The cash total row prints book cost then value; the value is the balance.
static CASH_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Cash\s+and\s+Cash\s+Equivalents\s+Total\s+Cash.*?\s+[\d,]+\.\d+\s+([\d,]+\.\d+)",
    )
    .expect("Invalid regex pattern")
});
static HOLDINGS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)Y\s+O\s+U\s+R\s+A\s+C\s+C\s+O\s+U\s+N\s+T\s+",
        r"H\s+O\s+L\s+D\s+I\s+N\s+G\s+S.*?Number.*?Description[^\n]*\n",
        r"(.*?)(?:Total\s+Account|Holdings|\*\d+\*)",
    ))
    .expect("Invalid regex pattern")
});

const CATEGORY_ALTERNATIVES: &str = concat!(
    r"Cash and Cash Equivalents|Fixed Income|",
    r"Canadian Short-Term Bonds?|Canadian Bonds?|Canadian Long-Term Bonds?|",
    r"Equities|Canadian Equities|U\.S\. Equities|International and Global Equities",
);

/// units, description, book cost, price, value
const ROW_FIGURES: &str = r"([\d,]+\.\d+)\s+(.+?)\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)";

static CATEGORY_WITH_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^({CATEGORY_ALTERNATIVES})\s+{ROW_FIGURES}$"))
        .expect("Invalid regex pattern")
});
static CATEGORY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^({CATEGORY_ALTERNATIVES})$")).expect("Invalid regex pattern")
});
static HOLDING_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{ROW_FIGURES}$")).expect("Invalid regex pattern"));

#[derive(Debug, Default, Clone, Copy)]
pub struct CibcPpsParser;

impl CibcPpsParser {
    pub fn new() -> Self {
        Self
    }
}

/// Builds a holding from five figure captures starting at `first`.
fn holding_from_row(
    caps: &regex::Captures<'_>,
    first: usize,
    category: &Option<String>,
) -> Option<RawHolding> {
    let quantity = amount_at(caps, first)?;
    let price = amount_at(caps, first + 3)?;
    let market_value = amount_at(caps, first + 4)?;
    Some(RawHolding {
        quantity: Some(quantity),
        book_value: amount_at(caps, first + 2),
        price: Some(price),
        market_value: Some(market_value),
        section: category.clone(),
        ..RawHolding::new(caps[first + 1].trim())
    })
}

impl StatementParser for CibcPpsParser {
    fn institution(&self) -> &str {
        "CIBC"
    }

    fn extract_account_info(&self, text: &StatementText) -> Result<AccountInfo, ParseError> {
        let text = text.text();
        let mut info = AccountInfo {
            account_number: first_capture(&ACCOUNT_NUMBER, text).map(str::to_string),
            account_type: first_capture(&ACCOUNT_TYPE, text).map(str::to_string),
            total_value: capture_amount(&ENDING_VALUE, text),
            // Accounts without a cash position print no cash total at all.
            cash_balance: Some(capture_amount(&CASH_TOTAL, text).unwrap_or(Decimal::ZERO)),
            ..Default::default()
        };

        if let Some(caps) = PERIOD_ENDING.captures(text) {
            let date = parse_statement_date(&format!("{} {}, {}", &caps[1], &caps[2], &caps[3]))?;
            info.statement_date = Some(date);
            info.period_end = Some(date);
        }

        Ok(info)
    }

    fn extract_holdings(&self, text: &StatementText) -> HoldingsExtraction {
        let mut extraction = HoldingsExtraction::default();
        let Some(section) = HOLDINGS_SECTION.captures(text.text()).and_then(|c| c.get(1)) else {
            return extraction;
        };

        let mut category: Option<String> = None;
        for (line_number, line) in numbered_lines(section.as_str()) {
            if line.is_empty() || line.starts_with("Total ") {
                continue;
            }

            // "Canadian Short-Term Bonds 2214.7673 Imperial Short-Term Bond Pool
            //  22,157.41 10.0983 22,365.38" on one line
            let (caps, first) = if let Some(caps) = CATEGORY_WITH_ROW.captures(line) {
                category = Some(caps[1].to_string());
                (caps, 2)
            } else if CATEGORY_HEADING.is_match(line) {
                category = Some(line.to_string());
                continue;
            } else if let Some(caps) = HOLDING_ROW.captures(line) {
                (caps, 1)
            } else {
                warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "row does not match the holdings layout",
                );
                continue;
            };

            match holding_from_row(&caps, first, &category) {
                Some(holding) => extraction.holdings.push(holding),
                None => warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "unreadable units, price or value",
                ),
            }
        }
        extraction
    }
}
