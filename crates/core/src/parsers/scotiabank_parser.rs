//! ScotiaMcLeod account statements and trade confirmation notices.

use regex::Regex;
use std::sync::LazyLock;

use super::text_scan::{amount_at, capture_amount, first_capture_of, numbered_lines, warn_unparsed};
use crate::statements::{
    parse_statement_date, AccountInfo, HoldingsExtraction, ParseError, RawHolding,
    StatementParser, StatementText,
};

static ACCOUNT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Account\s*Number:\s*(\d+-\d+-\d+)").expect("Invalid regex pattern")
});
// Confirmation notices print "ACCOUNT NO. 487−8150012", sometimes with a
// unicode minus.
static CONFIRMATION_ACCOUNT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ACCOUNT\s*NO\.\s*(\d+[−\-]\d+(?:[−\-]\d+)?)").expect("Invalid regex pattern")
});
static ACCOUNT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Account\s*Type:\s*([^\n]+)").expect("Invalid regex pattern")
});
static CONFIRMATION_ACCOUNT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ACCOUNT\s*NO\.\s*\d+[−\-]\d+(?:[−\-]\d+)?[−\-\s]*(GRSP|RRSP|TFSA)")
        .expect("Invalid regex pattern")
});
static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)For\s*the\s*Period:\s*([A-Za-z]+)\s*(\d+)\s*to\s*(\d+),\s*(\d{4})")
        .expect("Invalid regex pattern")
});
static CONFIRMATION_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{3,})\s+(\d{1,2}),\s+(\d{4})").expect("Invalid regex pattern")
});
static TOTAL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total Value of Account\s+\$?([\d,]+\.?\d*)").expect("Invalid regex pattern")
});
static CASH_BALANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*Cash\s+\$?([\d,]+\.?\d*)\s*$").expect("Invalid regex pattern")
});
static HOLDINGS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)Details of Your Account Holdings.*?Security.*?Description.*?Quantity[^\n]*\n",
        r"(.*?)(?:Total Account Holdings|\z)",
    ))
    .expect("Invalid regex pattern")
});
/// Figures printed on the line below a security name:
/// quantity, average cost, book value, price, market value.
static FIGURES_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\d,]+\.?\d*)\s+([\d.]+)\s+([\d,]+\.?\d*)\s+([\d.]+)\s+([\d,]+\.?\d*)$")
        .expect("Invalid regex pattern")
});
static SINGLE_LINE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+([\d,]+\.?\d*)\s+([\d.]+)\s+([\d,]+\.?\d*)\s+([\d.]+)\s+([\d,]+\.?\d*)$")
        .expect("Invalid regex pattern")
});

const SECTION_HEADINGS: &[&str] = &["Cash", "Fixed Income", "Equity", "Multi-Asset"];

#[derive(Debug, Default, Clone, Copy)]
pub struct ScotiaBankParser;

impl ScotiaBankParser {
    pub fn new() -> Self {
        Self
    }
}

/// Builds a holding from captures laid out as quantity, average cost, book
/// value, price, market value starting at `first`.
fn holding_from_figures(
    name: &str,
    caps: &regex::Captures<'_>,
    first: usize,
    section: &Option<String>,
) -> Option<RawHolding> {
    let quantity = amount_at(caps, first)?;
    let price = amount_at(caps, first + 3)?;
    let market_value = amount_at(caps, first + 4)?;
    Some(RawHolding {
        quantity: Some(quantity),
        price: Some(price),
        book_value: amount_at(caps, first + 2),
        market_value: Some(market_value),
        section: section.clone(),
        ..RawHolding::new(name)
    })
}

impl StatementParser for ScotiaBankParser {
    fn institution(&self) -> &str {
        "ScotiaBank"
    }

    fn extract_account_info(&self, text: &StatementText) -> Result<AccountInfo, ParseError> {
        let text = text.text();
        let mut info = AccountInfo {
            account_number: first_capture_of(&[&ACCOUNT_NUMBER, &CONFIRMATION_ACCOUNT_NUMBER], text)
                .map(|n| n.replace('−', "-")),
            account_type: first_capture_of(&[&ACCOUNT_TYPE, &CONFIRMATION_ACCOUNT_TYPE], text)
                .map(str::to_string),
            total_value: capture_amount(&TOTAL_VALUE, text),
            cash_balance: capture_amount(&CASH_BALANCE, text),
            ..Default::default()
        };

        if let Some(caps) = PERIOD.captures(text) {
            let (month, year) = (&caps[1], &caps[4]);
            let start = parse_statement_date(&format!("{month} {}, {year}", &caps[2]))?;
            let end = parse_statement_date(&format!("{month} {}, {year}", &caps[3]))?;
            info.period_start = Some(start);
            info.period_end = Some(end);
            info.statement_date = Some(end);
        } else if let Some(caps) = CONFIRMATION_DATE.captures(text) {
            // Confirmation notices carry a single trade date, e.g. "OCTOBER 6, 2025".
            let date = format!("{} {}, {}", &caps[1], &caps[2], &caps[3]);
            info.statement_date = Some(parse_statement_date(&date)?);
        }

        Ok(info)
    }

    fn extract_holdings(&self, text: &StatementText) -> HoldingsExtraction {
        let mut extraction = HoldingsExtraction::default();
        let Some(section) = HOLDINGS_SECTION.captures(text.text()).and_then(|c| c.get(1)) else {
            return extraction;
        };

        let lines = numbered_lines(section.as_str());
        let mut current_section: Option<String> = None;
        let mut idx = 0;
        while idx < lines.len() {
            let (line_number, line) = lines[idx];
            idx += 1;

            if line.is_empty() {
                continue;
            }
            if SECTION_HEADINGS.contains(&line) {
                current_section = Some(line.to_string());
                continue;
            }
            if line.contains("Total") || line.contains("Subtotal") || line.contains("Pending") {
                continue;
            }

            // A name without figures; the figures follow on the next line.
            if !line.chars().any(|c| c.is_ascii_digit()) {
                if let Some(&(next_number, next_line)) = lines.get(idx) {
                    if let Some(caps) = FIGURES_ROW.captures(next_line) {
                        idx += 1;
                        match holding_from_figures(line, &caps, 1, &current_section) {
                            Some(holding) => extraction.holdings.push(holding),
                            None => extraction.push_warning(
                                next_number,
                                next_line,
                                "unreadable quantity, price or market value",
                            ),
                        }
                    }
                }
                continue;
            }

            match SINGLE_LINE_ROW.captures(line) {
                Some(caps) => {
                    match holding_from_figures(caps[1].trim(), &caps, 2, &current_section) {
                        Some(holding) => extraction.holdings.push(holding),
                        None => warn_unparsed(
                            &mut extraction,
                            line_number,
                            line,
                            "unreadable quantity, price or market value",
                        ),
                    }
                }
                None => warn_unparsed(
                    &mut extraction,
                    line_number,
                    line,
                    "row does not match the holdings layout",
                ),
            }
        }
        extraction
    }
}
