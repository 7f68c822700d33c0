//! Sun Life group retirement statements (RRSP / LIRA / Group Choices plans).

use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::text_scan::{amount_at, capture_amount, first_capture, numbered_lines, warn_unparsed};
use crate::statements::{
    account_types, parse_statement_date, AccountInfo, HoldingsExtraction, ParseError, RawHolding,
    StatementParser, StatementText,
};

static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Account number:\s*(\d+)").expect("Invalid regex pattern"));
static RRSP_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Registered Retirement Savings Plan \(RRSP\)").expect("Invalid regex pattern")
});
static LIRA_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Locked-in Retirement Account \(LIRA\)").expect("Invalid regex pattern")
});
static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"For the period\s+(\w+ \d+)\s+to\s+(\w+ \d+,\s*(\d{4}))")
        .expect("Invalid regex pattern")
});
static TOTAL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Value of my plans on \w+ \d+, \d{4}\s*\.+\s*\$?([\d,]+\.?\d*)")
        .expect("Invalid regex pattern")
});
static RRSP_HOLDINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)My Registered Retirement Savings Plan \(RRSP\)",
        r".*?My investments.*?INVESTMENT NAME.*?\n(.*?)(?:Total investments|\z)",
    ))
    .expect("Invalid regex pattern")
});
static LIRA_HOLDINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)My Locked-in Retirement Account \(LIRA\)",
        r".*?My investments.*?INVESTMENT NAME.*?\n(.*?)(?:Total investments|\z)",
    ))
    .expect("Invalid regex pattern")
});
static HOLDING_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+([\d,]+\.?\d*)\s+\$?([\d,]+\.?\d*)\s+\$?([\d,]+\.?\d*)$")
        .expect("Invalid regex pattern")
});
static RRSP_PERFORMANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&performance_pattern(
        r"Personal rates of return for my Registered Retirement Savings\s*Plan",
    ))
    .expect("Invalid regex pattern")
});
static LIRA_PERFORMANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&performance_pattern(
        r"Personal rates of return for my Locked-in Retirement Account",
    ))
    .expect("Invalid regex pattern")
});

/// Fund category headings printed above groups of investments.
const CATEGORY_HEADINGS: &[&str] = &[
    "Foreign/global equity",
    "Balanced",
    "Fixed income",
    "Canadian equity",
    "U.S. equity",
    "International equity",
];

/// Keys of the return figures, in the order the columns are printed.
/// The 5-year column is skipped: it is often "-" for young plans.
const PERFORMANCE_PERIODS: [&str; 5] = ["3m", "ytd", "1y", "3y", "inception"];

fn performance_pattern(title: &str) -> String {
    format!(
        "(?s){title}.*?{header}.*?{returns}",
        header = r"3 MONTH\s+YEAR-TO-DATE\s+1 YEAR\s+3 YEAR\s+5 YEAR",
        returns = concat!(
            r"(-?[\d.]+)%\s+(-?[\d.]+)%\s+(-?[\d.]+)%\s+(-?[\d.]+)%",
            r"\s+[-\d.]+%?\s+(-?[\d.]+)%",
        ),
    )
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SunLifeParser;

impl SunLifeParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_holdings_section(section: &str, extraction: &mut HoldingsExtraction) {
        let mut category: Option<String> = None;

        for (line_number, line) in numbered_lines(section) {
            if line.is_empty() {
                continue;
            }
            let has_digit = line.chars().any(|c| c.is_ascii_digit());
            if !has_digit && CATEGORY_HEADINGS.iter().any(|h| line.contains(h)) {
                category = Some(line.to_string());
                continue;
            }

            let Some(caps) = HOLDING_ROW.captures(line) else {
                warn_unparsed(
                    extraction,
                    line_number,
                    line,
                    "row does not match the investment layout",
                );
                continue;
            };
            let (Some(units), Some(price), Some(value)) =
                (amount_at(&caps, 2), amount_at(&caps, 3), amount_at(&caps, 4))
            else {
                warn_unparsed(extraction, line_number, line, "unreadable units, price or value");
                continue;
            };

            extraction.holdings.push(RawHolding {
                quantity: Some(units),
                price: Some(price),
                market_value: Some(value),
                section: category.clone(),
                ..RawHolding::new(caps[1].trim())
            });
        }
    }
}

impl StatementParser for SunLifeParser {
    fn institution(&self) -> &str {
        "SunLife"
    }

    fn extract_account_info(&self, text: &StatementText) -> Result<AccountInfo, ParseError> {
        let text = text.text();
        let mut info = AccountInfo {
            account_number: first_capture(&ACCOUNT_NUMBER, text).map(str::to_string),
            total_value: capture_amount(&TOTAL_VALUE, text),
            ..Default::default()
        };

        // A statement can cover several plans; the registered ones take priority.
        let account_type = if RRSP_TITLE.is_match(text) {
            account_types::RRSP
        } else if LIRA_TITLE.is_match(text) {
            account_types::LIRA
        } else {
            account_types::GROUP_PLAN
        };
        info.account_type = Some(account_type.to_string());

        if let Some(caps) = PERIOD.captures(text) {
            // The start of the period is printed without a year.
            let start = format!("{}, {}", &caps[1], &caps[3]);
            info.period_start = Some(parse_statement_date(&start)?);
            let end = parse_statement_date(&caps[2])?;
            info.period_end = Some(end);
            info.statement_date = Some(end);
        }

        Ok(info)
    }

    fn extract_holdings(&self, text: &StatementText) -> HoldingsExtraction {
        let mut extraction = HoldingsExtraction::default();
        for section_re in [&*RRSP_HOLDINGS, &*LIRA_HOLDINGS] {
            if let Some(section) = section_re.captures(text.text()).and_then(|c| c.get(1)) {
                Self::parse_holdings_section(section.as_str(), &mut extraction);
            }
        }
        extraction
    }

    fn extract_performance(&self, text: &StatementText) -> BTreeMap<String, Decimal> {
        let mut performance = BTreeMap::new();
        for (plan, re) in [("rrsp", &*RRSP_PERFORMANCE), ("lira", &*LIRA_PERFORMANCE)] {
            let Some(caps) = re.captures(text.text()) else {
                continue;
            };
            for (idx, period) in PERFORMANCE_PERIODS.iter().enumerate() {
                if let Some(value) = amount_at(&caps, idx + 1) {
                    performance.insert(format!("{plan}.{period}"), value);
                }
            }
        }
        performance
    }
}
