use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::statements_constants::{account_types, DEFAULT_CURRENCY};
use super::statements_errors::RowExtractionWarning;
use crate::classification::{classify_holding, AssetCategory, Classification, ClassificationRule};

/// Text of a statement as produced by the text extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementText {
    pages: Vec<String>,
    full_text: String,
}

impl StatementText {
    pub fn new(pages: Vec<String>) -> Self {
        let full_text = pages.join("\n");
        Self { pages, full_text }
    }

    /// Wraps text that was not split into pages.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()])
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// All pages joined with newlines.
    pub fn text(&self) -> &str {
        &self.full_text
    }

    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty()
    }
}

/// Account-level fields extracted from a statement. Every field is optional at
/// this stage; required fields are enforced when the statement is assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub statement_date: Option<NaiveDate>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub total_value: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
}

/// A holding row as extracted by a parser, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHolding {
    pub symbol: Option<String>,
    pub security_name: String,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub book_value: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub currency: Option<String>,
    /// Statement heading the row was listed under, if any.
    pub section: Option<String>,
}

impl RawHolding {
    pub fn new(security_name: impl Into<String>) -> Self {
        Self {
            security_name: security_name.into(),
            ..Default::default()
        }
    }
}

/// Rows and row-level warnings produced by a holdings extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsExtraction {
    pub holdings: Vec<RawHolding>,
    pub warnings: Vec<RowExtractionWarning>,
}

impl HoldingsExtraction {
    pub fn push_warning(
        &mut self,
        line: usize,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.warnings.push(RowExtractionWarning {
            line,
            content: content.into(),
            reason: reason.into(),
        });
    }

    pub fn extend(&mut self, other: HoldingsExtraction) {
        self.holdings.extend(other.holdings);
        self.warnings.extend(other.warnings);
    }
}

/// A classified holding in normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRecord {
    pub symbol: Option<String>,
    pub security_name: String,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub book_value: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub asset_type: String,
    pub asset_category: AssetCategory,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub classified_by: ClassificationRule,
}

impl HoldingRecord {
    /// Classifies a raw row. This is the only way a holding acquires its
    /// asset type and category.
    pub fn from_raw(raw: RawHolding) -> Self {
        let classification = classify_holding(&raw.security_name, raw.section.as_deref());
        let currency = raw
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Self {
            symbol: raw.symbol,
            security_name: raw.security_name.trim().to_string(),
            quantity: raw.quantity,
            price: raw.price,
            book_value: raw.book_value,
            market_value: raw.market_value,
            asset_type: classification.asset_type,
            asset_category: classification.asset_category,
            currency,
            section: raw.section,
            classified_by: classification.rule,
        }
    }

    /// Replaces the classification fields.
    pub fn apply_classification(&mut self, classification: Classification) {
        self.asset_type = classification.asset_type;
        self.asset_category = classification.asset_category;
        self.classified_by = classification.rule;
    }

    pub fn classification(&self) -> Classification {
        Classification {
            asset_type: self.asset_type.clone(),
            asset_category: self.asset_category,
            rule: self.classified_by,
        }
    }

    /// A holding without book or market value cannot take part in gain/loss
    /// computations.
    pub fn has_valuation(&self) -> bool {
        self.book_value.is_some() || self.market_value.is_some()
    }

    pub fn unrealized_gain(&self) -> Option<Decimal> {
        match (self.market_value, self.book_value) {
            (Some(market), Some(book)) => Some(market - book),
            _ => None,
        }
    }
}

/// Normalized output of a parser invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStatement {
    pub institution: String,
    pub account_number: String,
    pub account_type: Option<String>,
    pub statement_date: NaiveDate,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub total_value: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
    pub holdings: Vec<HoldingRecord>,
    #[serde(default)]
    pub performance: BTreeMap<String, Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    #[serde(skip)]
    pub warnings: Vec<RowExtractionWarning>,
}

impl ParsedStatement {
    /// Sum of the market values of all holdings that report one.
    pub fn holdings_market_value(&self) -> Decimal {
        self.holdings.iter().filter_map(|h| h.market_value).sum()
    }

    pub fn fallback_holdings(&self) -> impl Iterator<Item = &HoldingRecord> {
        self.holdings.iter().filter(|h| h.classified_by.is_fallback())
    }
}

/// Maps the many spellings institutions use for an account type onto the
/// known set. Unrecognized values pass through trimmed.
pub fn normalize_account_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let compact: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    let mapped = match compact.as_str() {
        "REGISTEREDRETIREMENTSAVINGSPLAN" | "GRSP" | "RRSP" => Some(account_types::RRSP),
        "TAXFREESAVINGSACCOUNT" | "TFSA" => Some(account_types::TFSA),
        "LOCKEDINRETIREMENTACCOUNT" | "LIRA" => Some(account_types::LIRA),
        "REGISTEREDRETIREMENTINCOMEFUND" | "RRIF" => Some(account_types::RRIF),
        "REGISTEREDEDUCATIONSAVINGSPLAN" | "RESP" => Some(account_types::RESP),
        "NONREGISTERED" | "INVESTMENTACCOUNT" | "CASHACCOUNT" => {
            Some(account_types::NON_REGISTERED)
        }
        "GROUPPLAN" | "GROUPCHOICESPLAN" => Some(account_types::GROUP_PLAN),
        _ => None,
    };
    if let Some(mapped) = mapped {
        return mapped.to_string();
    }

    // "RRSP - Self-Directed" and similar: a known code as the leading word.
    let leading = trimmed
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or_default()
        .to_uppercase();
    match leading.as_str() {
        "RRSP" | "GRSP" => account_types::RRSP.to_string(),
        "TFSA" => account_types::TFSA.to_string(),
        "LIRA" => account_types::LIRA.to_string(),
        "RRIF" => account_types::RRIF.to_string(),
        "RESP" => account_types::RESP.to_string(),
        _ => trimmed.to_string(),
    }
}
