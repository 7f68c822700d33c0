use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;

use super::statements_errors::ParseError;
use super::statements_model::{
    normalize_account_type, AccountInfo, HoldingRecord, HoldingsExtraction, ParsedStatement,
    StatementText,
};
use crate::Result;

/// Contract every institution-specific statement parser fulfils.
///
/// Implementors supply the extraction steps; `parse` assembles them into a
/// `ParsedStatement` and enforces the required fields.
pub trait StatementParser: Send + Sync {
    /// Institution recorded on parsed statements, e.g. "SunLife". This is
    /// the same whichever registry directory the file was filed under.
    fn institution(&self) -> &str;

    fn extract_account_info(
        &self,
        text: &StatementText,
    ) -> std::result::Result<AccountInfo, ParseError>;

    /// Extracts holding rows. Rows that cannot be parsed are reported as
    /// warnings and skipped.
    fn extract_holdings(&self, text: &StatementText) -> HoldingsExtraction;

    /// Performance figures (percent returns keyed by period). Most
    /// institutions do not report any.
    fn extract_performance(&self, _text: &StatementText) -> BTreeMap<String, Decimal> {
        BTreeMap::new()
    }

    fn parse(&self, text: &StatementText) -> std::result::Result<ParsedStatement, ParseError> {
        if text.is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        let info = self.extract_account_info(text)?;
        let extraction = self.extract_holdings(text);
        let performance = self.extract_performance(text);
        assemble_statement(self.institution(), info, extraction, performance)
    }
}

/// Produces the text of a statement document.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<StatementText>;
}

/// Builds a `ParsedStatement` from extracted parts, classifying every row.
///
/// Fails when the account number or statement date is missing.
pub fn assemble_statement(
    institution: &str,
    info: AccountInfo,
    extraction: HoldingsExtraction,
    performance: BTreeMap<String, Decimal>,
) -> std::result::Result<ParsedStatement, ParseError> {
    let account_number = info
        .account_number
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(ParseError::MissingField {
            field: "account_number",
        })?;
    let statement_date = info.statement_date.ok_or(ParseError::MissingField {
        field: "statement_date",
    })?;

    let holdings = extraction
        .holdings
        .into_iter()
        .filter(|raw| !raw.security_name.trim().is_empty())
        .map(HoldingRecord::from_raw)
        .collect();

    Ok(ParsedStatement {
        institution: institution.to_string(),
        account_number,
        account_type: info
            .account_type
            .as_deref()
            .map(normalize_account_type)
            .filter(|t| !t.is_empty()),
        statement_date,
        period_start: info.period_start,
        period_end: info.period_end,
        total_value: info.total_value,
        cash_balance: info.cash_balance,
        holdings,
        performance,
        source_path: None,
        warnings: extraction.warnings,
    })
}
