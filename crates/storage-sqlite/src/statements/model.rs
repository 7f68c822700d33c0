//! Database models for statements and their holdings.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use foliofeed_core::classification::{AssetCategory, ClassificationRule};
use foliofeed_core::statements::{HoldingRecord, ParsedStatement};

use crate::errors::StorageError;

/// Dates are stored as ISO-8601 text so they sort correctly.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for statements
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::statements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatementDB {
    pub id: i32,
    pub institution: String,
    pub account_number: String,
    pub account_type: Option<String>,
    pub statement_date: String,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub total_value: Option<String>,
    pub cash_balance: Option<String>,
    pub performance: Option<String>,
    pub source_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for inserting or replacing a statement
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::statements)]
#[diesel(treat_none_as_null = true)]
pub struct NewStatementDB {
    pub institution: String,
    pub account_number: String,
    pub account_type: Option<String>,
    pub statement_date: String,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub total_value: Option<String>,
    pub cash_balance: Option<String>,
    pub performance: Option<String>,
    pub source_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for holdings
#[derive(Queryable, Identifiable, Associations, Selectable, PartialEq, Debug, Clone)]
#[diesel(belongs_to(StatementDB, foreign_key = statement_id))]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: i32,
    pub statement_id: i32,
    pub position: i32,
    pub symbol: Option<String>,
    pub security_name: String,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub book_value: Option<String>,
    pub market_value: Option<String>,
    pub asset_type: String,
    pub asset_category: String,
    pub currency: String,
    pub section: Option<String>,
    pub classified_by: String,
}

/// Database model for inserting a holding
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
pub struct NewHoldingDB {
    pub statement_id: i32,
    pub position: i32,
    pub symbol: Option<String>,
    pub security_name: String,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub book_value: Option<String>,
    pub market_value: Option<String>,
    pub asset_type: String,
    pub asset_category: String,
    pub currency: String,
    pub section: Option<String>,
    pub classified_by: String,
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_decimal(value: Option<Decimal>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::SerializationError(format!("invalid date '{}': {}", value, e)))
}

fn parse_decimal(value: Option<String>) -> Result<Option<Decimal>, StorageError> {
    value
        .map(|v| {
            Decimal::from_str(&v).map_err(|e| {
                StorageError::SerializationError(format!("invalid decimal '{}': {}", v, e))
            })
        })
        .transpose()
}

impl NewStatementDB {
    pub fn from_domain(statement: &ParsedStatement, now: &str) -> Result<Self, StorageError> {
        // Figures are kept as decimal strings inside the JSON object.
        let performance = if statement.performance.is_empty() {
            None
        } else {
            let figures: BTreeMap<&str, String> = statement
                .performance
                .iter()
                .map(|(period, value)| (period.as_str(), value.to_string()))
                .collect();
            Some(serde_json::to_string(&figures)?)
        };
        Ok(Self {
            institution: statement.institution.clone(),
            account_number: statement.account_number.clone(),
            account_type: statement.account_type.clone(),
            statement_date: format_date(statement.statement_date),
            period_start: statement.period_start.map(format_date),
            period_end: statement.period_end.map(format_date),
            total_value: format_decimal(statement.total_value),
            cash_balance: format_decimal(statement.cash_balance),
            performance,
            source_path: statement
                .source_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }
}

impl NewHoldingDB {
    pub fn from_domain(statement_id: i32, position: usize, holding: &HoldingRecord) -> Self {
        Self {
            statement_id,
            position: position as i32,
            symbol: holding.symbol.clone(),
            security_name: holding.security_name.clone(),
            quantity: format_decimal(holding.quantity),
            price: format_decimal(holding.price),
            book_value: format_decimal(holding.book_value),
            market_value: format_decimal(holding.market_value),
            asset_type: holding.asset_type.clone(),
            asset_category: holding.asset_category.as_str().to_string(),
            currency: holding.currency.clone(),
            section: holding.section.clone(),
            classified_by: holding.classified_by.as_str().to_string(),
        }
    }
}

pub(crate) fn parse_category(value: &str) -> Result<AssetCategory, StorageError> {
    AssetCategory::parse(value).ok_or_else(|| {
        StorageError::SerializationError(format!("unknown asset category '{}'", value))
    })
}

impl TryFrom<HoldingDB> for HoldingRecord {
    type Error = StorageError;

    fn try_from(db: HoldingDB) -> Result<Self, Self::Error> {
        let classified_by = ClassificationRule::parse(&db.classified_by).ok_or_else(|| {
            StorageError::SerializationError(format!(
                "unknown classification rule '{}'",
                db.classified_by
            ))
        })?;
        Ok(Self {
            symbol: db.symbol,
            security_name: db.security_name,
            quantity: parse_decimal(db.quantity)?,
            price: parse_decimal(db.price)?,
            book_value: parse_decimal(db.book_value)?,
            market_value: parse_decimal(db.market_value)?,
            asset_type: db.asset_type,
            asset_category: parse_category(&db.asset_category)?,
            currency: db.currency,
            section: db.section,
            classified_by,
        })
    }
}

impl StatementDB {
    /// Rebuilds the domain statement. `holdings` must already be in position
    /// order.
    pub fn into_domain(self, holdings: Vec<HoldingDB>) -> Result<ParsedStatement, StorageError> {
        let mut performance = BTreeMap::new();
        if let Some(json) = self.performance {
            let figures: BTreeMap<String, String> = serde_json::from_str(&json)?;
            for (period, value) in figures {
                if let Some(value) = parse_decimal(Some(value))? {
                    performance.insert(period, value);
                }
            }
        }
        Ok(ParsedStatement {
            institution: self.institution,
            account_number: self.account_number,
            account_type: self.account_type,
            statement_date: parse_date(&self.statement_date)?,
            period_start: self.period_start.as_deref().map(parse_date).transpose()?,
            period_end: self.period_end.as_deref().map(parse_date).transpose()?,
            total_value: parse_decimal(self.total_value)?,
            cash_balance: parse_decimal(self.cash_balance)?,
            holdings: holdings
                .into_iter()
                .map(HoldingRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            performance,
            source_path: self.source_path.map(PathBuf::from),
            warnings: Vec::new(),
        })
    }
}
