use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ingestion_constants::MAX_REPORT_EXAMPLES;
use crate::classification::AssetCategory;
use crate::errors::Error;
use crate::statements::{ParsedStatement, RowExtractionWarning};

/// Whether saving a statement created it or replaced an earlier copy of the
/// same (institution, account number, statement date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveOutcome {
    Inserted,
    Replaced,
}

/// A distinct classified security as stored, with the section hint it was
/// classified under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSecurity {
    pub security_name: String,
    pub section: Option<String>,
    pub asset_type: String,
    pub asset_category: AssetCategory,
}

/// Options for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionOptions {
    /// Parse files on the rayon pool. Persistence stays sequential.
    pub parallel: bool,
}

/// Result of ingesting one statement file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedStatement {
    pub path: PathBuf,
    pub institution: String,
    pub account_number: String,
    pub statement_date: NaiveDate,
    pub holdings: usize,
    pub outcome: SaveOutcome,
    pub warnings: Vec<RowExtractionWarning>,
    /// Names that only matched the default classification rule.
    pub fallback_names: Vec<String>,
}

impl IngestedStatement {
    pub fn new(path: &Path, statement: &ParsedStatement, outcome: SaveOutcome) -> Self {
        Self {
            path: path.to_path_buf(),
            institution: statement.institution.clone(),
            account_number: statement.account_number.clone(),
            statement_date: statement.statement_date,
            holdings: statement.holdings.len(),
            outcome,
            warnings: statement.warnings.clone(),
            fallback_names: statement
                .fallback_holdings()
                .map(|h| h.security_name.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    Resolution,
    Parse,
    Extraction,
    Storage,
    Config,
}

impl From<&Error> for FailureKind {
    fn from(error: &Error) -> Self {
        match error {
            Error::Resolution(_) => FailureKind::Resolution,
            Error::Parse(_) => FailureKind::Parse,
            Error::Extraction(_) | Error::Io(_) => FailureKind::Extraction,
            Error::Database(_) => FailureKind::Storage,
            Error::Config(_) => FailureKind::Config,
        }
    }
}

/// A file that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub reason: String,
}

/// A row warning together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningExample {
    pub path: PathBuf,
    pub warning: RowExtractionWarning,
}

/// Aggregate outcome of a batch run.
///
/// Row warnings and classification fallbacks are counted in full but only
/// the first few examples are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub files_seen: usize,
    pub succeeded: usize,
    pub statements_inserted: usize,
    pub statements_replaced: usize,
    pub holdings_persisted: usize,
    pub failures: Vec<FileFailure>,
    pub row_warning_count: usize,
    pub row_warning_examples: Vec<WarningExample>,
    pub fallback_count: usize,
    /// Distinct fallback names, first seen first.
    pub fallback_names: Vec<String>,
}

impl IngestionReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn record_success(&mut self, ingested: &IngestedStatement) {
        self.succeeded += 1;
        self.holdings_persisted += ingested.holdings;
        match ingested.outcome {
            SaveOutcome::Inserted => self.statements_inserted += 1,
            SaveOutcome::Replaced => self.statements_replaced += 1,
        }

        self.row_warning_count += ingested.warnings.len();
        for warning in &ingested.warnings {
            if self.row_warning_examples.len() >= MAX_REPORT_EXAMPLES {
                break;
            }
            self.row_warning_examples.push(WarningExample {
                path: ingested.path.clone(),
                warning: warning.clone(),
            });
        }

        self.fallback_count += ingested.fallback_names.len();
        for name in &ingested.fallback_names {
            if self.fallback_names.len() >= MAX_REPORT_EXAMPLES {
                break;
            }
            if !self.fallback_names.contains(name) {
                self.fallback_names.push(name.clone());
            }
        }
    }

    pub fn record_failure(&mut self, path: &Path, error: &Error) {
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            kind: FailureKind::from(error),
            reason: error.to_string(),
        });
    }
}

/// Outcome of re-running classification over stored holdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclassifyReport {
    /// Distinct stored securities examined.
    pub examined: usize,
    /// Holding rows whose classification changed.
    pub changed: usize,
}
