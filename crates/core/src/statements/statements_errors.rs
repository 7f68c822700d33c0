use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statement-level parse failures. Any of these makes the whole file unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Required field '{field}' could not be extracted")]
    MissingField { field: &'static str },

    #[error("Unrecognized date format: '{0}'")]
    UnrecognizedDate(String),

    #[error("Statement has no extractable text")]
    EmptyDocument,

    #[error("{0}")]
    Extraction(String),
}

/// A single holding row that could not be parsed. The row is dropped and the
/// rest of the statement is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowExtractionWarning {
    /// 1-based line number within the extracted section.
    pub line: usize,
    pub content: String,
    pub reason: String,
}

impl std::fmt::Display for RowExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} ('{}')", self.line, self.reason, self.content)
    }
}
