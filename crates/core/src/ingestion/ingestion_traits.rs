use std::path::{Path, PathBuf};

use super::ingestion_model::{IngestedStatement, IngestionReport, SaveOutcome, StoredSecurity};
use crate::classification::Classification;
use crate::errors::Result;
use crate::statements::ParsedStatement;

/// Trait defining the contract for statement persistence.
///
/// A statement is identified by (institution, account number, statement
/// date). Saving the same statement twice replaces the first copy and its
/// holdings.
pub trait StatementStoreTrait: Send + Sync {
    fn save_statement(&self, statement: &ParsedStatement) -> Result<SaveOutcome>;

    /// Distinct (name, section, classification) combinations of stored holdings.
    fn stored_securities(&self) -> Result<Vec<StoredSecurity>>;

    /// Updates the classification of holdings matching `security`'s name and
    /// section whose asset type or category differs from `classification`.
    /// Returns the number of rows changed.
    fn update_classification(
        &self,
        security: &StoredSecurity,
        classification: &Classification,
    ) -> Result<usize>;

    fn statement_count(&self) -> Result<usize>;
}

/// Trait defining the contract for the statement ingestion pipeline.
pub trait IngestionServiceTrait: Send + Sync {
    /// Statement files below `root`, sorted.
    fn discover_statements(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Resolves, extracts and parses a file without persisting it.
    fn parse_file(&self, path: &Path) -> Result<ParsedStatement>;

    fn ingest_file(&self, path: &Path) -> Result<IngestedStatement>;

    /// Ingests every file, recording failures instead of stopping.
    fn ingest_all(&self, paths: &[PathBuf]) -> IngestionReport;

    fn ingest_directory(&self, root: &Path) -> Result<IngestionReport>;
}
