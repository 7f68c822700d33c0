//! Ingestion module - batch processing of statement files into a store.

mod ingestion_constants;
mod ingestion_model;
mod ingestion_service;
mod ingestion_traits;
mod memory_store;
mod reclassify;

#[cfg(test)]
mod ingestion_tests;

pub use ingestion_constants::{MAX_REPORT_EXAMPLES, STATEMENT_EXTENSIONS};
pub use ingestion_model::{
    FailureKind, FileFailure, IngestedStatement, IngestionOptions, IngestionReport,
    ReclassifyReport, SaveOutcome, StoredSecurity, WarningExample,
};
pub use ingestion_service::IngestionService;
pub use ingestion_traits::{IngestionServiceTrait, StatementStoreTrait};
pub use memory_store::InMemoryStatementStore;
pub use reclassify::reclassify;
