//! Foliofeed Core - statement parsing, classification and ingestion.
//!
//! This crate turns brokerage and plan statements into normalized, classified
//! holdings. It is storage-agnostic and defines the `StatementStoreTrait`
//! implemented by the `storage-sqlite` crate.

pub mod classification;
pub mod errors;
pub mod ingestion;
pub mod parsers;
pub mod registry;
pub mod statements;

// Re-export error types
pub use errors::DatabaseError;
pub use errors::Error;
pub use errors::Result;
