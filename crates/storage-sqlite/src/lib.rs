//! SQLite storage implementation for Foliofeed.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the `StatementStoreTrait` defined in `foliofeed-core` and contains:
//! - Database connection pooling
//! - Diesel migrations
//! - The statement repository
//! - Database-specific model types (with Diesel derives)
//!
//! ```text
//!      core (parsing, classification, ingestion)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod statements;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

pub use errors::StorageError;
pub use statements::SqliteStatementStore;

// Re-export from foliofeed-core for convenience
pub use foliofeed_core::errors::{DatabaseError, Error, Result};
