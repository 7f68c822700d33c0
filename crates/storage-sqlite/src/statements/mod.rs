//! SQLite storage implementation for parsed statements.

mod model;
mod repository;

pub use model::{HoldingDB, NewHoldingDB, NewStatementDB, StatementDB};
pub use repository::SqliteStatementStore;
