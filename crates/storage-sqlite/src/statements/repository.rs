use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::path::Path;
use std::sync::Arc;

use foliofeed_core::classification::Classification;
use foliofeed_core::ingestion::{SaveOutcome, StatementStoreTrait, StoredSecurity};
use foliofeed_core::statements::ParsedStatement;
use foliofeed_core::{Error, Result};

use super::model::{parse_category, HoldingDB, NewHoldingDB, NewStatementDB, StatementDB};
use crate::db::{create_pool, get_connection, init, run_migrations, DbPool};
use crate::errors::StorageError;
use crate::schema::{holdings, statements};

/// Statement store backed by SQLite.
///
/// Statements are unique on (institution, account number, statement date).
/// Saving an existing statement replaces its row and all of its holdings in
/// one transaction.
pub struct SqliteStatementStore {
    pool: Arc<DbPool>,
}

impl SqliteStatementStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `path` and applies pending
    /// migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db_url = init(path.as_ref())?;
        let pool = create_pool(&db_url)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    /// All stored statements with their holdings, ordered by institution,
    /// account number and statement date.
    pub fn load_statements(&self) -> Result<Vec<ParsedStatement>> {
        let mut conn = get_connection(&self.pool)?;
        let statement_rows = statements::table
            .order((
                statements::institution,
                statements::account_number,
                statements::statement_date,
            ))
            .select(StatementDB::as_select())
            .load::<StatementDB>(&mut conn)
            .map_err(StorageError::from)?;
        let holding_rows = HoldingDB::belonging_to(&statement_rows)
            .order((holdings::statement_id, holdings::position))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?;

        let grouped = holding_rows.grouped_by(&statement_rows);
        statement_rows
            .into_iter()
            .zip(grouped)
            .map(|(statement, holdings)| statement.into_domain(holdings).map_err(Error::from))
            .collect()
    }
}

impl StatementStoreTrait for SqliteStatementStore {
    fn save_statement(&self, statement: &ParsedStatement) -> Result<SaveOutcome> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().to_rfc3339();
        let mut row = NewStatementDB::from_domain(statement, &now)?;

        let outcome = conn.transaction::<_, StorageError, _>(|conn| {
            let existing = statements::table
                .filter(statements::institution.eq(&row.institution))
                .filter(statements::account_number.eq(&row.account_number))
                .filter(statements::statement_date.eq(&row.statement_date))
                .select((statements::id, statements::created_at))
                .first::<(i32, String)>(conn)
                .optional()?;

            let (statement_id, outcome) = match existing {
                Some((existing_id, created_at)) => {
                    row.created_at = created_at;
                    diesel::delete(holdings::table.filter(holdings::statement_id.eq(existing_id)))
                        .execute(conn)?;
                    diesel::update(statements::table.find(existing_id))
                        .set(&row)
                        .execute(conn)?;
                    (existing_id, SaveOutcome::Replaced)
                }
                None => {
                    let new_id = diesel::insert_into(statements::table)
                        .values(&row)
                        .returning(statements::id)
                        .get_result::<i32>(conn)?;
                    (new_id, SaveOutcome::Inserted)
                }
            };

            let new_holdings: Vec<NewHoldingDB> = statement
                .holdings
                .iter()
                .enumerate()
                .map(|(position, holding)| {
                    NewHoldingDB::from_domain(statement_id, position, holding)
                })
                .collect();
            if !new_holdings.is_empty() {
                diesel::insert_into(holdings::table)
                    .values(&new_holdings)
                    .execute(conn)?;
            }
            Ok(outcome)
        })?;

        debug!(
            "{:?} statement {} / {} / {} with {} holdings",
            outcome,
            statement.institution,
            statement.account_number,
            statement.statement_date,
            statement.holdings.len()
        );
        Ok(outcome)
    }

    fn stored_securities(&self) -> Result<Vec<StoredSecurity>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = holdings::table
            .select((
                holdings::security_name,
                holdings::section,
                holdings::asset_type,
                holdings::asset_category,
            ))
            .distinct()
            .order((
                holdings::security_name,
                holdings::section,
                holdings::asset_type,
                holdings::asset_category,
            ))
            .load::<(String, Option<String>, String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|(security_name, section, asset_type, asset_category)| {
                Ok(StoredSecurity {
                    security_name,
                    section,
                    asset_type,
                    asset_category: parse_category(&asset_category)?,
                })
            })
            .collect()
    }

    fn update_classification(
        &self,
        security: &StoredSecurity,
        classification: &Classification,
    ) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let changes = (
            holdings::asset_type.eq(&classification.asset_type),
            holdings::asset_category.eq(classification.asset_category.as_str()),
            holdings::classified_by.eq(classification.rule.as_str()),
        );
        let by_name = holdings::table
            .filter(holdings::security_name.eq(&security.security_name))
            .filter(
                holdings::asset_type
                    .ne(&classification.asset_type)
                    .or(holdings::asset_category.ne(classification.asset_category.as_str())),
            );

        let updated = match &security.section {
            Some(section) => diesel::update(by_name.filter(holdings::section.eq(section)))
                .set(changes)
                .execute(&mut conn),
            None => diesel::update(by_name.filter(holdings::section.is_null()))
                .set(changes)
                .execute(&mut conn),
        }
        .map_err(StorageError::from)?;
        Ok(updated)
    }

    fn statement_count(&self) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let count = statements::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }
}
