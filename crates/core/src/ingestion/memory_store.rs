use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use super::ingestion_model::{SaveOutcome, StoredSecurity};
use super::ingestion_traits::StatementStoreTrait;
use crate::classification::Classification;
use crate::errors::{DatabaseError, Result};
use crate::statements::ParsedStatement;

type StatementKey = (String, String, NaiveDate);

/// Statement store kept in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryStatementStore {
    statements: RwLock<BTreeMap<StatementKey, ParsedStatement>>,
}

impl InMemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored statements ordered by key.
    pub fn statements(&self) -> Result<Vec<ParsedStatement>> {
        let guard = self.statements.read().map_err(lock_poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

fn lock_poisoned<T>(_: T) -> DatabaseError {
    DatabaseError::Internal("statement store lock poisoned".to_string())
}

impl StatementStoreTrait for InMemoryStatementStore {
    fn save_statement(&self, statement: &ParsedStatement) -> Result<SaveOutcome> {
        let key = (
            statement.institution.clone(),
            statement.account_number.clone(),
            statement.statement_date,
        );
        let mut guard = self.statements.write().map_err(lock_poisoned)?;
        Ok(match guard.insert(key, statement.clone()) {
            Some(_) => SaveOutcome::Replaced,
            None => SaveOutcome::Inserted,
        })
    }

    fn stored_securities(&self) -> Result<Vec<StoredSecurity>> {
        let guard = self.statements.read().map_err(lock_poisoned)?;
        let distinct: BTreeSet<_> = guard
            .values()
            .flat_map(|s| s.holdings.iter())
            .map(|h| {
                (
                    h.security_name.clone(),
                    h.section.clone(),
                    h.asset_type.clone(),
                    h.asset_category,
                )
            })
            .collect();
        Ok(distinct
            .into_iter()
            .map(|(security_name, section, asset_type, asset_category)| StoredSecurity {
                security_name,
                section,
                asset_type,
                asset_category,
            })
            .collect())
    }

    fn update_classification(
        &self,
        security: &StoredSecurity,
        classification: &Classification,
    ) -> Result<usize> {
        let mut guard = self.statements.write().map_err(lock_poisoned)?;
        let mut updated = 0;
        for holding in guard.values_mut().flat_map(|s| s.holdings.iter_mut()) {
            let matches = holding.security_name == security.security_name
                && holding.section == security.section;
            let differs = holding.asset_type != classification.asset_type
                || holding.asset_category != classification.asset_category;
            if matches && differs {
                holding.apply_classification(classification.clone());
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn statement_count(&self) -> Result<usize> {
        Ok(self.statements.read().map_err(lock_poisoned)?.len())
    }
}
