//! Tests for the ingestion pipeline, the in-memory store and reclassification.

#[cfg(test)]
mod tests {
    use crate::classification::{asset_types, AssetCategory, Classification, ClassificationRule};
    use crate::errors::{Error, Result};
    use crate::ingestion::*;
    use crate::parsers::ParserKind;
    use crate::registry::ParserRegistry;
    use crate::statements::{ParseError, StatementText, TextExtractor};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    struct FixtureExtractor {
        texts: HashMap<PathBuf, String>,
    }

    impl TextExtractor for FixtureExtractor {
        fn extract(&self, path: &Path) -> Result<StatementText> {
            self.texts
                .get(path)
                .map(|text| StatementText::from_text(text.clone()))
                .ok_or_else(|| Error::Extraction(format!("no fixture for {}", path.display())))
        }
    }

    fn statement_text(account: &str, rows: &[String], with_period: bool) -> String {
        let mut text = format!(
            "Account number: {account}\nRegistered Retirement Savings Plan (RRSP)\n"
        );
        if with_period {
            text.push_str("For the period July 1 to September 30, 2025\n");
        }
        text.push_str("My Registered Retirement Savings Plan (RRSP)\nMy investments\n");
        text.push_str("INVESTMENT NAME UNITS PRICE VALUE\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.push_str("Total investments\n");
        text
    }

    fn growth_rows(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let letter = (b'A' + i as u8) as char;
                format!("Security {letter} Growth Fund 10 $1.00 $10.00")
            })
            .collect()
    }

    fn test_registry() -> Arc<ParserRegistry> {
        let mut registry = ParserRegistry::new();
        registry.register("TestBank", "rrsp", ParserKind::SunLife, "RRSP statements");
        Arc::new(registry)
    }

    fn service_for(
        fixtures: Vec<(&str, String)>,
        store: Arc<InMemoryStatementStore>,
    ) -> IngestionService {
        let texts = fixtures
            .into_iter()
            .map(|(path, text)| (PathBuf::from(path), text))
            .collect();
        IngestionService::new(test_registry(), Arc::new(FixtureExtractor { texts }), store)
    }

    const RRSP_PATH: &str = "statements/TestBank/TestBank-RRSP-2025-09.pdf";

    #[test]
    fn test_end_to_end_statement_is_persisted() {
        let store = Arc::new(InMemoryStatementStore::new());
        let mut rows = growth_rows(2);
        rows.push("Apple Inc 5 $200.00 $1,000.00".to_string());
        let service = service_for(
            vec![(RRSP_PATH, statement_text("555", &rows, true))],
            store.clone(),
        );

        let ingested = service.ingest_file(Path::new(RRSP_PATH)).unwrap();
        assert_eq!(ingested.outcome, SaveOutcome::Inserted);
        assert_eq!(ingested.institution, "SunLife");
        assert_eq!(ingested.account_number, "555");
        assert_eq!(ingested.statement_date, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
        assert_eq!(ingested.holdings, 3);
        assert_eq!(ingested.fallback_names, vec!["Apple Inc".to_string()]);

        let stored = store.statements().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].source_path.as_deref(), Some(Path::new(RRSP_PATH)));
        let apple = &stored[0].holdings[2];
        assert_eq!(apple.asset_type, asset_types::STOCK);
        assert_eq!(apple.asset_category, AssetCategory::Equity);
    }

    #[test]
    fn test_malformed_row_is_skipped_with_warning() {
        let store = Arc::new(InMemoryStatementStore::new());
        let mut rows = growth_rows(10);
        rows.insert(4, "Broken Fund 12 abc".to_string());
        let service = service_for(vec![(RRSP_PATH, statement_text("555", &rows, true))], store);

        let ingested = service.ingest_file(Path::new(RRSP_PATH)).unwrap();
        assert_eq!(ingested.holdings, 10);
        assert_eq!(ingested.warnings.len(), 1);
        assert_eq!(ingested.warnings[0].content, "Broken Fund 12 abc");
        assert_eq!(ingested.warnings[0].line, 5);
    }

    #[test]
    fn test_missing_statement_date_is_parse_error() {
        let store = Arc::new(InMemoryStatementStore::new());
        let service = service_for(
            vec![(RRSP_PATH, statement_text("555", &growth_rows(1), false))],
            store.clone(),
        );

        let err = service.ingest_file(Path::new(RRSP_PATH)).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::MissingField {
                field: "statement_date"
            })
        ));
        assert_eq!(store.statement_count().unwrap(), 0);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let store = Arc::new(InMemoryStatementStore::new());
        let undated = "statements/TestBank/TestBank-RRSP-undated.pdf";
        let unknown = "statements/Unknown/unknown-rrsp.pdf";
        let unmatched = "statements/TestBank/TestBank-TFSA-2025.pdf";
        let service = service_for(
            vec![
                (RRSP_PATH, statement_text("555", &growth_rows(3), true)),
                (undated, statement_text("555", &growth_rows(3), false)),
            ],
            store.clone(),
        );

        let paths: Vec<PathBuf> = [unknown, RRSP_PATH, undated, unmatched]
            .iter()
            .map(PathBuf::from)
            .collect();
        let report = service.ingest_all(&paths);

        assert_eq!(report.files_seen, 4);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.holdings_persisted, 3);
        let kinds: Vec<FailureKind> = report.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FailureKind::Resolution, FailureKind::Parse, FailureKind::Resolution]
        );
        assert_eq!(report.failures[0].path, PathBuf::from(unknown));
        assert_eq!(store.statement_count().unwrap(), 1);
    }

    #[test]
    fn test_reingesting_replaces_statement() {
        let store = Arc::new(InMemoryStatementStore::new());
        let service = service_for(
            vec![(RRSP_PATH, statement_text("555", &growth_rows(2), true))],
            store.clone(),
        );
        let paths = vec![PathBuf::from(RRSP_PATH), PathBuf::from(RRSP_PATH)];

        let report = service.ingest_all(&paths);
        assert_eq!(report.statements_inserted, 1);
        assert_eq!(report.statements_replaced, 1);
        assert_eq!(store.statement_count().unwrap(), 1);
        assert_eq!(store.statements().unwrap()[0].holdings.len(), 2);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let fixtures = || {
            vec![
                ("statements/TestBank/a-rrsp.pdf", statement_text("1", &growth_rows(2), true)),
                ("statements/TestBank/b-rrsp.pdf", statement_text("2", &growth_rows(4), true)),
                ("statements/TestBank/c-rrsp.pdf", statement_text("3", &growth_rows(1), false)),
            ]
        };
        let paths: Vec<PathBuf> = fixtures().iter().map(|(p, _)| PathBuf::from(p)).collect();

        let sequential_store = Arc::new(InMemoryStatementStore::new());
        let sequential = service_for(fixtures(), sequential_store.clone()).ingest_all(&paths);

        let parallel_store = Arc::new(InMemoryStatementStore::new());
        let parallel = service_for(fixtures(), parallel_store.clone())
            .with_options(IngestionOptions { parallel: true })
            .ingest_all(&paths);

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.succeeded, 2);
        assert_eq!(
            parallel_store.statements().unwrap(),
            sequential_store.statements().unwrap()
        );
    }

    #[test]
    fn test_report_limits_examples_but_counts_all() {
        let mut report = IngestionReport::default();
        let ingested = IngestedStatement {
            path: PathBuf::from(RRSP_PATH),
            institution: "SunLife".to_string(),
            account_number: "555".to_string(),
            statement_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            holdings: 20,
            outcome: SaveOutcome::Inserted,
            warnings: (0..15)
                .map(|i| crate::statements::RowExtractionWarning {
                    line: i,
                    content: format!("row {i}"),
                    reason: "bad".to_string(),
                })
                .collect(),
            fallback_names: (0..12).map(|i| format!("Name {}", i % 6)).collect(),
        };
        report.record_success(&ingested);

        assert_eq!(report.row_warning_count, 15);
        assert_eq!(report.row_warning_examples.len(), MAX_REPORT_EXAMPLES);
        assert_eq!(report.fallback_count, 12);
        assert_eq!(report.fallback_names.len(), 6);
    }

    #[test]
    fn test_discover_statements_walks_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("CIBC");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b.pdf"), b"").unwrap();
        std::fs::write(nested.join("a.PDF"), b"").unwrap();
        std::fs::write(dir.path().join("notes.csv"), b"").unwrap();
        std::fs::write(dir.path().join("fixture.txt"), b"").unwrap();

        let service = service_for(vec![], Arc::new(InMemoryStatementStore::new()));
        let found = service.discover_statements(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![
                nested.join("a.PDF"),
                nested.join("b.pdf"),
                dir.path().join("fixture.txt"),
            ]
        );
    }

    #[test]
    fn test_reclassify_updates_stale_rows_once() {
        let store = Arc::new(InMemoryStatementStore::new());
        let mut rows = growth_rows(1);
        rows.push("EQUITABLE BANK 1 $5,000.00 $5,000.00".to_string());
        let service = service_for(
            vec![(RRSP_PATH, statement_text("555", &rows, true))],
            store.clone(),
        );
        service.ingest_file(Path::new(RRSP_PATH)).unwrap();

        // Simulate a row stored under older rules.
        let stale = store
            .stored_securities()
            .unwrap()
            .into_iter()
            .find(|s| s.security_name == "EQUITABLE BANK")
            .unwrap();
        store
            .update_classification(
                &stale,
                &Classification::new(
                    asset_types::STOCK,
                    AssetCategory::Equity,
                    ClassificationRule::Default,
                ),
            )
            .unwrap();

        let first = reclassify(store.as_ref()).unwrap();
        assert_eq!(first.examined, 2);
        assert_eq!(first.changed, 1);

        let holdings = &store.statements().unwrap()[0].holdings;
        assert_eq!(holdings[1].asset_type, asset_types::GIC);
        assert_eq!(holdings[1].asset_category, AssetCategory::FixedIncome);

        let second = reclassify(store.as_ref()).unwrap();
        assert_eq!(second.changed, 0);
    }

    #[test]
    fn test_reclassify_counts_each_row_once() {
        let store = Arc::new(InMemoryStatementStore::new());
        let rows = vec![
            "EQUITABLE BANK 1 $5,000.00 $5,000.00".to_string(),
            "EQUITABLE BANK 2 $1,000.00 $2,000.00".to_string(),
        ];
        let service = service_for(
            vec![(RRSP_PATH, statement_text("555", &rows, true))],
            store.clone(),
        );
        service.ingest_file(Path::new(RRSP_PATH)).unwrap();

        // Two copies of the same security stored under different old rules.
        let mut statement = store.statements().unwrap().remove(0);
        statement.holdings[0].apply_classification(Classification::new(
            asset_types::STOCK,
            AssetCategory::Equity,
            ClassificationRule::Default,
        ));
        statement.holdings[1].apply_classification(Classification::new(
            asset_types::MUTUAL_FUND_EQUITY,
            AssetCategory::Equity,
            ClassificationRule::EquityFund,
        ));
        assert_eq!(store.save_statement(&statement).unwrap(), SaveOutcome::Replaced);

        let report = reclassify(store.as_ref()).unwrap();
        assert_eq!(report.examined, 2);
        assert_eq!(report.changed, 2);
        assert!(report.changed <= report.examined);

        let holdings = &store.statements().unwrap()[0].holdings;
        assert!(holdings.iter().all(|h| h.asset_type == asset_types::GIC));
        assert_eq!(reclassify(store.as_ref()).unwrap().changed, 0);
    }

    #[test]
    fn test_reclassify_skips_rows_already_current() {
        let store = Arc::new(InMemoryStatementStore::new());
        let rows = vec![
            "EQUITABLE BANK 1 $5,000.00 $5,000.00".to_string(),
            "EQUITABLE BANK 2 $1,000.00 $2,000.00".to_string(),
        ];
        let service = service_for(
            vec![(RRSP_PATH, statement_text("555", &rows, true))],
            store.clone(),
        );
        service.ingest_file(Path::new(RRSP_PATH)).unwrap();

        let mut statement = store.statements().unwrap().remove(0);
        statement.holdings[1].apply_classification(Classification::new(
            asset_types::STOCK,
            AssetCategory::Equity,
            ClassificationRule::Default,
        ));
        store.save_statement(&statement).unwrap();

        let report = reclassify(store.as_ref()).unwrap();
        assert_eq!(report.examined, 2);
        assert_eq!(report.changed, 1);
    }
}
