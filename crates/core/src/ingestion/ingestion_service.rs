use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ingestion_constants::STATEMENT_EXTENSIONS;
use super::ingestion_model::{IngestedStatement, IngestionOptions, IngestionReport};
use super::ingestion_traits::{IngestionServiceTrait, StatementStoreTrait};
use crate::errors::Result;
use crate::registry::ParserRegistry;
use crate::statements::{ParsedStatement, TextExtractor};

/// Runs statement files through resolution, extraction, parsing and storage.
pub struct IngestionService {
    registry: Arc<ParserRegistry>,
    extractor: Arc<dyn TextExtractor>,
    store: Arc<dyn StatementStoreTrait>,
    options: IngestionOptions,
}

impl IngestionService {
    pub fn new(
        registry: Arc<ParserRegistry>,
        extractor: Arc<dyn TextExtractor>,
        store: Arc<dyn StatementStoreTrait>,
    ) -> Self {
        Self {
            registry,
            extractor,
            store,
            options: IngestionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: IngestionOptions) -> Self {
        self.options = options;
        self
    }

    fn persist(&self, path: &Path, statement: &ParsedStatement) -> Result<IngestedStatement> {
        let outcome = self.store.save_statement(statement)?;
        let ingested = IngestedStatement::new(path, statement, outcome);
        info!(
            "{:?} {} statement {} for {} ({} holdings, {} row warnings)",
            ingested.outcome,
            ingested.institution,
            ingested.statement_date,
            ingested.account_number,
            ingested.holdings,
            ingested.warnings.len()
        );
        Ok(ingested)
    }

    fn record(report: &mut IngestionReport, path: &Path, result: Result<IngestedStatement>) {
        match result {
            Ok(ingested) => report.record_success(&ingested),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.record_failure(path, &e);
            }
        }
    }
}

fn collect_statement_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_statement_files(&path, files)?;
        } else if is_statement_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_statement_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            STATEMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

impl IngestionServiceTrait for IngestionService {
    fn discover_statements(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        collect_statement_files(root, &mut files)?;
        files.sort();
        debug!("Found {} statement file(s) under {}", files.len(), root.display());
        Ok(files)
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedStatement> {
        let registration = self.registry.resolve(path)?;
        debug!(
            "Parsing {} with {} (pattern '{}')",
            path.display(),
            registration.parser,
            registration.pattern
        );
        let text = self.extractor.extract(path)?;
        let parser = registration.parser.instantiate();
        let mut statement = parser.parse(&text)?;
        statement.source_path = Some(path.to_path_buf());
        Ok(statement)
    }

    fn ingest_file(&self, path: &Path) -> Result<IngestedStatement> {
        let statement = self.parse_file(path)?;
        self.persist(path, &statement)
    }

    fn ingest_all(&self, paths: &[PathBuf]) -> IngestionReport {
        let mut report = IngestionReport {
            files_seen: paths.len(),
            ..Default::default()
        };

        if self.options.parallel {
            let parsed: Vec<(&PathBuf, Result<ParsedStatement>)> = paths
                .par_iter()
                .map(|path| (path, self.parse_file(path)))
                .collect();
            for (path, result) in parsed {
                let result = result.and_then(|statement| self.persist(path, &statement));
                Self::record(&mut report, path, result);
            }
        } else {
            for path in paths {
                Self::record(&mut report, path, self.ingest_file(path));
            }
        }

        info!(
            "Processed {} file(s): {} ok, {} failed, {} holdings, {} row warnings, {} fallbacks",
            report.files_seen,
            report.succeeded,
            report.failed(),
            report.holdings_persisted,
            report.row_warning_count,
            report.fallback_count
        );
        report
    }

    fn ingest_directory(&self, root: &Path) -> Result<IngestionReport> {
        let paths = self.discover_statements(root)?;
        Ok(self.ingest_all(&paths))
    }
}
