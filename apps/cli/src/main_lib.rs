use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use foliofeed_core::ingestion::{
    InMemoryStatementStore, IngestionOptions, IngestionService, StatementStoreTrait,
};
use foliofeed_core::registry::ParserRegistry;
use foliofeed_core::statements::PdfTextExtractor;
use foliofeed_storage_sqlite::SqliteStatementStore;

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("FOLIOFEED_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn load_registry(config: &Config) -> anyhow::Result<ParserRegistry> {
    ParserRegistry::load(&config.institutions_file).with_context(|| {
        format!(
            "Failed to load institutions config from {}",
            config.institutions_file.display()
        )
    })
}

pub fn open_store(config: &Config) -> anyhow::Result<Arc<SqliteStatementStore>> {
    let store = SqliteStatementStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    tracing::info!("Database path in use: {}", config.db_path.display());
    Ok(Arc::new(store))
}

/// Wires the ingestion service. A dry run parses into memory and leaves the
/// database untouched.
pub fn build_service(
    config: &Config,
    parallel: bool,
    dry_run: bool,
) -> anyhow::Result<IngestionService> {
    let registry = Arc::new(load_registry(config)?);
    let store: Arc<dyn StatementStoreTrait> = if dry_run {
        Arc::new(InMemoryStatementStore::new())
    } else {
        open_store(config)?
    };
    Ok(
        IngestionService::new(registry, Arc::new(PdfTextExtractor::new()), store)
            .with_options(IngestionOptions { parallel }),
    )
}
