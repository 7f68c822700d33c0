use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};

use foliofeed_core::classification::classify_holding;
use foliofeed_core::ingestion::{
    reclassify as reclassify_store, IngestionReport, IngestionServiceTrait,
};
use foliofeed_core::parsers::ParserKind;

use crate::config::Config;
use crate::main_lib::{build_service, load_registry, open_store};

pub fn process(
    config: &Config,
    statements_dir: Option<PathBuf>,
    parallel: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let statements_dir = statements_dir.unwrap_or_else(|| config.statements_dir.clone());
    let service = build_service(config, parallel, dry_run)?;
    if dry_run {
        tracing::info!("Dry run: statements are parsed but not saved");
    }

    let report = service
        .ingest_directory(&statements_dir)
        .with_context(|| format!("Failed to scan {}", statements_dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &IngestionReport) {
    println!("{}", "=".repeat(80));
    println!("PROCESSING SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Total files: {}", report.files_seen);
    println!("Successful: {}", report.succeeded);
    println!("Failed: {}", report.failed());
    println!(
        "Statements inserted: {}, replaced: {}",
        report.statements_inserted, report.statements_replaced
    );
    println!("Holdings persisted: {}", report.holdings_persisted);

    if !report.failures.is_empty() {
        println!("\nFailures:");
        for failure in &report.failures {
            println!(
                "  {} [{:?}] {}",
                failure.path.display(),
                failure.kind,
                failure.reason
            );
        }
    }

    if report.row_warning_count > 0 {
        println!(
            "\nRow warnings: {} (showing {})",
            report.row_warning_count,
            report.row_warning_examples.len()
        );
        for example in &report.row_warning_examples {
            println!("  {}: {}", example.path.display(), example.warning);
        }
    }

    if report.fallback_count > 0 {
        println!(
            "\nHoldings classified by the default rule: {}",
            report.fallback_count
        );
        for name in &report.fallback_names {
            println!("  {}", name);
        }
    }
    println!("{}", "=".repeat(80));
}

pub fn list_parsers(config: &Config) -> anyhow::Result<()> {
    let registry = load_registry(config)?;
    let registrations = registry.list_all();

    println!("\nConfigured Institutions:");
    println!("{}", "=".repeat(80));
    for (key, name) in registry.institutions() {
        println!("\n{} ({})", key, name);
        for registration in registrations.iter().filter(|r| r.institution_key == key) {
            println!("  Pattern: {}", registration.pattern);
            println!(
                "  Class: {} ({})",
                registration.parser,
                registration.parser.module_path()
            );
            if !registration.description.is_empty() {
                println!("  Description: {}", registration.description);
            }
        }
    }
    Ok(())
}

pub fn test_parser(config: &Config, file: &Path, parse: bool) -> anyhow::Result<()> {
    println!("\nTesting parser detection for: {}", file.display());
    println!("{}", "=".repeat(80));

    let registry = load_registry(config)?;
    match registry.resolve(file) {
        Ok(registration) => {
            println!("Found parser: {}", registration.parser);
            println!("  Module: {}", registration.parser.module_path());
            println!("  Institution: {}", registration.institution_key);
            println!("  Pattern: {}", registration.pattern);
        }
        Err(e) => {
            println!("No parser found for this file: {}", e);
            return Ok(());
        }
    }

    if parse {
        let service = build_service(config, false, true)?;
        match service.parse_file(file) {
            Ok(statement) => println!("{}", serde_json::to_string_pretty(&statement)?),
            Err(e) => println!("Parsing failed: {}", e),
        }
    }
    Ok(())
}

pub fn add_parser(
    config: &Config,
    institution: &str,
    class: &str,
    module: Option<&str>,
    pattern: &str,
    description: &str,
) -> anyhow::Result<()> {
    let kind = ParserKind::from_reference(module, class).ok_or_else(|| {
        let known: Vec<&str> = ParserKind::ALL.iter().map(|k| k.class_name()).collect();
        anyhow!(
            "Unknown parser '{}'. Known parsers: {}",
            class,
            known.join(", ")
        )
    })?;

    let mut registry = if config.institutions_file.exists() {
        load_registry(config)?
    } else {
        Default::default()
    };
    registry.register(institution, pattern, kind, description);
    registry.save(&config.institutions_file).with_context(|| {
        format!(
            "Failed to save institutions config to {}",
            config.institutions_file.display()
        )
    })?;

    println!("Added {} ({}) to {}", institution, kind, config.institutions_file.display());
    Ok(())
}

pub fn reclassify(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let report = reclassify_store(store.as_ref())?;
    println!(
        "Examined {} stored securities, updated {} holding row(s)",
        report.examined, report.changed
    );
    Ok(())
}

pub fn classify(name: &str, section: Option<&str>, json: bool) -> anyhow::Result<()> {
    let classification = classify_holding(name, section);
    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!(
            "{} -> {} / {} ({})",
            name,
            classification.asset_type,
            classification.asset_category,
            classification.rule.as_str()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> Config {
        Config {
            statements_dir: dir.join("statements"),
            institutions_file: dir.join("institutions.yaml"),
            db_path: dir.join("db").join("foliofeed.db"),
        }
    }

    #[test]
    fn test_add_parser_creates_and_extends_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        add_parser(&config, "CIBC", "CIBCPPSParser", None, "pps", "PPS statements").unwrap();
        add_parser(
            &config,
            "CIBC",
            "CIBCInvestorsEdgeParser",
            Some("parsers.cibc_investorsedge_parser"),
            "*",
            "",
        )
        .unwrap();

        let registry = load_registry(&config).unwrap();
        let parsers: Vec<ParserKind> = registry.list_all().iter().map(|r| r.parser).collect();
        assert_eq!(parsers, vec![ParserKind::CibcPps, ParserKind::CibcInvestorsEdge]);
        let resolved = registry
            .resolve(Path::new("statements/CIBC/cibc-pps-2025.pdf"))
            .unwrap();
        assert_eq!(resolved.parser, ParserKind::CibcPps);
    }

    #[test]
    fn test_add_unknown_parser_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let err = add_parser(&config, "TD", "TDParser", None, "*", "").unwrap_err();
        assert!(err.to_string().contains("Unknown parser 'TDParser'"));
        assert!(!config.institutions_file.exists());
    }

    #[test]
    fn test_dry_run_process_leaves_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(&config.statements_dir).unwrap();
        add_parser(&config, "SunLife", "SunLifeParser", None, "*", "").unwrap();

        process(&config, None, false, true, true).unwrap();
        assert!(!config.db_path.exists());
    }

    #[test]
    fn test_process_without_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        assert!(process(&config, None, false, true, false).is_err());
    }
}
