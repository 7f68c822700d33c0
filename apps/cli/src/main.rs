mod commands;
mod config;
mod main_lib;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Config;
use main_lib::init_tracing;

#[derive(Parser)]
#[command(name = "foliofeed")]
#[command(about = "Parse institution statements into classified holdings")]
#[command(version)]
struct Cli {
    /// Institutions config (overrides FOLIOFEED_INSTITUTIONS_FILE)
    #[arg(long, global = true, value_name = "FILE")]
    institutions: Option<PathBuf>,

    /// SQLite database path (overrides FOLIOFEED_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every statement under the statements directory and save it
    #[command(after_help = "\
Statements are expected under <DIR>/<Institution>/<file>.pdf, where
<Institution> is a key of the institutions config.

Examples:
  foliofeed process
  foliofeed process --statements-dir ~/statements --parallel
  foliofeed process --dry-run --json")]
    Process {
        /// Statements directory (overrides FOLIOFEED_STATEMENTS_DIR)
        #[arg(long, value_name = "DIR")]
        statements_dir: Option<PathBuf>,

        /// Parse files in parallel
        #[arg(long)]
        parallel: bool,

        /// Parse without saving to the database
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect and edit the parser registry
    Parsers {
        #[command(subcommand)]
        command: ParserCommands,
    },

    /// Re-run classification over stored holdings
    Reclassify,

    /// Classify a security name
    Classify {
        /// Security name as printed on a statement
        name: String,

        /// Statement section the holding is listed under
        #[arg(long)]
        section: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ParserCommands {
    /// List configured institutions and their parsers
    List,

    /// Show which parser handles a file
    Test {
        file: PathBuf,

        /// Also extract and parse the file, printing the statement as JSON
        #[arg(long)]
        parse: bool,
    },

    /// Register a parser for an institution and save the config
    #[command(after_help = "\
Examples:
  foliofeed parsers add SunLife SunLifeParser parsers.sunlife_parser
  foliofeed parsers add CIBC CIBCPPSParser --pattern pps --description 'PPS statements'")]
    Add {
        /// Institution key (the statements sub-directory name)
        institution: String,

        /// Parser class name or module.Class path
        class: String,

        /// Parser module
        module: Option<String>,

        /// Filename substring, or * for any file
        #[arg(long, default_value = "*")]
        pattern: String,

        #[arg(long, default_value = "")]
        description: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.institutions, cli.db);
    init_tracing();

    match cli.command {
        Commands::Process {
            statements_dir,
            parallel,
            dry_run,
            json,
        } => commands::process(&config, statements_dir, parallel, dry_run, json),
        Commands::Parsers { command } => match command {
            ParserCommands::List => commands::list_parsers(&config),
            ParserCommands::Test { file, parse } => commands::test_parser(&config, &file, parse),
            ParserCommands::Add {
                institution,
                class,
                module,
                pattern,
                description,
            } => commands::add_parser(
                &config,
                &institution,
                &class,
                module.as_deref(),
                &pattern,
                &description,
            ),
        },
        Commands::Reclassify => commands::reclassify(&config),
        Commands::Classify {
            name,
            section,
            json,
        } => commands::classify(&name, section.as_deref(), json),
    }
}
