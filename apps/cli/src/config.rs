use std::path::PathBuf;

pub const DEFAULT_STATEMENTS_DIR: &str = "statements";
pub const DEFAULT_INSTITUTIONS_FILE: &str = "institutions.yaml";
pub const DEFAULT_DB_PATH: &str = "./db/foliofeed.db";

/// Runtime configuration read from the environment. A `.env` file in the
/// working directory is loaded first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub statements_dir: PathBuf,
    pub institutions_file: PathBuf,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            statements_dir: path("FOLIOFEED_STATEMENTS_DIR", DEFAULT_STATEMENTS_DIR),
            institutions_file: path("FOLIOFEED_INSTITUTIONS_FILE", DEFAULT_INSTITUTIONS_FILE),
            db_path: path("FOLIOFEED_DB_PATH", DEFAULT_DB_PATH),
        }
    }

    /// Applies command line overrides.
    pub fn with_overrides(
        mut self,
        institutions_file: Option<PathBuf>,
        db_path: Option<PathBuf>,
    ) -> Self {
        if let Some(file) = institutions_file {
            self.institutions_file = file;
        }
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }
}
