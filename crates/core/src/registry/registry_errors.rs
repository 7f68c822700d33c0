use thiserror::Error;

/// Why no parser could be selected for a file. The file is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Cannot determine institution and filename from path '{0}'")]
    InvalidPath(String),

    #[error("No institution '{institution}' is configured (from '{path}')")]
    UnknownInstitution { institution: String, path: String },

    #[error("No parser pattern of institution '{institution}' matches '{filename}'")]
    NoMatchingPattern {
        institution: String,
        filename: String,
    },
}

/// Failures loading or saving the institutions configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access institutions config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid institutions config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Institution '{institution}' references unknown parser '{reference}'")]
    UnknownParser {
        institution: String,
        reference: String,
    },
}
