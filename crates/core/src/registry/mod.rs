//! Registry module - selects the parser for a statement file.

mod parser_registry;
mod registry_errors;
mod registry_model;

#[cfg(test)]
mod registry_tests;

pub use parser_registry::ParserRegistry;
pub use registry_errors::{ConfigError, ResolutionError};
pub use registry_model::{
    InstitutionConfig, InstitutionsConfig, ParserEntryConfig, ParserRegistration, Pattern,
    WILDCARD_PATTERN,
};
