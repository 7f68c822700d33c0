use log::{debug, info};
use std::path::Path;

use super::registry_errors::{ConfigError, ResolutionError};
use super::registry_model::{
    InstitutionConfig, InstitutionsConfig, ParserEntryConfig, ParserRegistration, Pattern,
};
use crate::parsers::ParserKind;

#[derive(Debug, Clone, PartialEq)]
struct InstitutionEntry {
    key: String,
    name: String,
    registrations: Vec<ParserRegistration>,
}

/// Maps institution directories and filename patterns to parsers.
///
/// Built once before a run and then shared read-only. Institutions and the
/// registrations within each keep their configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserRegistry {
    institutions: Vec<InstitutionEntry>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the registry from an institutions YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_yaml_str(&content)?;
        info!(
            "Loaded {} parser registration(s) for {} institution(s) from {}",
            registry.list_all().len(),
            registry.institutions.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: InstitutionsConfig = serde_yaml::from_str(content)?;
        Self::from_config(config)
    }

    /// Builds the registry, resolving each `module`/`class` reference to a
    /// compiled-in parser.
    pub fn from_config(config: InstitutionsConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (key, institution) in config.institutions {
            let entry = registry.entry_mut(&key);
            if let Some(name) = institution.name.filter(|n| !n.trim().is_empty()) {
                entry.name = name;
            }
            for parser in institution.parsers {
                let kind = ParserKind::from_reference(parser.module.as_deref(), &parser.class)
                    .ok_or_else(|| ConfigError::UnknownParser {
                        institution: key.clone(),
                        reference: match &parser.module {
                            Some(module) => format!("{}.{}", module, parser.class),
                            None => parser.class.clone(),
                        },
                    })?;
                entry.registrations.push(ParserRegistration {
                    institution_key: key.clone(),
                    pattern: Pattern::parse(&parser.pattern),
                    parser: kind,
                    description: parser.description,
                });
            }
        }
        Ok(registry)
    }

    pub fn to_config(&self) -> InstitutionsConfig {
        InstitutionsConfig {
            institutions: self
                .institutions
                .iter()
                .map(|entry| {
                    let parsers = entry
                        .registrations
                        .iter()
                        .map(|reg| ParserEntryConfig {
                            pattern: reg.pattern.as_str().to_string(),
                            class: reg.parser.class_name().to_string(),
                            module: Some(reg.parser.module_path().to_string()),
                            description: reg.description.clone(),
                        })
                        .collect();
                    (
                        entry.key.clone(),
                        InstitutionConfig {
                            name: Some(entry.name.clone()),
                            parsers,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&self.to_config())?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_yaml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved institutions config to {}", path.display());
        Ok(())
    }

    /// Appends a registration, creating the institution when absent.
    ///
    /// Appending means an existing wildcard keeps shadowing the new entry;
    /// order the configuration file by hand when that matters.
    pub fn register(
        &mut self,
        institution_key: &str,
        pattern: &str,
        parser: ParserKind,
        description: &str,
    ) {
        let entry = self.entry_mut(institution_key);
        entry.registrations.push(ParserRegistration {
            institution_key: institution_key.to_string(),
            pattern: Pattern::parse(pattern),
            parser,
            description: description.to_string(),
        });
        debug!(
            "Registered {} for institution '{}' with pattern '{}'",
            parser, institution_key, pattern
        );
    }

    /// Selects the parser for a statement file.
    ///
    /// The institution is the name of the file's parent directory; within it,
    /// the first registration whose pattern matches the lower-cased filename
    /// wins. There is no fallback to other institutions.
    pub fn resolve(&self, path: &Path) -> Result<&ParserRegistration, ResolutionError> {
        let invalid = || ResolutionError::InvalidPath(path.display().to_string());
        let filename = path.file_name().and_then(|f| f.to_str()).ok_or_else(invalid)?;
        let institution = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|p| p.to_str())
            .ok_or_else(invalid)?;

        let entry = self
            .institutions
            .iter()
            .find(|entry| entry.key == institution)
            .ok_or_else(|| ResolutionError::UnknownInstitution {
                institution: institution.to_string(),
                path: path.display().to_string(),
            })?;

        let lowered = filename.to_lowercase();
        let registration = entry
            .registrations
            .iter()
            .find(|reg| reg.pattern.matches(&lowered))
            .ok_or_else(|| ResolutionError::NoMatchingPattern {
                institution: institution.to_string(),
                filename: filename.to_string(),
            })?;

        debug!(
            "Resolved {} to {} (pattern '{}')",
            path.display(),
            registration.parser,
            registration.pattern
        );
        Ok(registration)
    }

    /// Every registration, in configuration order.
    pub fn list_all(&self) -> Vec<&ParserRegistration> {
        self.institutions
            .iter()
            .flat_map(|entry| entry.registrations.iter())
            .collect()
    }

    /// `(key, display name)` of every institution, in configuration order.
    pub fn institutions(&self) -> Vec<(&str, &str)> {
        self.institutions
            .iter()
            .map(|entry| (entry.key.as_str(), entry.name.as_str()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.iter().all(|e| e.registrations.is_empty())
    }

    fn entry_mut(&mut self, key: &str) -> &mut InstitutionEntry {
        let idx = match self.institutions.iter().position(|e| e.key == key) {
            Some(idx) => idx,
            None => {
                self.institutions.push(InstitutionEntry {
                    key: key.to_string(),
                    name: key.to_string(),
                    registrations: Vec::new(),
                });
                self.institutions.len() - 1
            }
        };
        &mut self.institutions[idx]
    }
}
