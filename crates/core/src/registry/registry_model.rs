use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::parsers::ParserKind;

/// Pattern that matches any filename.
pub const WILDCARD_PATTERN: &str = "*";

/// Root of the institutions YAML file.
///
/// Institutions keep the order in which they appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionsConfig {
    #[serde(default, with = "ordered_institutions")]
    pub institutions: Vec<(String, InstitutionConfig)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub parsers: Vec<ParserEntryConfig>,
}

/// One `parsers` entry. Entries are tried in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserEntryConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub description: String,
}

fn default_pattern() -> String {
    WILDCARD_PATTERN.to_string()
}

/// Filename pattern of a registration: the wildcard, or a case-insensitive
/// substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Wildcard,
    Contains { raw: String, needle: String },
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == WILDCARD_PATTERN {
            Pattern::Wildcard
        } else {
            Pattern::Contains {
                raw: trimmed.to_string(),
                needle: trimmed.to_lowercase(),
            }
        }
    }

    /// `filename` is expected to be lower-cased by the caller.
    pub fn matches(&self, filename: &str) -> bool {
        match self {
            Pattern::Wildcard => true,
            Pattern::Contains { needle, .. } => filename.contains(needle.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Wildcard => WILDCARD_PATTERN,
            Pattern::Contains { raw, .. } => raw,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved registry entry: institution + filename pattern → parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserRegistration {
    pub institution_key: String,
    pub pattern: Pattern,
    pub parser: ParserKind,
    pub description: String,
}

mod ordered_institutions {
    use super::*;

    pub fn serialize<S>(
        institutions: &[(String, InstitutionConfig)],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(institutions.iter().map(|(key, config)| (key, config)))
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Vec<(String, InstitutionConfig)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OrderedInstitutionsVisitor)
    }

    struct OrderedInstitutionsVisitor;

    impl<'de> Visitor<'de> for OrderedInstitutionsVisitor {
        type Value = Vec<(String, InstitutionConfig)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of institution keys to institution configs")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut institutions = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, config)) = map.next_entry::<String, InstitutionConfig>()? {
                institutions.push((key, config));
            }
            Ok(institutions)
        }
    }
}
