use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CibcInvestorsEdgeParser, CibcPpsParser, OlympiaParser, ScotiaBankParser, SunLifeParser};
use crate::statements::StatementParser;

/// The compiled-in statement parsers.
///
/// Configuration files refer to parsers by class name or dotted module path;
/// both resolve here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParserKind {
    SunLife,
    ScotiaBank,
    Olympia,
    CibcInvestorsEdge,
    CibcPps,
}

impl ParserKind {
    pub const ALL: [ParserKind; 5] = [
        ParserKind::SunLife,
        ParserKind::ScotiaBank,
        ParserKind::Olympia,
        ParserKind::CibcInvestorsEdge,
        ParserKind::CibcPps,
    ];

    pub fn class_name(&self) -> &'static str {
        match self {
            ParserKind::SunLife => "SunLifeParser",
            ParserKind::ScotiaBank => "ScotiaBankParser",
            ParserKind::Olympia => "OlympiaParser",
            ParserKind::CibcInvestorsEdge => "CIBCInvestorsEdgeParser",
            ParserKind::CibcPps => "CIBCPPSParser",
        }
    }

    pub fn module_path(&self) -> &'static str {
        match self {
            ParserKind::SunLife => "parsers.sunlife_parser",
            ParserKind::ScotiaBank => "parsers.scotiabank_parser",
            ParserKind::Olympia => "parsers.olympia_parser",
            ParserKind::CibcInvestorsEdge => "parsers.cibc_investorsedge_parser",
            ParserKind::CibcPps => "parsers.cibc_pps_parser",
        }
    }

    /// Resolves a configured parser reference.
    ///
    /// `class` may be a bare class name or a `module.Class` path. When a
    /// `module` is given it must agree with the class.
    pub fn from_reference(module: Option<&str>, class: &str) -> Option<ParserKind> {
        let class = class.trim();
        let (path_module, class_name) = match class.rsplit_once('.') {
            Some((module, name)) => (Some(module), name),
            None => (None, class),
        };
        let kind = Self::ALL
            .into_iter()
            .find(|kind| kind.class_name().eq_ignore_ascii_case(class_name))?;

        let module = module
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .or(path_module);
        match module {
            Some(module) if module != kind.module_path() => None,
            _ => Some(kind),
        }
    }

    /// Creates the parser this kind names.
    pub fn instantiate(&self) -> Box<dyn StatementParser> {
        match self {
            ParserKind::SunLife => Box::new(SunLifeParser::new()),
            ParserKind::ScotiaBank => Box::new(ScotiaBankParser::new()),
            ParserKind::Olympia => Box::new(OlympiaParser::new()),
            ParserKind::CibcInvestorsEdge => Box::new(CibcInvestorsEdgeParser::new()),
            ParserKind::CibcPps => Box::new(CibcPpsParser::new()),
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name())
    }
}
