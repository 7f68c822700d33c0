//! Parsers module - institution-specific statement parsers.

mod cibc_investorsedge_parser;
mod cibc_pps_parser;
mod olympia_parser;
mod parser_kind;
mod scotiabank_parser;
mod sunlife_parser;
mod text_scan;


pub use cibc_investorsedge_parser::CibcInvestorsEdgeParser;
pub use cibc_pps_parser::CibcPpsParser;
pub use olympia_parser::OlympiaParser;
pub use parser_kind::ParserKind;
pub use scotiabank_parser::ScotiaBankParser;
pub use sunlife_parser::SunLifeParser;
