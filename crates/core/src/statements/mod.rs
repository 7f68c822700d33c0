//! Statements module - normalized statement model and the parser contract.

mod normalize;
mod pdf_text;
mod statements_constants;
mod statements_errors;
mod statements_model;
mod statements_traits;


pub use normalize::{clean_currency_value, parse_statement_date};
pub use pdf_text::PdfTextExtractor;
pub use statements_constants::{account_types, DEFAULT_CURRENCY};
pub use statements_errors::{ParseError, RowExtractionWarning};
pub use statements_model::{
    normalize_account_type, AccountInfo, HoldingRecord, HoldingsExtraction, ParsedStatement,
    RawHolding, StatementText,
};
pub use statements_traits::{assemble_statement, StatementParser, TextExtractor};
