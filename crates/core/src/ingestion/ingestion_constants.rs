/// Maximum number of examples kept per aggregate in a run report.
pub const MAX_REPORT_EXAMPLES: usize = 10;

/// File extensions picked up when scanning a statements directory.
/// `.txt` holds pre-extracted statement text.
pub const STATEMENT_EXTENSIONS: &[&str] = &["pdf", "txt"];
