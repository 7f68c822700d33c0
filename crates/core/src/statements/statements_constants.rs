/// Currency assumed for holdings whose statement does not state one.
pub const DEFAULT_CURRENCY: &str = "CAD";

/// Normalized account type values.
pub mod account_types {
    pub const RRSP: &str = "RRSP";
    pub const TFSA: &str = "TFSA";
    pub const LIRA: &str = "LIRA";
    pub const RRIF: &str = "RRIF";
    pub const RESP: &str = "RESP";
    pub const NON_REGISTERED: &str = "Non-Registered";
    pub const GROUP_PLAN: &str = "Group Plan";
}

/// Date layouts found on supported statements, tried in order.
pub(crate) const STATEMENT_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // January 1, 2025
    "%b %d, %Y", // Jan 1, 2025
    "%b. %d, %Y", // Jan. 1, 2025
    "%B %d %Y",  // January 1 2025
    "%Y-%m-%d",  // 2025-01-01
    "%m/%d/%Y",  // 01/31/2025
    "%d-%b-%Y",  // 31-Jan-2025
];
