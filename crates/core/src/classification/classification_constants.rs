/// Asset type names produced by the classifier.
pub mod asset_types {
    pub const GIC: &str = "GIC";
    pub const ETF: &str = "ETF";
    pub const STOCK: &str = "Stock";
    pub const INDEX_FUND: &str = "Index Fund";
    pub const INDEX_FUND_FIXED_INCOME: &str = "Index Fund - Fixed Income";
    pub const INDEX_FUND_BALANCED: &str = "Index Fund - Balanced";
    pub const INDEX_FUND_CANADIAN_EQUITY: &str = "Index Fund - Canadian Equity";
    pub const INDEX_FUND_US_EQUITY: &str = "Index Fund - US Equity";
    pub const INDEX_FUND_INTERNATIONAL_EQUITY: &str = "Index Fund - International Equity";
    pub const INDEX_FUND_GLOBAL_EQUITY: &str = "Index Fund - Global Equity";
    pub const MUTUAL_FUND: &str = "Mutual Fund";
    pub const MUTUAL_FUND_BALANCED: &str = "Mutual Fund - Balanced";
    pub const MUTUAL_FUND_FIXED_INCOME: &str = "Mutual Fund - Fixed Income";
    pub const MUTUAL_FUND_EQUITY: &str = "Mutual Fund - Equity";
    pub const EXEMPT_MARKET_SECURITY: &str = "Exempt Market Security";
}

/// Name suffixes of deposit-taking issuers. A holding named after its issuer
/// (e.g. "HOME TRUST COMPANY") is a deposit product.
pub(crate) const GIC_ISSUER_SUFFIXES: &[&str] = &["bank", "trust company", "trust co"];

pub(crate) const GIC_MARKERS: &[&str] = &["gic", "gics", "guaranteed investment"];

pub(crate) const FIXED_INCOME_QUALIFIERS: &[&str] = &[
    "bond",
    "bonds",
    "fixed income",
    "fixedincome",
    "debenture",
    "debentures",
];

pub(crate) const INCOME_FUND_PHRASES: &[&str] = &["income fund"];

pub(crate) const BALANCED_QUALIFIERS: &[&str] = &["balanced", "asset allocation"];

pub(crate) const CANADIAN_QUALIFIERS: &[&str] = &["canadian", "cdn"];

pub(crate) const US_QUALIFIERS: &[&str] = &["u.s.", "u.s", "us", "american"];

pub(crate) const INTERNATIONAL_QUALIFIERS: &[&str] = &["international", "intl"];

pub(crate) const GLOBAL_QUALIFIERS: &[&str] = &["global"];

pub(crate) const EQUITY_FUND_MARKERS: &[&str] = &["equity", "equities", "growth", "fund", "stock"];

pub(crate) const EXEMPT_MARKET_MARKERS: &[&str] = &["exempt", "private"];
