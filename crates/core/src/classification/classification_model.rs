use serde::{Deserialize, Serialize};

/// Top level of the two-level asset taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetCategory {
    Equity,
    #[serde(rename = "Fixed Income")]
    FixedIncome,
    Balanced,
    Alternative,
    Cash,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Equity => "Equity",
            AssetCategory::FixedIncome => "Fixed Income",
            AssetCategory::Balanced => "Balanced",
            AssetCategory::Alternative => "Alternative",
            AssetCategory::Cash => "Cash",
        }
    }

    /// Parses a stored category label. Accepts the display form ("Fixed Income")
    /// as well as upper snake case ("FIXED_INCOME").
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "equity" => Some(AssetCategory::Equity),
            "fixed income" => Some(AssetCategory::FixedIncome),
            "balanced" => Some(AssetCategory::Balanced),
            "alternative" => Some(AssetCategory::Alternative),
            "cash" => Some(AssetCategory::Cash),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The rule that produced a classification.
///
/// Rules are listed in evaluation order. `Default` marks the last-resort
/// fallback; `SectionOverride` marks a category refined from the statement
/// section a holding was listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationRule {
    Gic,
    Etf,
    IndexFund,
    Balanced,
    FixedIncome,
    EquityFund,
    ExemptMarket,
    #[default]
    Default,
    SectionOverride,
}

impl ClassificationRule {
    pub const ALL: [ClassificationRule; 9] = [
        ClassificationRule::Gic,
        ClassificationRule::Etf,
        ClassificationRule::IndexFund,
        ClassificationRule::Balanced,
        ClassificationRule::FixedIncome,
        ClassificationRule::EquityFund,
        ClassificationRule::ExemptMarket,
        ClassificationRule::Default,
        ClassificationRule::SectionOverride,
    ];

    pub fn is_fallback(&self) -> bool {
        matches!(self, ClassificationRule::Default)
    }

    /// Upper snake case label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationRule::Gic => "GIC",
            ClassificationRule::Etf => "ETF",
            ClassificationRule::IndexFund => "INDEX_FUND",
            ClassificationRule::Balanced => "BALANCED",
            ClassificationRule::FixedIncome => "FIXED_INCOME",
            ClassificationRule::EquityFund => "EQUITY_FUND",
            ClassificationRule::ExemptMarket => "EXEMPT_MARKET",
            ClassificationRule::Default => "DEFAULT",
            ClassificationRule::SectionOverride => "SECTION_OVERRIDE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str().eq_ignore_ascii_case(value))
    }
}

/// Result of classifying a security name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub asset_type: String,
    pub asset_category: AssetCategory,
    pub rule: ClassificationRule,
}

impl Classification {
    pub fn new(asset_type: &str, asset_category: AssetCategory, rule: ClassificationRule) -> Self {
        Self {
            asset_type: asset_type.to_string(),
            asset_category,
            rule,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule.is_fallback()
    }
}
