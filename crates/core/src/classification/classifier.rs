//! Rule-based classification of free-text security names.
//!
//! Rules are evaluated in a fixed order and the first match wins. The order
//! matters because the keyword families overlap: "Balanced Index Fund" must be
//! caught by the index rule (which knows about the balanced qualifier) before
//! the generic equity-fund rule sees "fund", and GIC names often carry
//! bond-like words that would otherwise land in the fixed income rule.

use super::classification_constants::*;
use super::classification_model::{AssetCategory, Classification, ClassificationRule};

/// Classifies a security by name. Never fails; unrecognized names fall back to
/// a directly held stock.
pub fn classify(security_name: &str) -> Classification {
    let name = NormalizedName::new(security_name);

    if name.is_gic() {
        return Classification::new(
            asset_types::GIC,
            AssetCategory::FixedIncome,
            ClassificationRule::Gic,
        );
    }

    if name.has_word("etf") || name.has_word("etfs") {
        let category = if name.has_fixed_income_qualifier() {
            AssetCategory::FixedIncome
        } else {
            AssetCategory::Equity
        };
        return Classification::new(asset_types::ETF, category, ClassificationRule::Etf);
    }

    if name.has_word("index") {
        return classify_index_fund(&name);
    }

    if name.has_any(BALANCED_QUALIFIERS) {
        return Classification::new(
            asset_types::MUTUAL_FUND_BALANCED,
            AssetCategory::Balanced,
            ClassificationRule::Balanced,
        );
    }

    if name.has_fixed_income_qualifier() || name.has_any(INCOME_FUND_PHRASES) {
        return Classification::new(
            asset_types::MUTUAL_FUND_FIXED_INCOME,
            AssetCategory::FixedIncome,
            ClassificationRule::FixedIncome,
        );
    }

    if name.has_any(EQUITY_FUND_MARKERS) {
        return Classification::new(
            asset_types::MUTUAL_FUND_EQUITY,
            AssetCategory::Equity,
            ClassificationRule::EquityFund,
        );
    }

    if name.has_any(EXEMPT_MARKET_MARKERS) {
        return Classification::new(
            asset_types::EXEMPT_MARKET_SECURITY,
            AssetCategory::Alternative,
            ClassificationRule::ExemptMarket,
        );
    }

    Classification::new(
        asset_types::STOCK,
        AssetCategory::Equity,
        ClassificationRule::Default,
    )
}

fn classify_index_fund(name: &NormalizedName) -> Classification {
    let (asset_type, category) = if name.has_fixed_income_qualifier() {
        (asset_types::INDEX_FUND_FIXED_INCOME, AssetCategory::FixedIncome)
    } else if name.has_any(BALANCED_QUALIFIERS) {
        (asset_types::INDEX_FUND_BALANCED, AssetCategory::Balanced)
    } else if name.has_any(CANADIAN_QUALIFIERS) {
        (asset_types::INDEX_FUND_CANADIAN_EQUITY, AssetCategory::Equity)
    } else if name.has_any(US_QUALIFIERS) {
        (asset_types::INDEX_FUND_US_EQUITY, AssetCategory::Equity)
    } else if name.has_any(INTERNATIONAL_QUALIFIERS) {
        (
            asset_types::INDEX_FUND_INTERNATIONAL_EQUITY,
            AssetCategory::Equity,
        )
    } else if name.has_any(GLOBAL_QUALIFIERS) {
        (asset_types::INDEX_FUND_GLOBAL_EQUITY, AssetCategory::Equity)
    } else {
        (asset_types::INDEX_FUND, AssetCategory::Equity)
    };
    Classification::new(asset_type, category, ClassificationRule::IndexFund)
}

/// A security name folded to lower case with whitespace collapsed.
pub(crate) struct NormalizedName(String);

impl NormalizedName {
    pub(crate) fn new(raw: &str) -> Self {
        Self(
            raw.split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// True when `needle` occurs delimited by non-alphanumeric characters
    /// (or the string boundaries) on both sides.
    pub(crate) fn has_word(&self, needle: &str) -> bool {
        contains_word(&self.0, needle)
    }

    pub(crate) fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.has_word(needle))
    }

    fn has_fixed_income_qualifier(&self) -> bool {
        self.has_any(FIXED_INCOME_QUALIFIERS)
    }

    fn is_gic(&self) -> bool {
        if self.has_any(GIC_MARKERS) {
            return true;
        }
        let trimmed = self.0.trim_end_matches(|c: char| !c.is_alphanumeric());
        GIC_ISSUER_SUFFIXES.iter().any(|suffix| {
            trimmed
                .strip_suffix(suffix)
                .is_some_and(|head| head.is_empty() || head.ends_with(' '))
        })
    }
}

pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let boundary_before = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let boundary_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        boundary_before && boundary_after
    })
}
