//! Refinement of a name-based classification using the statement section a
//! holding was listed under.
//!
//! Statements group holdings under headings such as "Fixed Income" or
//! "Equities". The heading is better evidence than the name for generic
//! names, but weaker than an explicit product rule (a GIC listed under
//! "Equities" is still a GIC). A cash heading always wins the category: a
//! GIC held as a cash equivalent keeps its GIC type but counts as cash.

use super::classification_constants::asset_types;
use super::classification_model::{AssetCategory, Classification, ClassificationRule};
use super::classifier::{classify, NormalizedName};

/// Classifies a holding from its name and, when known, its statement section.
pub fn classify_holding(security_name: &str, section: Option<&str>) -> Classification {
    let mut classification = classify(security_name);
    refine_pooled_fund_type(&mut classification, security_name);

    let Some(section) = section.map(str::trim).filter(|s| !s.is_empty()) else {
        return classification;
    };
    let section = section.to_lowercase();
    let current = classification.asset_category;

    if section.contains("exempt market") {
        return Classification::new(
            asset_types::EXEMPT_MARKET_SECURITY,
            AssetCategory::Alternative,
            ClassificationRule::SectionOverride,
        );
    }

    let refined = if section.contains("cash") {
        Some(AssetCategory::Cash)
    } else if section.contains("fixed income") || section.contains("bond") {
        Some(AssetCategory::FixedIncome)
    } else if section.contains("multi-asset") {
        (current == AssetCategory::Equity).then_some(AssetCategory::Balanced)
    } else if section.contains("equit") {
        (!matches!(
            current,
            AssetCategory::FixedIncome | AssetCategory::Balanced
        ))
        .then_some(AssetCategory::Equity)
    } else {
        None
    };

    if let Some(category) = refined {
        if category != current {
            classification.asset_category = category;
            classification.rule = ClassificationRule::SectionOverride;
        }
    }
    classification
}

/// Pooled funds are mutual funds whatever else the name suggests.
fn refine_pooled_fund_type(classification: &mut Classification, security_name: &str) {
    let name = NormalizedName::new(security_name);
    if !name.has_word("pool") {
        return;
    }
    let asset_type = if name.has_any(&["bond", "bonds"]) {
        asset_types::MUTUAL_FUND_FIXED_INCOME
    } else if name.has_any(&["equity", "dividend"]) {
        asset_types::MUTUAL_FUND_EQUITY
    } else {
        asset_types::MUTUAL_FUND
    };
    classification.asset_type = asset_type.to_string();
}
