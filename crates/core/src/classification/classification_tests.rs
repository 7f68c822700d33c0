//! Tests for the classification rules.

#[cfg(test)]
mod tests {
    use crate::classification::*;

    fn category_of(name: &str) -> AssetCategory {
        classify(name).asset_category
    }

    // ============================================================================
    // Precedence
    // ============================================================================

    #[test]
    fn test_balanced_index_fund_is_balanced() {
        let result = classify("ABC Balanced Index Fund");
        assert_eq!(result.asset_category, AssetCategory::Balanced);
        assert_eq!(result.asset_type, asset_types::INDEX_FUND_BALANCED);
        assert_eq!(result.rule, ClassificationRule::IndexFund);
    }

    #[test]
    fn test_gic_wins_over_term_tokens() {
        let result = classify("XYZ GIC 5yr");
        assert_eq!(result.asset_type, asset_types::GIC);
        assert_eq!(result.asset_category, AssetCategory::FixedIncome);
    }

    #[test]
    fn test_gic_wins_over_bond_words() {
        let result = classify("Home Trust GIC Bond Ladder 4.10%");
        assert_eq!(result.asset_type, asset_types::GIC);
    }

    #[test]
    fn test_issuer_suffix_is_gic() {
        assert_eq!(classify("EQUITABLE BANK").asset_type, asset_types::GIC);
        assert_eq!(classify("Home Trust Company").asset_type, asset_types::GIC);
        assert_eq!(classify("Peoples Trust Co.").asset_type, asset_types::GIC);
        assert_eq!(
            classify("Guaranteed Investment Certificate 3.2%").asset_type,
            asset_types::GIC
        );
    }

    #[test]
    fn test_bank_shares_are_not_gic() {
        let result = classify("Royal Bank of Canada Common Shares");
        assert_eq!(result.asset_type, asset_types::STOCK);
        assert_eq!(result.asset_category, AssetCategory::Equity);
    }

    #[test]
    fn test_gic_token_requires_word_boundary() {
        assert_eq!(classify("Magic Software Enterprises").asset_type, asset_types::STOCK);
    }

    #[test]
    fn test_etf_defaults_to_equity() {
        let result = classify("iShares Core S&P 500 ETF");
        assert_eq!(result.asset_type, asset_types::ETF);
        assert_eq!(result.asset_category, AssetCategory::Equity);
    }

    #[test]
    fn test_bond_etf_is_fixed_income() {
        let result = classify("BMO Aggregate Bond Index ETF");
        assert_eq!(result.asset_type, asset_types::ETF);
        assert_eq!(result.asset_category, AssetCategory::FixedIncome);
    }

    #[test]
    fn test_index_geography() {
        assert_eq!(
            classify("TD Canadian Index Fund - e").asset_type,
            asset_types::INDEX_FUND_CANADIAN_EQUITY
        );
        assert_eq!(
            classify("TD U.S. Index Fund").asset_type,
            asset_types::INDEX_FUND_US_EQUITY
        );
        assert_eq!(
            classify("CIBC International Index Fund").asset_type,
            asset_types::INDEX_FUND_INTERNATIONAL_EQUITY
        );
        assert_eq!(
            classify("Global Index Fund").asset_type,
            asset_types::INDEX_FUND_GLOBAL_EQUITY
        );
        assert_eq!(classify("Nasdaq Index Fund").asset_type, asset_types::INDEX_FUND);
        assert_eq!(category_of("TD Canadian Index Fund - e"), AssetCategory::Equity);
    }

    #[test]
    fn test_bond_index_fund_is_fixed_income() {
        let result = classify("CIBC Canadian Bond Index Fund");
        assert_eq!(result.asset_type, asset_types::INDEX_FUND_FIXED_INCOME);
        assert_eq!(result.asset_category, AssetCategory::FixedIncome);
    }

    #[test]
    fn test_balanced_fund() {
        assert_eq!(category_of("Sun Life Granite Balanced Portfolio"), AssetCategory::Balanced);
        assert_eq!(category_of("Fidelity Asset Allocation Fund"), AssetCategory::Balanced);
    }

    #[test]
    fn test_fixed_income_fund() {
        assert_eq!(category_of("PIMCO Monthly Income Fund"), AssetCategory::FixedIncome);
        assert_eq!(category_of("Imperial Short-Term Bond Pool"), AssetCategory::FixedIncome);
        assert_eq!(category_of("Brookfield 5.0% Debenture"), AssetCategory::FixedIncome);
        assert_eq!(category_of("MFS Fixed Income Fund"), AssetCategory::FixedIncome);
    }

    #[test]
    fn test_equity_fund() {
        let result = classify("Mawer Canadian Equity Fund");
        assert_eq!(result.asset_type, asset_types::MUTUAL_FUND_EQUITY);
        assert_eq!(result.rule, ClassificationRule::EquityFund);
        assert_eq!(category_of("Beutel Goodman Growth Portfolio"), AssetCategory::Equity);
    }

    #[test]
    fn test_exempt_market() {
        let result = classify("Acme Exempt Mortgage Trust Units");
        assert_eq!(result.asset_type, asset_types::EXEMPT_MARKET_SECURITY);
        assert_eq!(result.asset_category, AssetCategory::Alternative);
    }

    #[test]
    fn test_default_is_stock() {
        let result = classify("Apple Inc Common Shares");
        assert_eq!(result.asset_type, asset_types::STOCK);
        assert_eq!(result.asset_category, AssetCategory::Equity);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(classify("  abc   BALANCED\tindex fund  "), classify("ABC Balanced Index Fund"));
    }

    #[test]
    fn test_empty_name_falls_back() {
        let result = classify("");
        assert_eq!(result.asset_type, asset_types::STOCK);
        assert!(result.is_fallback());
    }

    // ============================================================================
    // Section refinement
    // ============================================================================

    #[test]
    fn test_section_fixed_income_overrides_generic_name() {
        let result = classify_holding("Acme Corp 4.5% 2030", Some("Fixed Income"));
        assert_eq!(result.asset_category, AssetCategory::FixedIncome);
        assert_eq!(result.rule, ClassificationRule::SectionOverride);
        assert_eq!(result.asset_type, asset_types::STOCK);
    }

    #[test]
    fn test_section_equities_keeps_gic() {
        let result = classify_holding("HOME TRUST GIC 4.0%", Some("Equities"));
        assert_eq!(result.asset_category, AssetCategory::FixedIncome);
        assert_eq!(result.rule, ClassificationRule::Gic);
    }

    #[test]
    fn test_section_equities_keeps_balanced() {
        let result = classify_holding("Mawer Balanced Fund", Some("Equities"));
        assert_eq!(result.asset_category, AssetCategory::Balanced);
    }

    #[test]
    fn test_section_multi_asset_only_refines_equity() {
        let stock = classify_holding("Some Portfolio Units", Some("Multi-Asset"));
        assert_eq!(stock.asset_category, AssetCategory::Balanced);

        let bond = classify_holding("Some Bond Portfolio", Some("Multi-Asset"));
        assert_eq!(bond.asset_category, AssetCategory::FixedIncome);
    }

    #[test]
    fn test_section_cash() {
        let result = classify_holding("Money Market Account", Some("Cash and Cash Equivalents"));
        assert_eq!(result.asset_category, AssetCategory::Cash);
    }

    #[test]
    fn test_section_cash_applies_to_gics() {
        let result = classify_holding("HOME TRUST GIC 4.0%", Some("Cash"));
        assert_eq!(result.asset_type, asset_types::GIC);
        assert_eq!(result.asset_category, AssetCategory::Cash);
        assert_eq!(result.rule, ClassificationRule::SectionOverride);
    }

    #[test]
    fn test_section_exempt_market() {
        let result = classify_holding("Acme Land LP Class A", Some("EXEMPT MARKET SECURITIES"));
        assert_eq!(result.asset_type, asset_types::EXEMPT_MARKET_SECURITY);
        assert_eq!(result.asset_category, AssetCategory::Alternative);
    }

    #[test]
    fn test_pool_types() {
        assert_eq!(
            classify_holding("Imperial Short-Term Bond Pool", None).asset_type,
            asset_types::MUTUAL_FUND_FIXED_INCOME
        );
        assert_eq!(
            classify_holding("Imperial Canadian Dividend Pool", None).asset_type,
            asset_types::MUTUAL_FUND_EQUITY
        );
        assert_eq!(
            classify_holding("Imperial Money Market Pool", None).asset_type,
            asset_types::MUTUAL_FUND
        );
    }

    #[test]
    fn test_no_section_matches_plain_classify() {
        assert_eq!(classify_holding("Apple Inc", None), classify("Apple Inc"));
        assert_eq!(classify_holding("Apple Inc", Some("   ")), classify("Apple Inc"));
    }

    // ============================================================================
    // AssetCategory
    // ============================================================================

    #[test]
    fn test_category_labels_round_trip() {
        for category in [
            AssetCategory::Equity,
            AssetCategory::FixedIncome,
            AssetCategory::Balanced,
            AssetCategory::Alternative,
            AssetCategory::Cash,
        ] {
            assert_eq!(AssetCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(AssetCategory::parse("FIXED_INCOME"), Some(AssetCategory::FixedIncome));
        assert_eq!(AssetCategory::parse("Multi-Asset"), None);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&AssetCategory::FixedIncome).unwrap();
        assert_eq!(json, r#""Fixed Income""#);
    }

    #[test]
    fn test_rule_labels_match_serialized_form() {
        for rule in ClassificationRule::ALL {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.as_str()));
            assert_eq!(ClassificationRule::parse(rule.as_str()), Some(rule));
        }
        assert_eq!(
            ClassificationRule::parse("section_override"),
            Some(ClassificationRule::SectionOverride)
        );
        assert_eq!(ClassificationRule::parse("keyword"), None);
    }
}
