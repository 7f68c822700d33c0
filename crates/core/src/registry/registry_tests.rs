//! Tests for parser resolution and the institutions configuration.

#[cfg(test)]
mod tests {
    use crate::parsers::ParserKind;
    use crate::registry::*;
    use std::path::Path;

    const CONFIG: &str = r#"
institutions:
  SunLife:
    name: Sun Life Financial
    parsers:
      - pattern: "*"
        class: SunLifeParser
        module: parsers.sunlife_parser
        description: Group retirement statements
  CIBC:
    name: CIBC
    parsers:
      - pattern: PPS
        class: CIBCPPSParser
        module: parsers.cibc_pps_parser
      - class: parsers.cibc_investorsedge_parser.CIBCInvestorsEdgeParser
  Olympia:
    parsers:
      - pattern: rrsp
        class: OlympiaParser
"#;

    fn cibc_registry() -> ParserRegistry {
        let mut registry = ParserRegistry::new();
        registry.register("CIBC", "pps", ParserKind::CibcPps, "");
        registry.register("CIBC", "*", ParserKind::CibcInvestorsEdge, "");
        registry
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let registry = cibc_registry();
        let pps = registry
            .resolve(Path::new("statements/CIBC/CIBC-RRSP-PPS-2025.pdf"))
            .unwrap();
        assert_eq!(pps.parser, ParserKind::CibcPps);

        let other = registry
            .resolve(Path::new("statements/CIBC/CIBC-RRSP-2025.pdf"))
            .unwrap();
        assert_eq!(other.parser, ParserKind::CibcInvestorsEdge);
    }

    #[test]
    fn test_wildcard_first_shadows_later_patterns() {
        let mut registry = ParserRegistry::new();
        registry.register("CIBC", "*", ParserKind::CibcInvestorsEdge, "");
        registry.register("CIBC", "pps", ParserKind::CibcPps, "");
        let resolved = registry
            .resolve(Path::new("statements/CIBC/CIBC-PPS.pdf"))
            .unwrap();
        assert_eq!(resolved.parser, ParserKind::CibcInvestorsEdge);
    }

    #[test]
    fn test_unknown_institution_fails() {
        let registry = cibc_registry();
        let err = registry
            .resolve(Path::new("statements/TD/td-2025.pdf"))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UnknownInstitution { ref institution, .. } if institution == "TD"
        ));
    }

    #[test]
    fn test_institution_key_is_case_sensitive() {
        let registry = cibc_registry();
        assert!(matches!(
            registry.resolve(Path::new("statements/cibc/PPS.pdf")),
            Err(ResolutionError::UnknownInstitution { .. })
        ));
    }

    #[test]
    fn test_no_matching_pattern_fails() {
        let mut registry = ParserRegistry::new();
        registry.register("Olympia", "rrsp", ParserKind::Olympia, "");
        let err = registry
            .resolve(Path::new("statements/Olympia/tfsa-2025.pdf"))
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::NoMatchingPattern {
                institution: "Olympia".to_string(),
                filename: "tfsa-2025.pdf".to_string(),
            }
        );
    }

    #[test]
    fn test_path_without_parent_is_invalid() {
        let registry = cibc_registry();
        assert!(matches!(
            registry.resolve(Path::new("statement.pdf")),
            Err(ResolutionError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_pattern_is_case_insensitive_substring() {
        let pattern = Pattern::parse("PPS");
        assert!(pattern.matches("cibc-rrsp-pps-2025.pdf"));
        assert!(!pattern.matches("cibc-rrsp-2025.pdf"));
        assert_eq!(pattern.as_str(), "PPS");
        assert_eq!(Pattern::parse(" * "), Pattern::Wildcard);
    }

    #[test]
    fn test_load_yaml_preserves_order_and_defaults() {
        let registry = ParserRegistry::from_yaml_str(CONFIG).unwrap();

        let institutions = registry.institutions();
        assert_eq!(
            institutions,
            vec![
                ("SunLife", "Sun Life Financial"),
                ("CIBC", "CIBC"),
                ("Olympia", "Olympia"),
            ]
        );

        let all = registry.list_all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].description, "Group retirement statements");
        assert_eq!(all[1].parser, ParserKind::CibcPps);
        assert_eq!(all[2].pattern, Pattern::Wildcard);
        assert_eq!(all[2].parser, ParserKind::CibcInvestorsEdge);
        assert_eq!(all[2].description, "");
        assert_eq!(all[3].institution_key, "Olympia");
    }

    #[test]
    fn test_unknown_parser_reference_is_config_error() {
        let yaml = "institutions:\n  TD:\n    parsers:\n      - class: TDParser\n        \
                    module: parsers.td_parser\n";
        let err = ParserRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownParser { ref institution, ref reference }
                if institution == "TD" && reference == "parsers.td_parser.TDParser"
        ));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = ParserRegistry::from_yaml_str("institutions: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_empty_institutions_section() {
        let registry = ParserRegistry::from_yaml_str("institutions:\n").unwrap();
        assert!(registry.is_empty());
        assert!(registry.list_all().is_empty());
    }

    #[test]
    fn test_yaml_round_trip_keeps_registrations() {
        let registry = ParserRegistry::from_yaml_str(CONFIG).unwrap();
        let yaml = registry.to_yaml_string().unwrap();
        let reloaded = ParserRegistry::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded, registry);
        assert!(yaml.find("SunLife").unwrap() < yaml.find("Olympia").unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("institutions.yaml");

        let mut registry = cibc_registry();
        registry.register("TestBank", "rrsp", ParserKind::SunLife, "Test statements");
        registry.save(&path).unwrap();

        let loaded = ParserRegistry::load(&path).unwrap();
        assert_eq!(loaded, registry);
        let resolved = loaded
            .resolve(Path::new("statements/TestBank/TestBank-RRSP-2025-09.pdf"))
            .unwrap();
        assert_eq!(resolved.parser, ParserKind::SunLife);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ParserRegistry::load("/nonexistent/institutions.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
