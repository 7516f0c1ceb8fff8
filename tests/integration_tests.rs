//! Integration tests for keymatch
//!
//! These tests verify end-to-end functionality of signature loading,
//! strategy resolution, the matching engine, and report generation.

use keymatch::{
    config::{load_config_file, AppConfig},
    matching::{
        Decision, FallbackPolicy, MatchTypeHint, MatchingEngine, ShapeVerdict, StrategyVersion,
    },
    model::{load_inventory, load_signature, InventoryCandidate, Signature},
    reports::{create_reporter, OutputFormat, ReportConfig},
    KeyMatchError,
};
use std::path::Path;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn query() -> Signature {
    load_signature(&fixture_path("query.json")).expect("Failed to load query fixture")
}

fn inventory(name: &str) -> Vec<InventoryCandidate> {
    load_inventory(&fixture_path(name)).expect("Failed to load inventory fixture")
}

// ============================================================================
// Loading Tests
// ============================================================================

mod loading_tests {
    use super::*;

    #[test]
    fn test_load_query() {
        let query = query();
        assert_eq!(query.populated_count(), 6);
        assert!((query.confidence - 0.8).abs() < f64::EPSILON);
        assert!(query.shape_descriptor().is_some());
    }

    #[test]
    fn test_load_inventory_preserves_order() {
        let ids: Vec<_> = inventory("inventory.json")
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["front-door", "back-door", "padlock", "unlabelled"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_signature(&fixture_path("nope.json")).unwrap_err();
        assert!(matches!(err, KeyMatchError::Io { .. }));
    }
}

// ============================================================================
// Engine Tests
// ============================================================================

mod engine_tests {
    use super::*;

    #[test]
    fn test_default_strategy_matches_front_door() {
        let strategy = StrategyVersion::DEFAULT.strategy();
        let report = MatchingEngine::default()
            .match_with_report(&query(), &inventory("inventory.json"), &strategy)
            .unwrap();
        let outcome = &report.outcome;

        assert_eq!(outcome.decision, Decision::Match);
        assert_eq!(outcome.best_candidate_id.as_deref(), Some("front-door"));
        assert_eq!(outcome.runner_up_id.as_deref(), Some("back-door"));
        assert!((outcome.best_score - 1.0).abs() < 1e-9);
        // back-door differs only in cut depths (weight 2.0 of 8.5)
        assert!((outcome.margin - 2.0 / 8.5).abs() < 1e-9);
        assert_eq!(outcome.candidates_scored, 3);
        assert_eq!(outcome.strategy, "v2");

        let breakdown = outcome.breakdown.as_ref().unwrap();
        assert_eq!(breakdown.shape.verdict, ShapeVerdict::Passed);
        assert_eq!(breakdown.match_type_hint, MatchTypeHint::StrongCategoricalMatch);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, "unlabelled");
        assert_eq!(report.skipped[0].index, 3);
        assert!((report.query_confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_strict_veto_zeroes_geometry_mismatch() {
        let strategy = StrategyVersion::V1.strategy();
        let report = MatchingEngine::default()
            .match_with_report(&query(), &inventory("inventory.json"), &strategy)
            .unwrap();

        let padlock = report
            .ranking
            .iter()
            .find(|r| r.id == "padlock")
            .expect("padlock should be ranked");
        assert_eq!(padlock.score, 0.0);
        assert_eq!(padlock.match_type_hint, MatchTypeHint::GeometryMismatch);
        assert_eq!(report.outcome.decision, Decision::Match);
    }

    #[test]
    fn test_identical_twins_are_ambiguous() {
        let strategy = StrategyVersion::V2.strategy();
        let outcome = MatchingEngine::default()
            .match_signature(&query(), &inventory("twins.json"), &strategy)
            .unwrap();

        assert_eq!(outcome.decision, Decision::Possible);
        assert_eq!(outcome.margin, 0.0);
        // Ties go to the earlier inventory entry
        assert_eq!(outcome.best_candidate_id.as_deref(), Some("office-1"));
        assert_eq!(outcome.runner_up_id.as_deref(), Some("office-2"));
    }

    #[test]
    fn test_every_builtin_agrees_on_the_obvious_key() {
        let query = query();
        let inventory = inventory("inventory.json");
        for version in StrategyVersion::all() {
            let outcome = keymatch::match_signature(&query, &inventory, &version.strategy())
                .unwrap();
            assert_eq!(
                outcome.best_candidate_id.as_deref(),
                Some("front-door"),
                "strategy {version}"
            );
            assert_eq!(outcome.strategy, version.name());
        }
    }

    #[test]
    fn test_invalid_query_is_rejected() {
        let strategy = StrategyVersion::V2.strategy();
        let err = MatchingEngine::default()
            .match_signature(&Signature::new(), &inventory("inventory.json"), &strategy)
            .unwrap_err();
        assert!(err.is_invalid_signature());
    }

    #[test]
    fn test_empty_inventory_is_no_match() {
        let strategy = StrategyVersion::V2.strategy();
        let outcome = MatchingEngine::default()
            .match_signature(&query(), &[], &strategy)
            .unwrap();
        assert_eq!(outcome.decision, Decision::NoMatch);
        assert_eq!(outcome.best_candidate_id, None);
        assert_eq!(outcome.candidates_scored, 0);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use super::*;
    use keymatch::config::Validatable;

    #[test]
    fn test_configured_strategy_end_to_end() {
        let config = load_config_file(&fixture_path("strategies.yaml")).unwrap();
        assert!(config.is_valid(), "{:?}", config.validate());

        let registry = config.build_registry().unwrap();
        let strategy = registry
            .resolve(Some(&config.strategy), config.fallback_policy())
            .unwrap();
        assert_eq!(strategy.name(), "workshop");
        assert!((strategy.thresholds().match_threshold - 0.85).abs() < f64::EPSILON);

        let outcome = MatchingEngine::new(config.engine.into())
            .match_signature(&query(), &inventory("inventory.json"), &strategy)
            .unwrap();
        assert_eq!(outcome.decision, Decision::Match);
        // material carries no weight, so back-door loses 2.5 of 9.0
        assert!((outcome.margin - 2.5 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_strategy_needs_explicit_fallback() {
        let config = AppConfig::builder().strategy("v7").build();
        let registry = config.build_registry().unwrap();

        let err = registry
            .resolve(Some("v7"), FallbackPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, KeyMatchError::StrategyNotFound { .. }));

        let strategy = registry
            .resolve(Some("v7"), FallbackPolicy::UseDefault)
            .unwrap();
        assert_eq!(strategy.name(), "v2");
    }
}

// ============================================================================
// Report Tests
// ============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn test_json_report_is_machine_readable() {
        let strategy = StrategyVersion::V2.strategy();
        let report = MatchingEngine::default()
            .match_with_report(&query(), &inventory("inventory.json"), &strategy)
            .unwrap();

        let json = create_reporter(OutputFormat::Json)
            .generate_match_report(&report, &ReportConfig::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"]["decision"], "MATCH");
        assert_eq!(value["skipped"][0]["id"], "unlabelled");
        assert_eq!(value["ranking"][0]["id"], "front-door");
    }

    #[test]
    fn test_summary_report_names_the_decision() {
        let strategy = StrategyVersion::V2.strategy();
        let report = MatchingEngine::default()
            .match_with_report(&query(), &inventory("twins.json"), &strategy)
            .unwrap();

        let text = create_reporter(OutputFormat::Summary)
            .generate_match_report(&report, &ReportConfig::new(true, false))
            .unwrap();
        assert!(text.contains("POSSIBLE"));
        assert!(text.contains("office-1"));
        assert!(text.contains("Ranking:"));
    }
}
