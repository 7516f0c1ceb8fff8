//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod compare;
mod match_cmd;
mod strategies;

pub use compare::run_compare;
pub use match_cmd::{run_match, MatchPaths};
pub use strategies::run_strategies;

use crate::config::{AppConfig, Validatable};
use crate::matching::{MatchingStrategy, StrategyRegistry};
use crate::reports::ReportConfig;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Exit codes for the `match` command
pub mod exit_codes {
    /// The query matched one inventory key
    pub const MATCH: i32 = 0;
    /// A plausible candidate that needs human confirmation
    pub const POSSIBLE: i32 = 1;
    /// No candidate cleared the thresholds
    pub const NO_MATCH: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Build the registry for a config and resolve its active strategy.
///
/// Logs the resolution at the boundary; the matching core never does.
pub(crate) fn resolve_strategy(
    config: &AppConfig,
) -> Result<(StrategyRegistry, Arc<MatchingStrategy>)> {
    if let Some(error) = config.validate().first() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    let registry = config
        .build_registry()
        .context("Failed to register configured strategies")?;

    let requested = config.strategy.as_str();
    let strategy = registry
        .resolve(Some(requested), config.fallback_policy())
        .with_context(|| format!("Cannot resolve strategy '{requested}'"))?;

    if registry.get(requested).is_none() {
        tracing::warn!(
            "Unknown strategy '{}', falling back to default '{}'",
            requested,
            strategy.name()
        );
    } else {
        tracing::info!("Using strategy {}", strategy.name());
    }

    Ok((registry, strategy))
}

/// Reporter options, honoring the `NO_COLOR` environment variable.
pub(crate) fn report_config(config: &AppConfig) -> ReportConfig {
    let mut report = config.report_config();
    report.colored = report.colored && std::env::var_os("NO_COLOR").is_none();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{DecisionThresholds, StrategyDefinition};

    #[test]
    fn test_resolve_default_strategy() {
        let (registry, strategy) = resolve_strategy(&AppConfig::default()).unwrap();
        assert_eq!(strategy.name(), "v2");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_resolve_unknown_strategy() {
        let config = AppConfig::builder().strategy("v4").build();
        let err = resolve_strategy(&config).unwrap_err();
        assert!(format!("{err:#}").contains("v4"));

        let config = AppConfig::builder()
            .strategy("v4")
            .fallback_to_default(true)
            .build();
        let (_, strategy) = resolve_strategy(&config).unwrap();
        assert_eq!(strategy.name(), "v2");
    }

    #[test]
    fn test_resolve_configured_strategy() {
        let config = AppConfig::builder()
            .strategy("loose")
            .add_strategy(StrategyDefinition::extending("loose", "v1"))
            .build();
        let (_, strategy) = resolve_strategy(&config).unwrap();
        assert_eq!(strategy.name(), "loose");
    }

    #[test]
    fn test_invalid_engine_settings_rejected() {
        let config = AppConfig::builder().parallel_threshold(0).build();
        let err = resolve_strategy(&config).unwrap_err();
        assert!(err.to_string().contains("parallel_threshold"));
    }

    #[test]
    fn test_definition_cannot_shadow_builtin_alias() {
        let mut shadow = StrategyDefinition::extending("balanced", "v1");
        shadow.thresholds = Some(DecisionThresholds::new(0.99, 0.98, 0.5));
        let config = AppConfig::builder()
            .strategy("balanced")
            .add_strategy(shadow)
            .build();

        let err = resolve_strategy(&config).unwrap_err();
        assert!(err.to_string().contains("strategies[0].name"), "{err}");
    }

    #[test]
    fn test_invalid_definition_rejected_by_field() {
        let mut backwards = StrategyDefinition::extending("backwards", "v2");
        backwards.thresholds = Some(DecisionThresholds::new(0.5, 0.7, 0.1));
        let config = AppConfig::builder().add_strategy(backwards).build();

        let err = resolve_strategy(&config).unwrap_err();
        assert!(err.to_string().contains("strategies[0].thresholds"), "{err}");
    }
}
