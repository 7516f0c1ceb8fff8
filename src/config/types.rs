//! Configuration types for keymatch.

use super::defaults::{DEFAULT_PARALLEL_THRESHOLD, DEFAULT_RANKING_DEPTH, DEFAULT_STRATEGY};
use crate::error::Result;
use crate::matching::{EngineConfig, FallbackPolicy, StrategyDefinition, StrategyRegistry};
use crate::reports::{OutputFormat, ReportConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the strategy to match with
    pub strategy: String,
    /// Use the default strategy when `strategy` is unknown instead of failing
    pub fallback_to_default: bool,
    /// Engine tuning
    pub engine: EngineSettings,
    /// Output settings
    pub output: OutputSettings,
    /// Additional strategies, registered in order after the built-ins
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strategies: Vec<StrategyDefinition>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            fallback_to_default: false,
            engine: EngineSettings::default(),
            output: OutputSettings::default(),
            strategies: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// How unknown strategy names are handled.
    #[must_use]
    pub const fn fallback_policy(&self) -> FallbackPolicy {
        if self.fallback_to_default {
            FallbackPolicy::UseDefault
        } else {
            FallbackPolicy::Strict
        }
    }

    /// Built-in strategies plus every configured definition.
    pub fn build_registry(&self) -> Result<StrategyRegistry> {
        let mut registry = StrategyRegistry::with_builtins();
        registry.register_definitions(&self.strategies)?;
        Ok(registry)
    }

    /// Reporter options derived from the output settings.
    #[must_use]
    pub const fn report_config(&self) -> ReportConfig {
        ReportConfig::new(self.output.explain, !self.output.no_color)
    }
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineSettings {
    /// Inventories at least this large are scored in parallel
    pub parallel_threshold: usize,
    /// Number of candidates listed in the ranking
    pub ranking_depth: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            ranking_depth: DEFAULT_RANKING_DEPTH,
        }
    }
}

impl From<EngineSettings> for EngineConfig {
    fn from(settings: EngineSettings) -> Self {
        Self {
            parallel_threshold: settings.parallel_threshold,
            ranking_depth: settings.ranking_depth,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format
    pub format: OutputFormat,
    /// Include attribute breakdowns and rankings
    pub explain: bool,
    /// Disable colored output
    pub no_color: bool,
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the strategy name.
    pub fn strategy(mut self, name: impl Into<String>) -> Self {
        self.config.strategy = name.into();
        self
    }

    /// Fall back to the default strategy on unknown names.
    pub const fn fallback_to_default(mut self, fallback: bool) -> Self {
        self.config.fallback_to_default = fallback;
        self
    }

    /// Set the parallel scoring threshold.
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.engine.parallel_threshold = threshold;
        self
    }

    /// Set the ranking depth.
    pub const fn ranking_depth(mut self, depth: usize) -> Self {
        self.config.engine.ranking_depth = depth;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Include breakdowns in the output.
    pub const fn explain(mut self, explain: bool) -> Self {
        self.config.output.explain = explain;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Add a strategy definition.
    pub fn add_strategy(mut self, definition: StrategyDefinition) -> Self {
        self.config.strategies.push(definition);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}
