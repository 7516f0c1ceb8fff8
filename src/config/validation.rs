//! Configuration validation for keymatch.
//!
//! Provides validation traits and implementations for all configuration types.

use super::defaults::MAX_RANKING_DEPTH;
use super::types::{AppConfig, EngineSettings, OutputSettings};
use crate::matching::{StrategyDefinition, StrategyRegistry, StrategyVersion};
use std::collections::HashSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.engine.validate());
        errors.extend(self.output.validate());

        let mut seen = HashSet::new();
        for (i, definition) in self.strategies.iter().enumerate() {
            for mut error in definition.validate() {
                error.field = format!("strategies[{i}].{}", error.field);
                errors.push(error);
            }
            if StrategyVersion::from_name(&definition.name).is_some()
                || !seen.insert(definition.name.as_str())
            {
                errors.push(ConfigError::new(
                    format!("strategies[{i}].name"),
                    format!("Strategy name '{}' is already taken", definition.name),
                ));
            }
        }

        if self.strategy.trim().is_empty() {
            errors.push(ConfigError::new("strategy", "Strategy name must not be empty"));
        } else if errors.is_empty() {
            // Only meaningful once the definitions themselves are sound
            match self.build_registry() {
                Ok(registry) => errors.extend(check_active_strategy(self, &registry)),
                Err(e) => errors.push(ConfigError::new("strategies", e.to_string())),
            }
        }

        errors
    }
}

fn check_active_strategy(config: &AppConfig, registry: &StrategyRegistry) -> Option<ConfigError> {
    if config.fallback_to_default || registry.get(&config.strategy).is_some() {
        return None;
    }
    Some(ConfigError::new(
        "strategy",
        format!(
            "Unknown strategy '{}'. Registered: {}",
            config.strategy,
            registry.names().collect::<Vec<_>>().join(", ")
        ),
    ))
}

impl Validatable for EngineSettings {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.parallel_threshold == 0 {
            errors.push(ConfigError::new(
                "engine.parallel_threshold",
                "Parallel threshold must be at least 1",
            ));
        }
        if self.ranking_depth > MAX_RANKING_DEPTH {
            errors.push(ConfigError::new(
                "engine.ranking_depth",
                format!(
                    "Ranking depth must be at most {MAX_RANKING_DEPTH}, got {}",
                    self.ranking_depth
                ),
            ));
        }
        errors
    }
}

impl Validatable for OutputSettings {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for StrategyDefinition {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ConfigError::new("name", "Strategy name must not be empty"));
        }
        if self.extends.is_none() && self.attributes.is_empty() {
            errors.push(ConfigError::new(
                "attributes",
                "A strategy needs either 'extends' or at least one attribute",
            ));
        }

        for (attribute, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                errors.push(ConfigError::new(
                    format!("weights.{attribute}"),
                    format!("Weight must be a non-negative number, got {weight}"),
                ));
            }
        }
        for spec in &self.attributes {
            if !spec.weight.is_finite() || spec.weight < 0.0 {
                errors.push(ConfigError::new(
                    format!("attributes.{}.weight", spec.name),
                    format!("Weight must be a non-negative number, got {}", spec.weight),
                ));
            }
        }

        if let Some(neutral) = self.neutral {
            if !(0.0..=1.0).contains(&neutral) {
                errors.push(ConfigError::new(
                    "neutral",
                    format!("Neutral similarity must be between 0.0 and 1.0, got {neutral}"),
                ));
            }
        }

        if let Some(thresholds) = &self.thresholds {
            if let Err(e) = thresholds.validate() {
                errors.push(ConfigError::new("thresholds", e.to_string()));
            }
        }

        if let Some(veto) = &self.veto {
            if let Err(e) = veto.validate() {
                errors.push(ConfigError::new("veto", e.to_string()));
            }
        }

        errors
    }
}
