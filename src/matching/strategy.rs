//! Matching strategies: named, immutable scoring policies.
//!
//! A strategy bundles the attribute table (kinds and weights), the shape
//! veto configuration, and the three decision thresholds. The built-in
//! versions are a closed set ([`StrategyVersion`]); callers may register
//! further strategies built from configuration, but a strategy never
//! changes once constructed.

use super::attributes::{
    AttributeComparator, AttributeKind, AttributeSpec, NearMatch, DEFAULT_NEUTRAL_SIMILARITY,
};
use super::shape::{ShapeVetoConfig, VetoMode};
use crate::error::{KeyMatchError, Result, StrategyErrorKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Decision thresholds, all in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionThresholds {
    /// Minimum best score for MATCH
    #[serde(rename = "match")]
    pub match_threshold: f64,
    /// Minimum best score for POSSIBLE
    #[serde(rename = "possible")]
    pub possible_threshold: f64,
    /// Minimum gap to the runner-up for MATCH
    #[serde(rename = "margin")]
    pub margin_threshold: f64,
}

impl DecisionThresholds {
    #[must_use]
    pub const fn new(match_threshold: f64, possible_threshold: f64, margin_threshold: f64) -> Self {
        Self {
            match_threshold,
            possible_threshold,
            margin_threshold,
        }
    }

    /// Check ranges and ordering.
    pub fn validate(&self) -> std::result::Result<(), StrategyErrorKind> {
        for (name, value) in [
            ("match", self.match_threshold),
            ("possible", self.possible_threshold),
            ("margin", self.margin_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StrategyErrorKind::InvalidThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }
        if self.possible_threshold > self.match_threshold {
            return Err(StrategyErrorKind::InvertedThresholds {
                possible: self.possible_threshold,
                matched: self.match_threshold,
            });
        }
        Ok(())
    }
}

/// The built-in strategy versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyVersion {
    /// Categorical evidence first, strict geometry veto
    V1,
    /// Balanced weights, soft geometry penalty
    V2,
    /// Cut profile and geometry first, tight strict veto
    V3,
}

impl StrategyVersion {
    /// The version used when the caller names none.
    pub const DEFAULT: Self = Self::V2;

    /// Registered name of this version.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::V1 => "Categorical evidence first; geometry failures are vetoed outright",
            Self::V2 => "Balanced attribute weights; geometry failures cost a soft penalty",
            Self::V3 => "Cut profile and outline first; tight limits with a strict veto",
        }
    }

    /// Parse a version from its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "v1" | "categorical" => Some(Self::V1),
            "v2" | "balanced" => Some(Self::V2),
            "v3" | "geometry" => Some(Self::V3),
            _ => None,
        }
    }

    /// All built-in versions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::V1, Self::V2, Self::V3]
    }

    /// Build the strategy for this version.
    #[must_use]
    pub fn strategy(&self) -> MatchingStrategy {
        let (weights, veto, thresholds) = match self {
            Self::V1 => (
                StandardWeights {
                    stamped_code: 3.0,
                    cut_count: 1.5,
                    cut_depths: 2.5,
                    bow_shape: 1.0,
                    blade_profile: 1.5,
                    groove_count: 1.0,
                    material: 0.5,
                    distinguishing_mark: 0.75,
                    shoulder_stop: 0.5,
                    bow_text: 1.0,
                },
                ShapeVetoConfig::new(VetoMode::Strict, 0.70, 0.10),
                DecisionThresholds::new(0.80, 0.60, 0.10),
            ),
            Self::V2 => (
                StandardWeights {
                    stamped_code: 2.0,
                    cut_count: 1.5,
                    cut_depths: 2.0,
                    bow_shape: 1.25,
                    blade_profile: 1.5,
                    groove_count: 1.0,
                    material: 0.75,
                    distinguishing_mark: 1.0,
                    shoulder_stop: 0.5,
                    bow_text: 1.0,
                },
                ShapeVetoConfig::new(VetoMode::soft(), 0.65, 0.12),
                DecisionThresholds::new(0.75, 0.55, 0.08),
            ),
            Self::V3 => (
                StandardWeights {
                    stamped_code: 1.5,
                    cut_count: 2.0,
                    cut_depths: 3.0,
                    bow_shape: 1.0,
                    blade_profile: 2.0,
                    groove_count: 1.5,
                    material: 0.25,
                    distinguishing_mark: 0.5,
                    shoulder_stop: 0.75,
                    bow_text: 0.5,
                },
                ShapeVetoConfig::new(VetoMode::Strict, 0.75, 0.08),
                DecisionThresholds::new(0.78, 0.58, 0.12),
            ),
        };

        MatchingStrategy {
            name: self.name().to_string(),
            description: self.description().to_string(),
            attributes: AttributeComparator::new(weights.specs(), DEFAULT_NEUTRAL_SIMILARITY),
            veto,
            thresholds,
        }
    }
}

impl std::fmt::Display for StrategyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Weights over the standard key attribute set.
struct StandardWeights {
    stamped_code: f64,
    cut_count: f64,
    cut_depths: f64,
    bow_shape: f64,
    blade_profile: f64,
    groove_count: f64,
    material: f64,
    distinguishing_mark: f64,
    shoulder_stop: f64,
    bow_text: f64,
}

impl StandardWeights {
    fn specs(&self) -> Vec<AttributeSpec> {
        vec![
            AttributeSpec::new("stamped_code", self.stamped_code, AttributeKind::categorical()),
            AttributeSpec::new(
                "cut_count",
                self.cut_count,
                AttributeKind::numeric(2.0, 1.0, 12.0),
            ),
            AttributeSpec::new("cut_depths", self.cut_depths, AttributeKind::categorical()),
            AttributeSpec::new(
                "bow_shape",
                self.bow_shape,
                AttributeKind::Categorical {
                    near_matches: bow_shape_near_matches(),
                },
            ),
            AttributeSpec::new(
                "blade_profile",
                self.blade_profile,
                AttributeKind::Categorical {
                    near_matches: vec![
                        NearMatch::new("warded", "skeleton", 0.5),
                        NearMatch::new("paracentric", "restricted", 0.4),
                    ],
                },
            ),
            AttributeSpec::new(
                "groove_count",
                self.groove_count,
                AttributeKind::numeric(2.0, 0.0, 10.0),
            ),
            AttributeSpec::new(
                "material",
                self.material,
                AttributeKind::Categorical {
                    near_matches: vec![
                        NearMatch::new("brass", "bronze", 0.6),
                        NearMatch::new("nickel", "nickel silver", 0.8),
                        NearMatch::new("nickel silver", "steel", 0.3),
                        NearMatch::new("steel", "stainless steel", 0.8),
                    ],
                },
            ),
            AttributeSpec::new(
                "distinguishing_mark",
                self.distinguishing_mark,
                AttributeKind::Text,
            ),
            AttributeSpec::new("shoulder_stop", self.shoulder_stop, AttributeKind::categorical()),
            AttributeSpec::new("bow_text", self.bow_text, AttributeKind::Text),
        ]
    }
}

/// Bow shapes the describer routinely confuses.
fn bow_shape_near_matches() -> Vec<NearMatch> {
    vec![
        NearMatch::new("round", "oval", 0.7),
        NearMatch::new("round", "circle", 0.9),
        NearMatch::new("square", "rectangular", 0.7),
        NearMatch::new("square", "rounded square", 0.6),
        NearMatch::new("hexagonal", "octagonal", 0.6),
        NearMatch::new("oval", "teardrop", 0.4),
    ]
}

/// A named, immutable scoring policy.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingStrategy {
    name: String,
    description: String,
    attributes: AttributeComparator,
    veto: ShapeVetoConfig,
    thresholds: DecisionThresholds,
}

impl MatchingStrategy {
    /// Build and validate a strategy.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        attributes: AttributeComparator,
        veto: ShapeVetoConfig,
        thresholds: DecisionThresholds,
    ) -> Result<Self> {
        let strategy = Self {
            name: name.into(),
            description: description.into(),
            attributes,
            veto,
            thresholds,
        };
        strategy
            .check()
            .map_err(|kind| KeyMatchError::strategy(format!("strategy '{}'", strategy.name), kind))?;
        Ok(strategy)
    }

    /// The built-in strategy for a version.
    #[must_use]
    pub fn builtin(version: StrategyVersion) -> Self {
        version.strategy()
    }

    fn check(&self) -> std::result::Result<(), StrategyErrorKind> {
        self.thresholds.validate()?;
        self.veto.validate()?;

        let neutral = self.attributes.neutral();
        if !(0.0..=1.0).contains(&neutral) {
            return Err(StrategyErrorKind::InvalidNeutral(neutral));
        }

        let mut any_positive = false;
        for spec in self.attributes.specs() {
            if !spec.weight.is_finite() || spec.weight < 0.0 {
                return Err(StrategyErrorKind::InvalidWeight {
                    attribute: spec.name.clone(),
                    value: spec.weight,
                });
            }
            any_positive |= spec.weight > 0.0;
        }
        if !any_positive {
            return Err(StrategyErrorKind::NoWeightedAttributes);
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The attribute table and neutral value.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeComparator {
        &self.attributes
    }

    #[must_use]
    pub const fn veto(&self) -> &ShapeVetoConfig {
        &self.veto
    }

    #[must_use]
    pub const fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Derive a new strategy with a different name and thresholds.
    ///
    /// The receiver is left untouched.
    pub fn with_thresholds(
        &self,
        name: impl Into<String>,
        thresholds: DecisionThresholds,
    ) -> Result<Self> {
        Self::new(
            name,
            self.description.clone(),
            self.attributes.clone(),
            self.veto,
            thresholds,
        )
    }

    /// Derive a new strategy with a different name and veto configuration.
    pub fn with_veto(&self, name: impl Into<String>, veto: ShapeVetoConfig) -> Result<Self> {
        Self::new(
            name,
            self.description.clone(),
            self.attributes.clone(),
            veto,
            self.thresholds,
        )
    }

    /// One-line summary for listings.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: match >= {:.2}, possible >= {:.2}, margin >= {:.2}, veto {} ({} attributes)",
            self.name,
            self.thresholds.match_threshold,
            self.thresholds.possible_threshold,
            self.thresholds.margin_threshold,
            self.veto.mode,
            self.attributes.len()
        )
    }
}

impl Default for MatchingStrategy {
    fn default() -> Self {
        StrategyVersion::DEFAULT.strategy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for version in StrategyVersion::all() {
            let strategy = version.strategy();
            assert!(strategy.check().is_ok(), "{version} should validate");
            assert_eq!(strategy.name(), version.name());
            assert_eq!(strategy.attributes().len(), 10);
        }
    }

    #[test]
    fn test_builtins_differ() {
        let v1 = StrategyVersion::V1.strategy();
        let v2 = StrategyVersion::V2.strategy();
        assert_eq!(v1.veto().mode, VetoMode::Strict);
        assert_eq!(v2.veto().mode, VetoMode::Soft { penalty: 0.88 });
        assert_ne!(v1.thresholds(), v2.thresholds());
    }

    #[test]
    fn test_version_from_name() {
        assert_eq!(StrategyVersion::from_name("V2"), Some(StrategyVersion::V2));
        assert_eq!(StrategyVersion::from_name("geometry"), Some(StrategyVersion::V3));
        assert_eq!(StrategyVersion::from_name("v4"), None);
        assert_eq!(MatchingStrategy::default().name(), "v2");
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let base = StrategyVersion::V2.strategy();
        let err = base
            .with_thresholds("broken", DecisionThresholds::new(1.2, 0.5, 0.1))
            .unwrap_err();
        assert!(matches!(
            err,
            KeyMatchError::Strategy {
                source: StrategyErrorKind::InvalidThreshold { .. },
                ..
            }
        ));

        let err = base
            .with_thresholds("inverted", DecisionThresholds::new(0.5, 0.7, 0.1))
            .unwrap_err();
        assert!(matches!(
            err,
            KeyMatchError::Strategy {
                source: StrategyErrorKind::InvertedThresholds { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let attrs = AttributeComparator::new(
            [AttributeSpec::new("material", -1.0, AttributeKind::categorical())],
            0.5,
        );
        let err = MatchingStrategy::new(
            "bad",
            "",
            attrs,
            ShapeVetoConfig::default(),
            DecisionThresholds::new(0.8, 0.6, 0.1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("strategy 'bad'"));
    }

    #[test]
    fn test_nan_neutral_rejected() {
        let attrs = AttributeComparator::new(
            [AttributeSpec::new("material", 1.0, AttributeKind::categorical())],
            f64::NAN,
        );
        let result = MatchingStrategy::new(
            "nan",
            "",
            attrs,
            ShapeVetoConfig::default(),
            DecisionThresholds::new(0.8, 0.6, 0.1),
        );
        assert!(matches!(
            result,
            Err(KeyMatchError::Strategy {
                source: StrategyErrorKind::InvalidNeutral(n),
                ..
            }) if n.is_nan()
        ));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let attrs = AttributeComparator::new(
            [AttributeSpec::new("material", 0.0, AttributeKind::categorical())],
            0.5,
        );
        let result = MatchingStrategy::new(
            "zero",
            "",
            attrs,
            ShapeVetoConfig::default(),
            DecisionThresholds::new(0.8, 0.6, 0.1),
        );
        assert!(matches!(
            result,
            Err(KeyMatchError::Strategy {
                source: StrategyErrorKind::NoWeightedAttributes,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_penalty_rejected() {
        let base = StrategyVersion::V2.strategy();
        let veto = ShapeVetoConfig::new(VetoMode::Soft { penalty: 1.5 }, 0.7, 0.1);
        assert!(base.with_veto("bad-penalty", veto).is_err());
    }

    #[test]
    fn test_derivation_leaves_base_untouched() {
        let base = StrategyVersion::V1.strategy();
        let before = base.clone();
        let derived = base
            .with_thresholds("v1-loose", DecisionThresholds::new(0.6, 0.4, 0.0))
            .unwrap();
        assert_eq!(base, before);
        assert_eq!(derived.name(), "v1-loose");
        assert_eq!(derived.attributes(), base.attributes());
    }

    #[test]
    fn test_thresholds_yaml_names() {
        let t: DecisionThresholds =
            serde_yaml::from_str("match: 0.8\npossible: 0.6\nmargin: 0.1\n").unwrap();
        assert_eq!(t, DecisionThresholds::new(0.8, 0.6, 0.1));
    }

    #[test]
    fn test_summary() {
        let summary = StrategyVersion::V2.strategy().summary();
        assert!(summary.starts_with("v2:"));
        assert!(summary.contains("soft"));
    }
}
