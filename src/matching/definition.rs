//! User-defined strategies loaded from configuration.
//!
//! A definition either extends an existing strategy (overriding weights,
//! thresholds or the veto) or declares a complete attribute table of its
//! own.
//!
//! ```yaml
//! strategies:
//!   - name: workshop
//!     extends: v1
//!     weights:
//!       material: 0.0
//!     thresholds:
//!       match: 0.85
//!       possible: 0.65
//!       margin: 0.10
//! ```

use super::attributes::{AttributeComparator, AttributeSpec, DEFAULT_NEUTRAL_SIMILARITY};
use super::shape::ShapeVetoConfig;
use super::strategy::{DecisionThresholds, MatchingStrategy, StrategyVersion};
use crate::error::{KeyMatchError, Result, StrategyErrorKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A strategy described in a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StrategyDefinition {
    /// Name the strategy is registered under
    pub name: String,

    /// One-line description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Strategy to start from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Weight overrides for attributes of the base strategy
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub weights: BTreeMap<String, f64>,

    /// Attributes to add, or to replace in the base strategy
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,

    /// Similarity used when data is missing on one side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutral: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub veto: Option<ShapeVetoConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<DecisionThresholds>,
}

impl StrategyDefinition {
    /// Start a definition that extends `base`.
    pub fn extending(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: Some(base.into()),
            ..Self::default()
        }
    }

    /// Build a strategy, resolving `extends` through `lookup`.
    ///
    /// `lookup` receives the base name and returns the strategy it refers
    /// to, if any.
    pub fn build<'a, F>(&self, lookup: F) -> Result<MatchingStrategy>
    where
        F: Fn(&str) -> Option<&'a MatchingStrategy>,
    {
        let context = || format!("definition '{}'", self.name);
        if self.name.trim().is_empty() {
            return Err(KeyMatchError::validation("strategy definition without a name"));
        }

        let base = match &self.extends {
            Some(base_name) => Some(lookup(base_name).ok_or_else(|| {
                KeyMatchError::strategy(
                    context(),
                    StrategyErrorKind::UnknownBase(base_name.clone()),
                )
            })?),
            None if self.attributes.is_empty() => {
                return Err(KeyMatchError::strategy(
                    context(),
                    StrategyErrorKind::EmptyDefinition,
                ))
            }
            None => None,
        };

        let mut specs: Vec<AttributeSpec> = base
            .map(|b| b.attributes().specs().cloned().collect())
            .unwrap_or_default();

        for (attribute, weight) in &self.weights {
            let spec = specs
                .iter_mut()
                .find(|s| &s.name == attribute)
                .ok_or_else(|| {
                    KeyMatchError::strategy(
                        context(),
                        StrategyErrorKind::UnknownAttribute(attribute.clone()),
                    )
                })?;
            spec.weight = *weight;
        }

        for spec in &self.attributes {
            match specs.iter_mut().find(|s| s.name == spec.name) {
                Some(existing) => *existing = spec.clone(),
                None => specs.push(spec.clone()),
            }
        }

        let fallback = StrategyVersion::DEFAULT.strategy();
        let template = base.unwrap_or(&fallback);

        let neutral = self.neutral.unwrap_or_else(|| {
            base.map_or(DEFAULT_NEUTRAL_SIMILARITY, |b| b.attributes().neutral())
        });
        if !(0.0..=1.0).contains(&neutral) {
            return Err(KeyMatchError::validation(format!(
                "{}: neutral similarity {neutral} is outside 0.0-1.0",
                context()
            )));
        }

        let description = self.description.clone().unwrap_or_else(|| {
            base.map_or_else(
                || "Custom strategy".to_string(),
                |b| format!("Derived from {}", b.name()),
            )
        });

        MatchingStrategy::new(
            self.name.clone(),
            description,
            AttributeComparator::new(specs, neutral),
            self.veto.unwrap_or(*template.veto()),
            self.thresholds.unwrap_or(*template.thresholds()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::attributes::AttributeKind;
    use crate::matching::shape::VetoMode;

    fn builtin(name: &str) -> Option<MatchingStrategy> {
        StrategyVersion::from_name(name).map(|v| v.strategy())
    }

    #[test]
    fn test_extend_with_weight_override() {
        let v1 = builtin("v1").unwrap();
        let mut def = StrategyDefinition::extending("no-material", "v1");
        def.weights.insert("material".to_string(), 0.0);

        let strategy = def
            .build(|n| (n == "v1").then_some(&v1))
            .unwrap();
        assert_eq!(strategy.name(), "no-material");
        assert_eq!(strategy.attributes().spec("material").unwrap().weight, 0.0);
        assert_eq!(strategy.thresholds(), v1.thresholds());
        assert_eq!(strategy.veto().mode, VetoMode::Strict);
        assert_eq!(strategy.description(), "Derived from v1");
    }

    #[test]
    fn test_unknown_base() {
        let def = StrategyDefinition::extending("x", "v9");
        let err = def.build(|_| None).unwrap_err();
        assert!(matches!(
            err,
            KeyMatchError::Strategy {
                source: StrategyErrorKind::UnknownBase(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_weight_attribute() {
        let v2 = builtin("v2").unwrap();
        let mut def = StrategyDefinition::extending("x", "v2");
        def.weights.insert("colour".to_string(), 1.0);
        let err = def.build(|_| Some(&v2)).unwrap_err();
        assert!(err.to_string().contains("definition 'x'"));
    }

    #[test]
    fn test_standalone_definition() {
        let def = StrategyDefinition {
            name: "codes-only".to_string(),
            attributes: vec![AttributeSpec::new(
                "stamped_code",
                1.0,
                AttributeKind::categorical(),
            )],
            ..StrategyDefinition::default()
        };
        let strategy = def.build(|_| None).unwrap();
        assert_eq!(strategy.attributes().len(), 1);
        assert_eq!(strategy.thresholds(), MatchingStrategy::default().thresholds());
    }

    #[test]
    fn test_empty_definition_rejected() {
        let def = StrategyDefinition {
            name: "empty".to_string(),
            ..StrategyDefinition::default()
        };
        assert!(matches!(
            def.build(|_| None),
            Err(KeyMatchError::Strategy {
                source: StrategyErrorKind::EmptyDefinition,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let v2 = builtin("v2").unwrap();
        let mut def = StrategyDefinition::extending("bad", "v2");
        def.thresholds = Some(DecisionThresholds::new(0.5, 0.9, 0.1));
        assert!(def.build(|_| Some(&v2)).is_err());
    }

    #[test]
    fn test_yaml_definition() {
        let yaml = r"
name: workshop
extends: v1
weights:
  material: 0.25
attributes:
  - name: key_blank
    weight: 2.0
    kind: categorical
veto:
  mode: soft
  penalty: 0.8
  moment_floor: 0.6
  distance_ceiling: 0.15
";
        let def: StrategyDefinition = serde_yaml::from_str(yaml).unwrap();
        let v1 = builtin("v1").unwrap();
        let strategy = def.build(|_| Some(&v1)).unwrap();
        assert_eq!(strategy.attributes().len(), 11);
        assert_eq!(strategy.veto().mode, VetoMode::Soft { penalty: 0.8 });
    }
}
