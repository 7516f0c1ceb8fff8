//! Registry of named matching strategies.
//!
//! The registry is built once (built-ins plus any configured definitions)
//! and then only read. Strategies are shared behind [`Arc`] so concurrent
//! matching calls can hold them without copying.

use super::definition::StrategyDefinition;
use super::strategy::{MatchingStrategy, StrategyVersion};
use super::text::closest_name;
use crate::error::{KeyMatchError, Result, StrategyErrorKind};
use indexmap::IndexMap;
use std::sync::Arc;

/// What to do when a requested strategy name is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Report `StrategyNotFound`
    #[default]
    Strict,
    /// Resolve to the registry's default strategy instead
    UseDefault,
}

/// Named, immutable strategies.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<MatchingStrategy>>,
    default_name: String,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl StrategyRegistry {
    /// Registry holding only the built-in versions.
    #[must_use]
    pub fn with_builtins() -> Self {
        let strategies = StrategyVersion::all()
            .iter()
            .map(|v| (v.name().to_string(), Arc::new(v.strategy())))
            .collect();
        Self {
            strategies,
            default_name: StrategyVersion::DEFAULT.name().to_string(),
        }
    }

    /// Add a strategy.
    ///
    /// Names are unique, and built-in names and aliases are reserved.
    pub fn register(&mut self, strategy: MatchingStrategy) -> Result<Arc<MatchingStrategy>> {
        let name = strategy.name().to_string();
        if self.strategies.contains_key(&name) || StrategyVersion::from_name(&name).is_some() {
            return Err(KeyMatchError::strategy(
                "register",
                StrategyErrorKind::Duplicate(name),
            ));
        }
        let strategy = Arc::new(strategy);
        self.strategies.insert(name, Arc::clone(&strategy));
        Ok(strategy)
    }

    /// Build and register definitions in order.
    ///
    /// A definition may extend any strategy registered before it, including
    /// earlier definitions in the same list.
    pub fn register_definitions(&mut self, definitions: &[StrategyDefinition]) -> Result<()> {
        for definition in definitions {
            let strategy = definition.build(|name| self.lookup(name))?;
            self.register(strategy)?;
        }
        Ok(())
    }

    /// Change which strategy [`FallbackPolicy::UseDefault`] resolves to.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.strategies.contains_key(name) {
            return Err(self.not_found(name));
        }
        self.default_name = name.to_string();
        Ok(())
    }

    /// Name of the default strategy.
    #[must_use]
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Look up a strategy by exact name, or by a built-in alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<MatchingStrategy>> {
        self.lookup(name).and_then(|s| self.strategies.get(s.name()).cloned())
    }

    fn lookup(&self, name: &str) -> Option<&MatchingStrategy> {
        self.strategies
            .get(name)
            .or_else(|| {
                StrategyVersion::from_name(name).and_then(|v| self.strategies.get(v.name()))
            })
            .map(|s| &**s)
    }

    /// Resolve a name under the given fallback policy.
    ///
    /// `None` always resolves to the default strategy.
    pub fn resolve(
        &self,
        name: Option<&str>,
        fallback: FallbackPolicy,
    ) -> Result<Arc<MatchingStrategy>> {
        let requested = name.unwrap_or(self.default_name.as_str());
        if let Some(strategy) = self.get(requested) {
            return Ok(strategy);
        }
        match fallback {
            FallbackPolicy::UseDefault => self
                .strategies
                .get(&self.default_name)
                .cloned()
                .ok_or_else(|| self.not_found(&self.default_name)),
            FallbackPolicy::Strict => Err(self.not_found(requested)),
        }
    }

    fn not_found(&self, name: &str) -> KeyMatchError {
        let suggestion = closest_name(name, self.names());
        KeyMatchError::strategy_not_found(name, suggestion)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Registered strategies, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MatchingStrategy>> {
        self.strategies.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::strategy::DecisionThresholds;

    #[test]
    fn test_builtins_registered() {
        let registry = StrategyRegistry::with_builtins();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["v1", "v2", "v3"]);
        assert_eq!(registry.default_name(), "v2");
        assert_eq!(registry.get("balanced").unwrap().name(), "v2");
    }

    #[test]
    fn test_resolve_strict_unknown() {
        let registry = StrategyRegistry::with_builtins();
        let err = registry
            .resolve(Some("v7"), FallbackPolicy::Strict)
            .unwrap_err();
        match err {
            KeyMatchError::StrategyNotFound { name, .. } => assert_eq!(name, "v7"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_suggests_close_name() {
        let mut registry = StrategyRegistry::with_builtins();
        registry
            .register_definitions(&[StrategyDefinition::extending("workshop", "v1")])
            .unwrap();
        let err = registry
            .resolve(Some("workshp"), FallbackPolicy::Strict)
            .unwrap_err();
        assert!(err.to_string().contains("did you mean 'workshop'"), "{err}");
    }

    #[test]
    fn test_resolve_with_fallback() {
        let registry = StrategyRegistry::with_builtins();
        let strategy = registry
            .resolve(Some("v7"), FallbackPolicy::UseDefault)
            .unwrap();
        assert_eq!(strategy.name(), "v2");
        let strategy = registry.resolve(None, FallbackPolicy::Strict).unwrap();
        assert_eq!(strategy.name(), "v2");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = StrategyRegistry::with_builtins();
        let err = registry
            .register(StrategyVersion::V1.strategy())
            .unwrap_err();
        assert!(matches!(
            err,
            KeyMatchError::Strategy {
                source: StrategyErrorKind::Duplicate(_),
                ..
            }
        ));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_builtin_alias_reserved() {
        let mut registry = StrategyRegistry::with_builtins();
        let mut shadow = StrategyDefinition::extending("balanced", "v1");
        shadow.thresholds = Some(DecisionThresholds::new(0.99, 0.98, 0.5));

        let err = registry.register_definitions(&[shadow]).unwrap_err();
        assert!(matches!(
            err,
            KeyMatchError::Strategy {
                source: StrategyErrorKind::Duplicate(ref name),
                ..
            } if name == "balanced"
        ));
        assert_eq!(registry.len(), 3);
        let resolved = registry
            .resolve(Some("balanced"), FallbackPolicy::Strict)
            .unwrap();
        assert_eq!(resolved.name(), "v2");
        assert_eq!(resolved.thresholds().match_threshold, 0.75);
    }

    #[test]
    fn test_definitions_chain() {
        let mut registry = StrategyRegistry::with_builtins();
        let mut strict = StrategyDefinition::extending("strict", "v2");
        strict.thresholds = Some(DecisionThresholds::new(0.9, 0.7, 0.15));
        let stricter = StrategyDefinition::extending("strict-no-material", "strict");
        registry
            .register_definitions(&[strict, stricter])
            .unwrap();

        let derived = registry.get("strict-no-material").unwrap();
        assert_eq!(derived.thresholds().match_threshold, 0.9);
        // Built-ins are untouched by derivation
        assert_eq!(registry.get("v2").unwrap().thresholds().match_threshold, 0.75);
    }

    #[test]
    fn test_set_default() {
        let mut registry = StrategyRegistry::with_builtins();
        registry.set_default("v3").unwrap();
        assert_eq!(
            registry
                .resolve(Some("nope"), FallbackPolicy::UseDefault)
                .unwrap()
                .name(),
            "v3"
        );
        assert!(registry.set_default("nope").is_err());
    }
}
