//! Default values for keymatch configuration.

use crate::matching::StrategyVersion;

/// Strategy used when neither the config file nor the CLI names one.
pub const DEFAULT_STRATEGY: &str = StrategyVersion::DEFAULT.name();

/// Inventory size at which the engine scores in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = crate::matching::DEFAULT_PARALLEL_THRESHOLD;

/// Number of candidates listed in a report's ranking.
pub const DEFAULT_RANKING_DEPTH: usize = crate::matching::DEFAULT_RANKING_DEPTH;

/// Upper bound on the ranking depth accepted from configuration.
pub const MAX_RANKING_DEPTH: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_is_builtin() {
        assert_eq!(DEFAULT_STRATEGY, "v2");
        assert!(StrategyVersion::from_name(DEFAULT_STRATEGY).is_some());
        assert!(DEFAULT_RANKING_DEPTH <= MAX_RANKING_DEPTH);
    }
}
