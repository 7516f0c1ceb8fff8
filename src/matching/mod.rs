//! Key-signature matching engine.
//!
//! Decides which key in an inventory a described key is, if any.
//!
//! # Architecture
//!
//! - [`AttributeComparator`]: similarity of one attribute (categorical,
//!   numeric or free text)
//! - [`shape`]: geometric plausibility veto over moments and outlines
//! - [`SignatureComparator`]: weighted aggregate plus breakdown
//! - [`MatchingStrategy`]: immutable bundle of weights, veto and thresholds
//! - [`MatchingEngine`]: best-two selection and MATCH / POSSIBLE / NO_MATCH
//!
//! The strategy is always passed in explicitly; [`StrategyRegistry`] is a
//! convenience for resolving names at the boundary.
//!
//! # Example
//!
//! ```
//! use keymatch::matching::{Decision, MatchingEngine, StrategyVersion};
//! use keymatch::model::{AttributeValue, InventoryCandidate, Signature};
//!
//! let query = Signature::new()
//!     .with_attribute("stamped_code", AttributeValue::label("KW1"))
//!     .with_attribute("bow_shape", AttributeValue::label("round"));
//! let inventory = vec![InventoryCandidate::new(
//!     "front-door",
//!     Signature::new()
//!         .with_attribute("stamped_code", AttributeValue::label("kw-1"))
//!         .with_attribute("bow_shape", AttributeValue::label("Round")),
//! )];
//!
//! let strategy = StrategyVersion::V1.strategy();
//! let outcome = MatchingEngine::default()
//!     .match_signature(&query, &inventory, &strategy)
//!     .unwrap();
//! assert_eq!(outcome.decision, Decision::Match);
//! ```

pub mod attributes;
mod definition;
mod engine;
mod explain;
mod registry;
pub mod scoring;
pub mod shape;
mod strategy;
pub mod text;

pub use attributes::{
    AttributeComparator, AttributeKind, AttributeOutcome, AttributeSpec, AttributeStatus,
    NearMatch, DEFAULT_NEUTRAL_SIMILARITY,
};
pub use definition::StrategyDefinition;
pub use engine::{
    match_signature, Decision, EngineConfig, MatchOutcome, MatchReport, MatchingEngine,
    RankedCandidate, SkippedCandidate, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_RANKING_DEPTH,
};
pub use explain::{MatchExplanation, ScoreComponent};
pub use registry::{FallbackPolicy, StrategyRegistry};
pub use scoring::{AttributeScore, ComparisonResult, MatchTypeHint, SignatureComparator};
pub use shape::{ShapeEvaluation, ShapeVerdict, ShapeVetoConfig, VetoMode};
pub use strategy::{DecisionThresholds, MatchingStrategy, StrategyVersion};
