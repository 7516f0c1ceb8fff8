//! **Key-signature matching: which known key is this one?**
//!
//! `keymatch` compares a structured description of a physical key (a
//! [`Signature`]) against an inventory of stored keys and decides whether one
//! of them is the same key. Every call returns a [`MatchOutcome`] carrying one
//! of three decisions:
//!
//! - **MATCH**: one candidate scores high enough and clearly beats the rest.
//! - **POSSIBLE**: a plausible candidate that needs human confirmation.
//! - **NO_MATCH**: nothing in the inventory is close enough.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Signature`] and [`InventoryCandidate`], plus JSON loading.
//! - **[`matching`]**: per-attribute comparison, the shape veto, weighted
//!   aggregation, versioned [`MatchingStrategy`] bundles and the
//!   [`MatchingEngine`] that applies the decision rule.
//! - **[`config`]**: YAML configuration, strategy definitions and validation.
//! - **[`reports`]**: summary and JSON renderings of outcomes.
//!
//! The strategy is always an explicit argument. Nothing in the core reads
//! global state, so two calls with the same inputs always agree.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use keymatch::matching::{MatchingEngine, StrategyVersion};
//! use keymatch::model::{load_inventory, load_signature};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let query = load_signature(Path::new("described.json"))?;
//!     let inventory = load_inventory(Path::new("keys.json"))?;
//!
//!     let strategy = StrategyVersion::DEFAULT.strategy();
//!     let outcome = MatchingEngine::default().match_signature(&query, &inventory, &strategy)?;
//!
//!     println!(
//!         "{}: {} ({:.2}, margin {:.2})",
//!         outcome.decision,
//!         outcome.best_candidate_id.as_deref().unwrap_or("none"),
//!         outcome.best_score,
//!         outcome.margin
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Strategies
//!
//! Strategies can be derived from a built-in one and registered by name.
//!
//! ```
//! use keymatch::matching::{FallbackPolicy, StrategyDefinition, StrategyRegistry};
//!
//! let mut definition = StrategyDefinition::extending("workshop", "v1");
//! definition.weights.insert("material".to_string(), 0.0);
//!
//! let mut registry = StrategyRegistry::with_builtins();
//! registry.register_definitions(&[definition]).unwrap();
//!
//! let strategy = registry.resolve(Some("workshop"), FallbackPolicy::Strict).unwrap();
//! assert_eq!(strategy.name(), "workshop");
//! assert!(registry.resolve(Some("v9"), FallbackPolicy::Strict).is_err());
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `keymatch` library crate. The binary wraps
//! it with `match`, `compare` and `strategies` subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Counts and indices feed f64 scoring math
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `query`/`quality` or `best`/`rest` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{ErrorContext, KeyMatchError, Result};
pub use matching::{
    match_signature, ComparisonResult, Decision, DecisionThresholds, FallbackPolicy,
    MatchOutcome, MatchReport, MatchingEngine, MatchingStrategy, SignatureComparator,
    StrategyDefinition, StrategyRegistry, StrategyVersion,
};
pub use model::{AttributeValue, InventoryCandidate, ShapeDescriptor, Signature};
pub use reports::{OutputFormat, ReportGenerator};
