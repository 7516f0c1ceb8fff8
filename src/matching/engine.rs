//! Inventory matching.
//!
//! [`MatchingEngine`] scores a query signature against every inventory
//! candidate, keeps the best two, and classifies the result as MATCH,
//! POSSIBLE or NO_MATCH using the strategy's thresholds.
//!
//! Candidates that fail validation are skipped, never fatal. Large
//! inventories are scored in parallel; the best-two reduction breaks ties
//! on the original index, so parallel and sequential runs agree exactly.

use super::scoring::{ComparisonResult, MatchTypeHint, SignatureComparator};
use super::strategy::{DecisionThresholds, MatchingStrategy};
use crate::error::{ErrorContext, Result};
use crate::model::{InventoryCandidate, Signature};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default inventory size at which scoring switches to rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Default number of entries in a report's ranking.
pub const DEFAULT_RANKING_DEPTH: usize = 5;

/// Engine tuning. None of these settings change an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Inventories at least this large are scored in parallel
    pub parallel_threshold: usize,
    /// How many candidates [`MatchReport::ranking`] lists
    pub ranking_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            ranking_depth: DEFAULT_RANKING_DEPTH,
        }
    }
}

/// Decision category of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Confident and unambiguous
    Match,
    /// Plausible but needs confirmation
    Possible,
    /// Nothing in the inventory fits
    NoMatch,
}

impl Decision {
    /// Upper-case label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::Possible => "POSSIBLE",
            Self::NoMatch => "NO_MATCH",
        }
    }

    fn classify(best: f64, margin: f64, scored: usize, thresholds: &DecisionThresholds) -> Self {
        let unambiguous = scored == 1 || margin >= thresholds.margin_threshold;
        if best >= thresholds.match_threshold && unambiguous {
            Self::Match
        } else if best >= thresholds.possible_threshold {
            Self::Possible
        } else {
            Self::NoMatch
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of matching one query against an inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub decision: Decision,
    /// Set whenever at least one candidate was scored
    pub best_candidate_id: Option<String>,
    pub best_score: f64,
    /// Gap between the best and second-best score; 0 with fewer than two
    pub margin: f64,
    /// Comparison details for the best candidate
    pub breakdown: Option<ComparisonResult>,
    pub runner_up_id: Option<String>,
    pub candidates_scored: usize,
    /// Name of the strategy that produced this outcome
    pub strategy: String,
}

impl MatchOutcome {
    fn empty(strategy: &MatchingStrategy) -> Self {
        Self {
            decision: Decision::NoMatch,
            best_candidate_id: None,
            best_score: 0.0,
            margin: 0.0,
            breakdown: None,
            runner_up_id: None,
            candidates_scored: 0,
            strategy: strategy.name().to_string(),
        }
    }

    /// Whether the decision is MATCH.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.decision == Decision::Match
    }
}

/// A candidate left out of scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    /// Position in the inventory as supplied
    pub index: usize,
    pub id: String,
    pub reason: String,
}

/// One row of a report's ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub index: usize,
    pub id: String,
    pub score: f64,
    pub match_type_hint: MatchTypeHint,
}

/// Outcome plus diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// Identical to what [`MatchingEngine::match_signature`] returns
    pub outcome: MatchOutcome,
    pub skipped: Vec<SkippedCandidate>,
    /// Best candidates first, ties in inventory order
    pub ranking: Vec<RankedCandidate>,
    /// Describer confidence of the query, as supplied
    pub query_confidence: f64,
}

struct Scored {
    index: usize,
    result: ComparisonResult,
}

enum Evaluated {
    Scored(Scored),
    Skipped(SkippedCandidate),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    index: usize,
    score: f64,
}

impl Entry {
    /// Higher score wins; equal scores go to the earlier candidate.
    fn beats(&self, other: &Self) -> bool {
        self.score > other.score || (self.score == other.score && self.index < other.index)
    }
}

/// Best and second-best entries. Merging is commutative and associative.
#[derive(Debug, Clone, Copy, Default)]
struct BestTwo {
    best: Option<Entry>,
    second: Option<Entry>,
}

impl BestTwo {
    fn push(mut self, entry: Entry) -> Self {
        match self.best {
            None => self.best = Some(entry),
            Some(best) if entry.beats(&best) => {
                self.second = Some(best);
                self.best = Some(entry);
            }
            Some(_) => match self.second {
                Some(second) if !entry.beats(&second) => {}
                _ => self.second = Some(entry),
            },
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        [other.best, other.second]
            .into_iter()
            .flatten()
            .fold(self, Self::push)
    }
}

/// Scores queries against inventories.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    config: EngineConfig,
    comparator: SignatureComparator,
}

impl MatchingEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            comparator: SignatureComparator::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Match `query` against `inventory` under `strategy`.
    ///
    /// Fails only when the query itself is invalid.
    pub fn match_signature(
        &self,
        query: &Signature,
        inventory: &[InventoryCandidate],
        strategy: &MatchingStrategy,
    ) -> Result<MatchOutcome> {
        Ok(self.match_with_report(query, inventory, strategy)?.outcome)
    }

    /// Like [`Self::match_signature`], also returning skipped candidates
    /// and a ranking of the best candidates.
    pub fn match_with_report(
        &self,
        query: &Signature,
        inventory: &[InventoryCandidate],
        strategy: &MatchingStrategy,
    ) -> Result<MatchReport> {
        query.validate().context("query")?;

        let parallel = inventory.len() >= self.config.parallel_threshold;
        let evaluate =
            |(index, candidate): (usize, &InventoryCandidate)| self.evaluate(index, candidate, query, strategy);

        let evaluated: Vec<Evaluated> = if parallel {
            inventory.par_iter().enumerate().map(evaluate).collect()
        } else {
            inventory.iter().enumerate().map(evaluate).collect()
        };

        let mut scored = Vec::with_capacity(evaluated.len());
        let mut skipped = Vec::new();
        for item in evaluated {
            match item {
                Evaluated::Scored(s) => scored.push(s),
                Evaluated::Skipped(s) => skipped.push(s),
            }
        }

        let entries = scored.iter().map(|s| Entry {
            index: s.index,
            score: s.result.overall_similarity,
        });
        let top = if parallel {
            entries
                .collect::<Vec<_>>()
                .into_par_iter()
                .fold(BestTwo::default, BestTwo::push)
                .reduce(BestTwo::default, BestTwo::merge)
        } else {
            entries.fold(BestTwo::default(), BestTwo::push)
        };

        let outcome = self.build_outcome(&top, &scored, inventory, strategy);
        let ranking = self.rank(&scored, inventory);

        Ok(MatchReport {
            outcome,
            skipped,
            ranking,
            query_confidence: query.confidence,
        })
    }

    fn evaluate(
        &self,
        index: usize,
        candidate: &InventoryCandidate,
        query: &Signature,
        strategy: &MatchingStrategy,
    ) -> Evaluated {
        if candidate.id.trim().is_empty() {
            return Evaluated::Skipped(SkippedCandidate {
                index,
                id: candidate.id.clone(),
                reason: "candidate has an empty id".to_string(),
            });
        }
        if let Err(err) = candidate.signature.validate() {
            return Evaluated::Skipped(SkippedCandidate {
                index,
                id: candidate.id.clone(),
                reason: err.to_string(),
            });
        }
        Evaluated::Scored(Scored {
            index,
            result: self.comparator.compare(query, &candidate.signature, strategy),
        })
    }

    fn build_outcome(
        &self,
        top: &BestTwo,
        scored: &[Scored],
        inventory: &[InventoryCandidate],
        strategy: &MatchingStrategy,
    ) -> MatchOutcome {
        let Some(best) = top.best else {
            return MatchOutcome::empty(strategy);
        };

        let margin = top.second.map_or(0.0, |second| best.score - second.score);
        let breakdown = scored
            .iter()
            .find(|s| s.index == best.index)
            .map(|s| s.result.clone());

        MatchOutcome {
            decision: Decision::classify(best.score, margin, scored.len(), strategy.thresholds()),
            best_candidate_id: Some(inventory[best.index].id.clone()),
            best_score: best.score,
            margin,
            breakdown,
            runner_up_id: top.second.map(|s| inventory[s.index].id.clone()),
            candidates_scored: scored.len(),
            strategy: strategy.name().to_string(),
        }
    }

    fn rank(&self, scored: &[Scored], inventory: &[InventoryCandidate]) -> Vec<RankedCandidate> {
        let mut order: Vec<&Scored> = scored.iter().collect();
        order.sort_by(|a, b| {
            b.result
                .overall_similarity
                .total_cmp(&a.result.overall_similarity)
                .then(a.index.cmp(&b.index))
        });
        order
            .into_iter()
            .take(self.config.ranking_depth)
            .map(|s| RankedCandidate {
                index: s.index,
                id: inventory[s.index].id.clone(),
                score: s.result.overall_similarity,
                match_type_hint: s.result.match_type_hint,
            })
            .collect()
    }
}

/// Match with a default-configured engine.
pub fn match_signature(
    query: &Signature,
    inventory: &[InventoryCandidate],
    strategy: &MatchingStrategy,
) -> Result<MatchOutcome> {
    MatchingEngine::default().match_signature(query, inventory, strategy)
}
