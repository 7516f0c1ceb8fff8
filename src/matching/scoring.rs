//! Whole-signature comparison.
//!
//! [`SignatureComparator`] combines per-attribute similarities into a
//! weighted mean using the strategy's weights, then applies the shape veto.

use super::attributes::AttributeStatus;
use super::explain::{MatchExplanation, ScoreComponent};
use super::shape::{self, ShapeEvaluation, ShapeVerdict};
use super::strategy::MatchingStrategy;
use crate::matching::attributes::AttributeKind;
use crate::model::Signature;
use indexmap::IndexMap;
use serde::Serialize;

/// One attribute's part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeScore {
    /// Similarity in 0.0 - 1.0 (neutral when data was missing)
    pub similarity: f64,
    /// Strategy weight for this attribute
    pub weight: f64,
    /// `similarity * weight`, or 0 when the attribute was absent on both sides
    pub contribution: f64,
    pub status: AttributeStatus,
}

/// Coarse diagnostic label for a comparison. Not used for decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTypeHint {
    /// Every compared categorical attribute agreed exactly
    StrongCategoricalMatch,
    /// Mixed evidence with an overall score of at least one half
    PartialMatch,
    /// Mostly disagreeing evidence
    WeakMatch,
    /// The shape check failed
    GeometryMismatch,
    /// No weighted attribute was present on either side
    InsufficientData,
}

impl MatchTypeHint {
    /// Kebab-case label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StrongCategoricalMatch => "strong-categorical-match",
            Self::PartialMatch => "partial-match",
            Self::WeakMatch => "weak-match",
            Self::GeometryMismatch => "geometry-mismatch",
            Self::InsufficientData => "insufficient-data",
        }
    }
}

impl std::fmt::Display for MatchTypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of comparing two signatures under one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Final similarity after the shape veto (0.0 - 1.0)
    pub overall_similarity: f64,
    /// Weighted attribute score before the shape veto
    pub attribute_similarity: f64,
    /// Per-attribute breakdown, in strategy order
    pub per_attribute: IndexMap<String, AttributeScore>,
    pub shape: ShapeEvaluation,
    pub match_type_hint: MatchTypeHint,
}

impl ComparisonResult {
    /// Sum of weights that took part in the weighted mean.
    #[must_use]
    pub fn applied_weight(&self) -> f64 {
        self.per_attribute
            .values()
            .filter(|s| s.status != AttributeStatus::Absent)
            .map(|s| s.weight)
            .sum()
    }

    /// One-line summary of the comparison.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:.3} ({}; attributes {:.3}, shape {:?})",
            self.overall_similarity,
            self.match_type_hint,
            self.attribute_similarity,
            self.shape.verdict
        )
    }
}

/// Aggregates attribute similarities and the shape veto.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureComparator;

impl SignatureComparator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compare a query against one candidate.
    ///
    /// Deterministic for identical inputs. Attributes absent from both
    /// signatures carry no weight; when no weight applies at all the
    /// overall similarity is 0 with an `InsufficientData` hint.
    #[must_use]
    pub fn compare(
        &self,
        query: &Signature,
        candidate: &Signature,
        strategy: &MatchingStrategy,
    ) -> ComparisonResult {
        let attributes = strategy.attributes();
        let mut per_attribute = IndexMap::with_capacity(attributes.len());
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        for spec in attributes.specs() {
            let outcome = attributes.compare_detailed(
                &spec.name,
                query.attribute(&spec.name),
                candidate.attribute(&spec.name),
            );
            let contribution = if outcome.status == AttributeStatus::Absent {
                0.0
            } else {
                total_weight += spec.weight;
                weighted += spec.weight * outcome.similarity;
                spec.weight * outcome.similarity
            };
            per_attribute.insert(
                spec.name.clone(),
                AttributeScore {
                    similarity: outcome.similarity,
                    weight: spec.weight,
                    contribution,
                    status: outcome.status,
                },
            );
        }

        let shape = shape::evaluate(
            query.shape_descriptor(),
            candidate.shape_descriptor(),
            strategy.veto(),
        );

        if total_weight <= 0.0 {
            return ComparisonResult {
                overall_similarity: 0.0,
                attribute_similarity: 0.0,
                per_attribute,
                shape,
                match_type_hint: MatchTypeHint::InsufficientData,
            };
        }

        let attribute_similarity = (weighted / total_weight).clamp(0.0, 1.0);
        let overall_similarity = shape
            .adjust(attribute_similarity, strategy.veto().mode)
            .clamp(0.0, 1.0);
        let match_type_hint =
            classify_hint(strategy, &per_attribute, &shape, overall_similarity);

        ComparisonResult {
            overall_similarity,
            attribute_similarity,
            per_attribute,
            shape,
            match_type_hint,
        }
    }

    /// Human-readable account of a comparison.
    #[must_use]
    pub fn explain(
        &self,
        query: &Signature,
        candidate: &Signature,
        strategy: &MatchingStrategy,
    ) -> MatchExplanation {
        let result = self.compare(query, candidate, strategy);
        let passes = result.overall_similarity >= strategy.thresholds().possible_threshold;

        let reason = match result.match_type_hint {
            MatchTypeHint::InsufficientData => {
                "no weighted attribute is present on either signature".to_string()
            }
            MatchTypeHint::GeometryMismatch => format!(
                "outlines disagree ({:?} under {} veto)",
                result.shape.verdict,
                strategy.veto().mode
            ),
            hint => format!(
                "{hint} with attribute score {:.2}",
                result.attribute_similarity
            ),
        };

        let mut explanation = if passes {
            MatchExplanation::matched(result.overall_similarity, reason)
        } else {
            MatchExplanation::no_match(result.overall_similarity, reason)
        };
        explanation = explanation.with_strategy(strategy.name());

        let total = result.applied_weight();
        for (name, score) in &result.per_attribute {
            let kind = strategy
                .attributes()
                .spec(name)
                .map_or("inferred", |s| s.kind.name());
            explanation = explanation.with_score_component(ScoreComponent {
                name: name.clone(),
                weight: score.weight,
                raw_score: score.similarity,
                weighted_score: if total > 0.0 {
                    score.contribution / total
                } else {
                    0.0
                },
                description: format!("{kind}, {}", status_label(score.status)),
            });
        }

        explanation.with_shape(result.shape)
    }
}

const fn status_label(status: AttributeStatus) -> &'static str {
    match status {
        AttributeStatus::Compared => "compared",
        AttributeStatus::Neutral => "neutral (missing or unusable)",
        AttributeStatus::Absent => "absent on both sides",
    }
}

fn classify_hint(
    strategy: &MatchingStrategy,
    per_attribute: &IndexMap<String, AttributeScore>,
    shape: &ShapeEvaluation,
    overall: f64,
) -> MatchTypeHint {
    if !shape.passed() {
        return MatchTypeHint::GeometryMismatch;
    }

    let mut categorical = per_attribute
        .iter()
        .filter(|(_, s)| s.status == AttributeStatus::Compared && s.weight > 0.0)
        .filter(|(name, _)| {
            matches!(
                strategy.attributes().spec(name).map(|s| &s.kind),
                Some(AttributeKind::Categorical { .. })
            )
        })
        .peekable();

    if categorical.peek().is_some() && categorical.all(|(_, s)| s.similarity >= 1.0) {
        MatchTypeHint::StrongCategoricalMatch
    } else if overall >= 0.5 {
        MatchTypeHint::PartialMatch
    } else {
        MatchTypeHint::WeakMatch
    }
}
