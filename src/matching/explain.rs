//! Human-readable explanations of signature comparisons.

use super::shape::{ShapeEvaluation, ShapeVerdict};
use serde::Serialize;

/// Explanation of why two signatures scored the way they did.
///
/// Useful for auditing a decision before a duplicate key is cut.
#[derive(Debug, Clone, Serialize)]
pub struct MatchExplanation {
    /// Strategy the comparison ran under
    pub strategy: Option<String>,
    /// Final similarity
    pub score: f64,
    /// Human-readable reason
    pub reason: String,
    /// Per-attribute breakdown
    pub score_breakdown: Vec<ScoreComponent>,
    /// Geometry check, if it was evaluated
    pub shape: Option<ShapeEvaluation>,
    /// Whether the score reached the POSSIBLE threshold
    pub is_match: bool,
}

/// One attribute's part in the overall score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreComponent {
    /// Attribute name
    pub name: String,
    /// Strategy weight
    pub weight: f64,
    /// Similarity before weighting
    pub raw_score: f64,
    /// Share of the final attribute score
    pub weighted_score: f64,
    /// Kind and resolution of the comparison
    pub description: String,
}

impl MatchExplanation {
    /// Explanation for a pair that reached the POSSIBLE threshold.
    pub fn matched(score: f64, reason: impl Into<String>) -> Self {
        Self::build(score, reason, true)
    }

    /// Explanation for a pair below the POSSIBLE threshold.
    pub fn no_match(score: f64, reason: impl Into<String>) -> Self {
        Self::build(score, reason, false)
    }

    fn build(score: f64, reason: impl Into<String>, is_match: bool) -> Self {
        Self {
            strategy: None,
            score,
            reason: reason.into(),
            score_breakdown: Vec::new(),
            shape: None,
            is_match,
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, name: impl Into<String>) -> Self {
        self.strategy = Some(name.into());
        self
    }

    /// Add an attribute to the breakdown.
    #[must_use]
    pub fn with_score_component(mut self, component: ScoreComponent) -> Self {
        self.score_breakdown.push(component);
        self
    }

    #[must_use]
    pub const fn with_shape(mut self, shape: ShapeEvaluation) -> Self {
        self.shape = Some(shape);
        self
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let label = if self.is_match { "CANDIDATE" } else { "NO MATCH" };
        format!("{label} ({:.0}% similar): {}", self.score * 100.0, self.reason)
    }

    /// Multi-line explanation with the attribute breakdown.
    #[must_use]
    pub fn detailed(&self) -> String {
        let mut lines = vec![self.summary()];

        if let Some(strategy) = &self.strategy {
            lines.push(format!("Scored with strategy {strategy}"));
        }

        if !self.score_breakdown.is_empty() {
            lines.push("Attribute breakdown:".to_string());
            for component in &self.score_breakdown {
                lines.push(format!(
                    "  - {}: {:.2} x {:.2} = {:.2} ({})",
                    component.name,
                    component.raw_score,
                    component.weight,
                    component.weighted_score,
                    component.description
                ));
            }
        }

        if let Some(shape) = &self.shape {
            lines.push(describe_shape(shape));
        }

        lines.join("\n")
    }
}

fn describe_shape(shape: &ShapeEvaluation) -> String {
    if shape.verdict == ShapeVerdict::Skipped {
        return "Geometry: not compared (no shape on one side)".to_string();
    }
    let moments = shape
        .similarity
        .map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}"));
    let outline = shape
        .distance
        .map_or_else(|| "n/a".to_string(), |d| format!("{d:.3}"));
    format!(
        "Geometry: {:?} (moments {moments}, outline distance {outline})",
        shape.verdict
    )
}

impl std::fmt::Display for MatchExplanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explanation_matched() {
        let explanation = MatchExplanation::matched(0.92, "stamped code agrees");
        assert!(explanation.is_match);
        assert!(explanation.summary().contains("92%"));
        assert!(explanation.summary().starts_with("CANDIDATE"));
    }

    #[test]
    fn test_explanation_no_match() {
        let explanation = MatchExplanation::no_match(0.2, "nothing agrees");
        assert!(!explanation.is_match);
        assert!(format!("{explanation}").contains("NO MATCH"));
    }

    #[test]
    fn test_explanation_breakdown() {
        let explanation = MatchExplanation::matched(0.8, "partial")
            .with_strategy("v1")
            .with_score_component(ScoreComponent {
                name: "bow_shape".to_string(),
                weight: 1.0,
                raw_score: 0.7,
                weighted_score: 0.35,
                description: "categorical, compared".to_string(),
            })
            .with_shape(ShapeEvaluation::skipped());

        let detailed = explanation.detailed();
        assert!(detailed.contains("Attribute breakdown:"));
        assert!(detailed.contains("bow_shape: 0.70 x 1.00"));
        assert!(detailed.contains("strategy v1"));
        assert!(detailed.contains("not compared"));
    }
}
