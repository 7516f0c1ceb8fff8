//! Geometric plausibility veto.
//!
//! Two checks decide whether a pair of outlines could belong to the same
//! key. The first is a weighted agreement of their invariant moments. The
//! second is the average nearest-neighbour distance between their contour
//! points. A failed check either zeroes the attribute score (strict) or
//! scales it down (soft). Geometry can only veto; a signature without a
//! shape descriptor is never penalized for it.

use crate::error::StrategyErrorKind;
use crate::model::{Point, ShapeDescriptor};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weights for the first moments; later moments use [`MOMENT_WEIGHT_FLOOR`].
pub const MOMENT_WEIGHTS: [f64; 7] = [1.0, 0.8, 0.6, 0.4, 0.3, 0.2, 0.1];

/// Weight for every moment past the scheduled ones.
pub const MOMENT_WEIGHT_FLOOR: f64 = 0.05;

/// Default soft-veto multiplier.
pub const DEFAULT_SOFT_PENALTY: f64 = 0.88;

/// Weight of the moment at `index`.
#[must_use]
pub fn moment_weight(index: usize) -> f64 {
    MOMENT_WEIGHTS
        .get(index)
        .copied()
        .unwrap_or(MOMENT_WEIGHT_FLOOR)
}

/// What happens when the geometry check fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VetoMode {
    /// Evaluate and report, never adjust the score
    Off,
    /// Force the score to zero
    Strict,
    /// Multiply the score by `penalty`
    Soft { penalty: f64 },
}

impl VetoMode {
    /// Soft mode with the default penalty.
    #[must_use]
    pub const fn soft() -> Self {
        Self::Soft {
            penalty: DEFAULT_SOFT_PENALTY,
        }
    }

    /// Short name for display.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Strict => "strict",
            Self::Soft { .. } => "soft",
        }
    }
}

impl std::fmt::Display for VetoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Soft { penalty } => write!(f, "soft (x{penalty:.2})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Mode plus the two limits that define "geometrically plausible".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShapeVetoConfig {
    #[serde(flatten)]
    pub mode: VetoMode,
    /// Minimum acceptable moment similarity (0.0 - 1.0)
    pub moment_floor: f64,
    /// Maximum acceptable outline distance, in contour units
    pub distance_ceiling: f64,
}

impl ShapeVetoConfig {
    #[must_use]
    pub const fn new(mode: VetoMode, moment_floor: f64, distance_ceiling: f64) -> Self {
        Self {
            mode,
            moment_floor,
            distance_ceiling,
        }
    }

    /// Check the limits and the soft penalty.
    pub fn validate(&self) -> Result<(), StrategyErrorKind> {
        if !(0.0..=1.0).contains(&self.moment_floor) {
            return Err(StrategyErrorKind::InvalidVeto {
                name: "moment_floor".to_string(),
                value: self.moment_floor,
            });
        }
        if !(self.distance_ceiling > 0.0 && self.distance_ceiling.is_finite()) {
            return Err(StrategyErrorKind::InvalidVeto {
                name: "distance_ceiling".to_string(),
                value: self.distance_ceiling,
            });
        }
        if let VetoMode::Soft { penalty } = self.mode {
            if !(penalty > 0.0 && penalty < 1.0) {
                return Err(StrategyErrorKind::InvalidVeto {
                    name: "penalty".to_string(),
                    value: penalty,
                });
            }
        }
        Ok(())
    }

    /// Same limits, veto disabled.
    #[must_use]
    pub const fn disabled(self) -> Self {
        Self {
            mode: VetoMode::Off,
            ..self
        }
    }
}

impl Default for ShapeVetoConfig {
    fn default() -> Self {
        Self::new(VetoMode::soft(), 0.70, 0.10)
    }
}

/// Result of the geometry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeVerdict {
    /// At least one signature had no shape descriptor
    Skipped,
    /// Geometry is plausible
    Passed,
    /// Geometry failed; score multiplied by the soft penalty
    Penalized,
    /// Geometry failed; score forced to zero
    Vetoed,
    /// Geometry failed but the veto is off
    Failed,
}

impl ShapeVerdict {
    /// Whether the candidate cleared (or bypassed) the geometry check.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Skipped | Self::Passed)
    }
}

/// Full shape evaluation for one pair of signatures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeEvaluation {
    pub verdict: ShapeVerdict,
    /// Weighted moment similarity, when either side had moments
    pub similarity: Option<f64>,
    /// Symmetric outline distance, when both sides had contours
    pub distance: Option<f64>,
}

impl ShapeEvaluation {
    /// Evaluation for a pair where one side has no shape at all.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            verdict: ShapeVerdict::Skipped,
            similarity: None,
            distance: None,
        }
    }

    /// Whether the candidate cleared (or bypassed) the geometry check.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.verdict.passed()
    }

    /// Apply the verdict to an attribute-derived score.
    #[must_use]
    pub fn adjust(&self, score: f64, mode: VetoMode) -> f64 {
        match (self.verdict, mode) {
            (ShapeVerdict::Vetoed, _) => 0.0,
            (ShapeVerdict::Penalized, VetoMode::Soft { penalty }) => score * penalty,
            _ => score,
        }
    }
}

/// Evaluate geometric consistency between two optional shapes.
#[must_use]
pub fn evaluate(
    a: Option<&ShapeDescriptor>,
    b: Option<&ShapeDescriptor>,
    config: &ShapeVetoConfig,
) -> ShapeEvaluation {
    let (Some(a), Some(b)) = (
        a.filter(|s| !s.is_empty()),
        b.filter(|s| !s.is_empty()),
    ) else {
        return ShapeEvaluation::skipped();
    };

    let similarity = moment_similarity(&a.moments, &b.moments);
    let distance = match (a.contour_points(), b.contour_points()) {
        (Some(ca), Some(cb)) => Some(symmetric_contour_distance(ca, cb)),
        _ => None,
    };

    let moments_ok = similarity.map_or(true, |s| s >= config.moment_floor);
    let outline_ok = distance.map_or(true, |d| d <= config.distance_ceiling);

    let verdict = if moments_ok && outline_ok {
        ShapeVerdict::Passed
    } else {
        match config.mode {
            VetoMode::Strict => ShapeVerdict::Vetoed,
            VetoMode::Soft { .. } => ShapeVerdict::Penalized,
            VetoMode::Off => ShapeVerdict::Failed,
        }
    };

    ShapeEvaluation {
        verdict,
        similarity,
        distance,
    }
}

/// Weighted agreement of two moment sequences.
///
/// Each index scores `1 - |a - b| / max(|a|, |b|)`; an index present on
/// only one side scores 0. Returns `None` when neither side has moments.
#[must_use]
pub fn moment_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    let len = a.len().max(b.len());
    if len == 0 {
        return None;
    }

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for i in 0..len {
        let weight = moment_weight(i);
        let score = match (a.get(i), b.get(i)) {
            (Some(&x), Some(&y)) => pair_similarity(x, y),
            _ => 0.0,
        };
        weighted += weight * score;
        total_weight += weight;
    }

    Some((weighted / total_weight).clamp(0.0, 1.0))
}

fn pair_similarity(x: f64, y: f64) -> f64 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let scale = x.abs().max(y.abs());
    if scale == 0.0 {
        return 1.0;
    }
    (1.0 - (x - y).abs() / scale).clamp(0.0, 1.0)
}

/// Mean distance from each point of `from` to its nearest point in `to`.
#[must_use]
pub fn directed_contour_distance(from: &[Point], to: &[Point]) -> f64 {
    if from.is_empty() || to.is_empty() {
        return 0.0;
    }
    let total: f64 = from
        .iter()
        .map(|p| {
            to.iter()
                .map(|q| p.distance(q))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / from.len() as f64
}

/// Outline discrepancy averaged over both directions, so the result does
/// not depend on which signature is the query.
#[must_use]
pub fn symmetric_contour_distance(a: &[Point], b: &[Point]) -> f64 {
    (directed_contour_distance(a, b) + directed_contour_distance(b, a)) / 2.0
}
