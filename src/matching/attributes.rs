//! Per-attribute comparison.
//!
//! [`AttributeComparator`] scores one named attribute between two
//! signatures. Every comparison is a pure function of its inputs and is
//! symmetric in its two values.

use super::text::{canonical_label, text_similarity};
use crate::model::AttributeValue;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Similarity assigned when data is missing or unusable on either side.
pub const DEFAULT_NEUTRAL_SIMILARITY: f64 = 0.5;

/// Partial credit for two labels that are easily confused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NearMatch {
    pub a: String,
    pub b: String,
    /// Credit awarded (0.0 - 1.0)
    pub credit: f64,
}

impl NearMatch {
    pub fn new(a: impl Into<String>, b: impl Into<String>, credit: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            credit,
        }
    }

    /// Whether this entry covers the (already canonical) pair, in either order.
    fn covers(&self, x: &str, y: &str) -> bool {
        let a = canonical_label(&self.a);
        let b = canonical_label(&self.b);
        (a == x && b == y) || (a == y && b == x)
    }
}

/// How an attribute's values are compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Exact label match, with optional partial credit for confusable pairs
    Categorical {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        near_matches: Vec<NearMatch>,
    },
    /// Linear falloff over `range`; values outside `[min, max]` are unusable
    Numeric {
        range: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Token-overlap similarity
    Text,
}

impl AttributeKind {
    /// Categorical kind without a near-match table.
    #[must_use]
    pub const fn categorical() -> Self {
        Self::Categorical {
            near_matches: Vec::new(),
        }
    }

    /// Numeric kind with a sanity window.
    #[must_use]
    pub const fn numeric(range: f64, min: f64, max: f64) -> Self {
        Self::Numeric {
            range,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Short name for display.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Categorical { .. } => "categorical",
            Self::Numeric { .. } => "numeric",
            Self::Text => "text",
        }
    }

    /// Guess a kind for an attribute no strategy declares.
    fn infer(a: &AttributeValue, b: &AttributeValue) -> Self {
        match (a, b) {
            (AttributeValue::Numeric(_), AttributeValue::Numeric(_)) => Self::Numeric {
                range: 1.0,
                min: None,
                max: None,
            },
            (AttributeValue::Text(_), _) | (_, AttributeValue::Text(_)) => Self::Text,
            _ => Self::categorical(),
        }
    }

    /// Score two populated values. `None` means the pair is unusable and
    /// should be treated as missing.
    fn similarity(&self, a: &AttributeValue, b: &AttributeValue) -> Option<f64> {
        match self {
            Self::Categorical { near_matches } => {
                let x = canonical_label(&a.as_text()?);
                let y = canonical_label(&b.as_text()?);
                if x.is_empty() || y.is_empty() {
                    return None;
                }
                if x == y {
                    return Some(1.0);
                }
                let credit = near_matches
                    .iter()
                    .filter(|n| n.covers(&x, &y))
                    .map(|n| n.credit.clamp(0.0, 1.0))
                    .fold(0.0, f64::max);
                Some(credit)
            }
            Self::Numeric { range, min, max } => {
                let x = a.as_number()?;
                let y = b.as_number()?;
                let sane = |v: f64| min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m);
                if !sane(x) || !sane(y) {
                    return None;
                }
                if *range <= 0.0 {
                    return Some(if x == y { 1.0 } else { 0.0 });
                }
                Some((1.0 - (x - y).abs() / range).max(0.0))
            }
            Self::Text => text_similarity(&a.as_text()?, &b.as_text()?),
        }
    }
}

/// One attribute of a strategy: its name, weight and comparison kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeSpec {
    pub name: String,
    pub weight: f64,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, weight: f64, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            weight,
            kind,
        }
    }
}

/// How a single attribute comparison was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeStatus {
    /// Both values present and comparable
    Compared,
    /// Missing, out of range, or uncoercible on one side; neutral score used
    Neutral,
    /// Missing on both sides; contributes no weight
    Absent,
}

/// Similarity plus how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeOutcome {
    pub similarity: f64,
    pub status: AttributeStatus,
}

/// Compares named attributes according to a strategy's attribute table.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeComparator {
    specs: IndexMap<String, AttributeSpec>,
    neutral: f64,
}

impl AttributeComparator {
    /// Build from attribute specs. Later specs replace earlier ones with the
    /// same name.
    pub fn new(specs: impl IntoIterator<Item = AttributeSpec>, neutral: f64) -> Self {
        Self {
            specs: specs.into_iter().map(|s| (s.name.clone(), s)).collect(),
            neutral: neutral.clamp(0.0, 1.0),
        }
    }

    /// The neutral similarity used for missing data.
    #[must_use]
    pub const fn neutral(&self) -> f64 {
        self.neutral
    }

    /// Attribute specs in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.values()
    }

    /// Look up one attribute spec.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&AttributeSpec> {
        self.specs.get(name)
    }

    /// Number of declared attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether no attributes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Similarity of one attribute, in 0.0 - 1.0.
    #[must_use]
    pub fn compare(
        &self,
        name: &str,
        a: Option<&AttributeValue>,
        b: Option<&AttributeValue>,
    ) -> f64 {
        self.compare_detailed(name, a, b).similarity
    }

    /// Similarity of one attribute together with how it was resolved.
    #[must_use]
    pub fn compare_detailed(
        &self,
        name: &str,
        a: Option<&AttributeValue>,
        b: Option<&AttributeValue>,
    ) -> AttributeOutcome {
        let a = a.filter(|v| v.is_populated());
        let b = b.filter(|v| v.is_populated());

        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            (None, None) => {
                return AttributeOutcome {
                    similarity: self.neutral,
                    status: AttributeStatus::Absent,
                }
            }
            _ => return self.neutral_outcome(),
        };

        let similarity = match self.specs.get(name) {
            Some(spec) => spec.kind.similarity(a, b),
            None => AttributeKind::infer(a, b).similarity(a, b),
        };

        similarity.map_or_else(
            || self.neutral_outcome(),
            |similarity| AttributeOutcome {
                similarity: similarity.clamp(0.0, 1.0),
                status: AttributeStatus::Compared,
            },
        )
    }

    const fn neutral_outcome(&self) -> AttributeOutcome {
        AttributeOutcome {
            similarity: self.neutral,
            status: AttributeStatus::Neutral,
        }
    }
}
