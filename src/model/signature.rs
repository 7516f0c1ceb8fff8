//! Key signatures and inventory candidates.

use crate::error::{KeyMatchError, Result, SignatureErrorKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single attribute value as reported by the describer.
///
/// The declared kind of the attribute lives in the strategy, not here; a
/// value whose variant disagrees with that kind is coerced at comparison
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    /// Categorical label (bow shape, material, stamped code)
    Categorical(String),
    /// Numeric scalar (cut count, groove count)
    Numeric(f64),
    /// Short free-text (bow text, distinguishing mark)
    Text(String),
}

impl AttributeValue {
    /// Convenience constructor for a categorical label.
    pub fn label(value: impl Into<String>) -> Self {
        Self::Categorical(value.into())
    }

    /// Convenience constructor for free text.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether this value carries usable data.
    ///
    /// Numbers must be finite; labels and text must contain at least one
    /// non-whitespace character.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        match self {
            Self::Numeric(n) => n.is_finite(),
            Self::Categorical(s) | Self::Text(s) => !s.trim().is_empty(),
        }
    }

    /// View the value as a number, parsing labels and text when possible.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(n) => n.is_finite().then_some(*n),
            Self::Categorical(s) | Self::Text(s) => {
                s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// View the value as a string, formatting numbers.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Numeric(n) if n.is_finite() => Some(format_number(*n)),
            Self::Numeric(_) => None,
            Self::Categorical(s) | Self::Text(s) => Some(s.clone()),
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", format_number(*n)),
            Self::Categorical(s) | Self::Text(s) => write!(f, "{s}"),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// A point on a key outline, in the describer's normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

impl Point {
    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.0 - other.0).hypot(self.1 - other.1)
    }
}

/// Geometric description of a key outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Invariant moments, lowest order first
    #[serde(default)]
    pub moments: Vec<f64>,
    /// Ordered outline points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contour: Option<Vec<Point>>,
}

impl ShapeDescriptor {
    /// Create a descriptor from moments only.
    #[must_use]
    pub const fn from_moments(moments: Vec<f64>) -> Self {
        Self {
            moments,
            contour: None,
        }
    }

    /// Attach an outline.
    #[must_use]
    pub fn with_contour(mut self, contour: Vec<Point>) -> Self {
        self.contour = Some(contour);
        self
    }

    /// The outline, if one with at least one point is present.
    #[must_use]
    pub fn contour_points(&self) -> Option<&[Point]> {
        self.contour.as_deref().filter(|c| !c.is_empty())
    }

    /// A descriptor with neither moments nor outline points carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moments.is_empty() && self.contour_points().is_none()
    }
}

const fn default_confidence() -> f64 {
    1.0
}

/// Structured description of one physical key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Attribute name to value, in describer order
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeValue>,
    /// Optional outline information for the shape veto
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeDescriptor>,
    /// Describer confidence, carried through untouched
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl Signature {
    /// Create an empty signature with full describer confidence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: IndexMap::new(),
            shape: None,
            confidence: default_confidence(),
        }
    }

    /// Builder-style attribute insertion.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Builder-style shape assignment.
    #[must_use]
    pub fn with_shape(mut self, shape: ShapeDescriptor) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Builder-style confidence assignment.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Look up an attribute, ignoring values that carry no data.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name).filter(|v| v.is_populated())
    }

    /// Number of attributes that carry data.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.attributes.values().filter(|v| v.is_populated()).count()
    }

    /// The shape descriptor, unless it is absent or empty.
    #[must_use]
    pub fn shape_descriptor(&self) -> Option<&ShapeDescriptor> {
        self.shape.as_ref().filter(|s| !s.is_empty())
    }

    /// Check the signature invariants.
    ///
    /// A signature needs at least one populated attribute and a confidence
    /// within 0.0-1.0.
    pub fn validate(&self) -> Result<()> {
        if self.populated_count() == 0 {
            return Err(KeyMatchError::invalid_signature(
                "",
                SignatureErrorKind::NoAttributes,
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(KeyMatchError::invalid_signature(
                "",
                SignatureErrorKind::ConfidenceOutOfRange(self.confidence.to_string()),
            ));
        }
        Ok(())
    }

    /// Whether [`Signature::validate`] would succeed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// One inventory item: a stable key identifier and its stored signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryCandidate {
    /// Caller-owned key identifier
    pub id: String,
    /// Stored signature for this key
    pub signature: Signature,
}

impl InventoryCandidate {
    /// Pair an identifier with a signature.
    pub fn new(id: impl Into<String>, signature: Signature) -> Self {
        Self {
            id: id.into(),
            signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populated_values() {
        assert!(AttributeValue::label("round").is_populated());
        assert!(!AttributeValue::label("   ").is_populated());
        assert!(!AttributeValue::text("").is_populated());
        assert!(AttributeValue::Numeric(0.0).is_populated());
        assert!(!AttributeValue::Numeric(f64::NAN).is_populated());
    }

    #[test]
    fn test_coercions() {
        assert_eq!(AttributeValue::label(" 5 ").as_number(), Some(5.0));
        assert_eq!(AttributeValue::label("five").as_number(), None);
        assert_eq!(AttributeValue::Numeric(5.0).as_text().as_deref(), Some("5"));
        assert_eq!(
            AttributeValue::Numeric(2.5).as_text().as_deref(),
            Some("2.5")
        );
    }

    #[test]
    fn test_empty_signature_is_invalid() {
        let sig = Signature::new();
        let err = sig.validate().unwrap_err();
        assert!(err.is_invalid_signature());

        let blank = Signature::new().with_attribute("bow_text", AttributeValue::text("  "));
        assert!(!blank.is_valid());

        let ok = Signature::new().with_attribute("cut_count", AttributeValue::Numeric(5.0));
        assert!(ok.is_valid());
    }

    #[test]
    fn test_confidence_range_checked() {
        let sig = Signature::new()
            .with_attribute("material", AttributeValue::label("brass"))
            .with_confidence(1.5);
        assert!(!sig.is_valid());
    }

    #[test]
    fn test_empty_shape_counts_as_absent() {
        let sig = Signature::new()
            .with_attribute("material", AttributeValue::label("brass"))
            .with_shape(ShapeDescriptor::default().with_contour(Vec::new()));
        assert!(sig.shape_descriptor().is_none());

        let sig = sig.with_shape(ShapeDescriptor::from_moments(vec![0.2]));
        assert!(sig.shape_descriptor().is_some());
    }

    #[test]
    fn test_signature_json_shape() {
        let json = r#"{
            "attributes": {
                "bow_shape": {"categorical": "round"},
                "cut_count": {"numeric": 5},
                "bow_text": {"text": "DO NOT DUPLICATE"}
            },
            "shape": {"moments": [0.2, 0.01], "contour": [[0.0, 0.0], [1.0, 0.5]]},
            "confidence": 0.9
        }"#;
        let sig: Signature = serde_json::from_str(json).unwrap();
        assert_eq!(sig.populated_count(), 3);
        assert_eq!(
            sig.attribute("cut_count"),
            Some(&AttributeValue::Numeric(5.0))
        );
        let shape = sig.shape_descriptor().unwrap();
        assert_eq!(shape.contour_points().unwrap()[1], Point(1.0, 0.5));
        assert!((sig.confidence - 0.9).abs() < f64::EPSILON);
        // Attribute order is preserved
        assert_eq!(sig.attributes.keys().next().map(String::as_str), Some("bow_shape"));
    }

    #[test]
    fn test_missing_confidence_defaults_to_one() {
        let sig: Signature =
            serde_json::from_str(r#"{"attributes": {"material": {"categorical": "brass"}}}"#)
                .unwrap();
        assert_eq!(sig.confidence, 1.0);
        assert!(sig.shape.is_none());
    }
}
