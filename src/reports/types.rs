//! Shared report types.

use crate::matching::{AttributeSpec, MatchingStrategy, ShapeVetoConfig};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Brief human-readable summary
    #[default]
    Summary,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Options shared by every reporter.
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Include the per-attribute breakdown and shape details
    pub explain: bool,
    /// Use ANSI colors (summary only)
    pub colored: bool,
}

impl ReportConfig {
    #[must_use]
    pub const fn new(explain: bool, colored: bool) -> Self {
        Self { explain, colored }
    }
}

/// Serializable view of a strategy for listings.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub name: String,
    pub description: String,
    pub is_default: bool,
    #[serde(rename = "match")]
    pub match_threshold: f64,
    #[serde(rename = "possible")]
    pub possible_threshold: f64,
    #[serde(rename = "margin")]
    pub margin_threshold: f64,
    pub neutral: f64,
    pub veto: ShapeVetoConfig,
    pub attributes: Vec<AttributeSpec>,
}

impl StrategySummary {
    #[must_use]
    pub fn from_strategy(strategy: &MatchingStrategy, is_default: bool) -> Self {
        let thresholds = strategy.thresholds();
        Self {
            name: strategy.name().to_string(),
            description: strategy.description().to_string(),
            is_default,
            match_threshold: thresholds.match_threshold,
            possible_threshold: thresholds.possible_threshold,
            margin_threshold: thresholds.margin_threshold,
            neutral: strategy.attributes().neutral(),
            veto: *strategy.veto(),
            attributes: strategy.attributes().specs().cloned().collect(),
        }
    }
}
