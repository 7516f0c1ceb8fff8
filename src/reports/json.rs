//! JSON report generator.

use super::{OutputFormat, ReportConfig, ReportError, ReportGenerator, StrategySummary};
use crate::matching::{ComparisonResult, MatchExplanation, MatchReport};
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let mut text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        text.push('\n');
        Ok(text)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ComparisonJson<'a> {
    result: &'a ComparisonResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a MatchExplanation>,
}

#[derive(Serialize)]
struct StrategyListJson<'a> {
    strategies: &'a [StrategySummary],
}

impl ReportGenerator for JsonReporter {
    fn generate_match_report(
        &self,
        report: &MatchReport,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(report)
    }

    fn generate_comparison_report(
        &self,
        result: &ComparisonResult,
        explanation: &MatchExplanation,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(&ComparisonJson {
            result,
            explanation: config.explain.then_some(explanation),
        })
    }

    fn generate_strategy_list(
        &self,
        strategies: &[StrategySummary],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(&StrategyListJson { strategies })
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}
