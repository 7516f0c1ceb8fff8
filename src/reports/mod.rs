//! Report generation for match results.
//!
//! Two output formats:
//! - Summary: compact shell-friendly output
//! - JSON: structured data for programmatic integration

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{OutputFormat, ReportConfig, StrategySummary};

use crate::matching::{ComparisonResult, MatchExplanation, MatchReport};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Report for one query matched against an inventory
    fn generate_match_report(
        &self,
        report: &MatchReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Report for a direct comparison of two signatures
    fn generate_comparison_report(
        &self,
        result: &ComparisonResult,
        explanation: &MatchExplanation,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Listing of registered strategies
    fn generate_strategy_list(
        &self,
        strategies: &[StrategySummary],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write a match report to a writer
    fn write_match_report(
        &self,
        report: &MatchReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let text = self.generate_match_report(report, config)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> OutputFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: OutputFormat) -> Box<dyn ReportGenerator> {
    match format {
        OutputFormat::Summary => Box::new(SummaryReporter::new()),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    }
}
