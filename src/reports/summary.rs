//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{OutputFormat, ReportConfig, ReportError, ReportGenerator, StrategySummary};
use crate::matching::{
    AttributeStatus, ComparisonResult, Decision, MatchExplanation, MatchReport, ShapeVerdict,
};
use std::fmt::Write;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter;

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

const fn decision_color(decision: Decision) -> &'static str {
    match decision {
        Decision::Match => "green",
        Decision::Possible => "yellow",
        Decision::NoMatch => "red",
    }
}

fn write_breakdown(
    out: &mut String,
    result: &ComparisonResult,
    colored: bool,
) -> Result<(), ReportError> {
    writeln!(out, "  Attributes:")?;
    for (name, score) in &result.per_attribute {
        if score.status == AttributeStatus::Absent {
            continue;
        }
        let line = format!(
            "    {name:<20} {:.2} x {:.2}{}",
            score.similarity,
            score.weight,
            if score.status == AttributeStatus::Neutral {
                "  (neutral)"
            } else {
                ""
            }
        );
        let color = if score.status == AttributeStatus::Neutral {
            "dim"
        } else {
            ""
        };
        writeln!(out, "{}", ansi_color(&line, color, colored))?;
    }

    let shape = &result.shape;
    if shape.verdict == ShapeVerdict::Skipped {
        writeln!(out, "  Shape: not compared")?;
    } else {
        writeln!(
            out,
            "  Shape: {:?} (moments {}, outline {})",
            shape.verdict,
            shape
                .similarity
                .map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}")),
            shape
                .distance
                .map_or_else(|| "n/a".to_string(), |d| format!("{d:.3}")),
        )?;
    }
    Ok(())
}

impl ReportGenerator for SummaryReporter {
    fn generate_match_report(
        &self,
        report: &MatchReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let outcome = &report.outcome;
        let colored = config.colored;
        let mut out = String::new();

        writeln!(
            out,
            "Decision: {}",
            ansi_color(
                outcome.decision.label(),
                decision_color(outcome.decision),
                colored
            )
        )?;

        match &outcome.best_candidate_id {
            Some(id) => writeln!(
                out,
                "Best candidate: {} (score {:.3})",
                ansi_color(id, "bold", colored),
                outcome.best_score
            )?,
            None => writeln!(out, "Best candidate: none")?,
        }
        if let Some(runner_up) = &outcome.runner_up_id {
            writeln!(out, "Runner-up: {runner_up} (margin {:.3})", outcome.margin)?;
        }
        writeln!(
            out,
            "Strategy: {} ({} scored, {} skipped)",
            outcome.strategy,
            outcome.candidates_scored,
            report.skipped.len()
        )?;

        if let Some(breakdown) = &outcome.breakdown {
            writeln!(out, "Hint: {}", breakdown.match_type_hint)?;
            if config.explain {
                write_breakdown(&mut out, breakdown, colored)?;
            }
        }

        if config.explain && report.ranking.len() > 1 {
            writeln!(out, "Ranking:")?;
            for (rank, entry) in report.ranking.iter().enumerate() {
                writeln!(
                    out,
                    "  {}. {} {:.3} ({})",
                    rank + 1,
                    entry.id,
                    entry.score,
                    entry.match_type_hint
                )?;
            }
        }

        if !report.skipped.is_empty() {
            writeln!(out, "Skipped:")?;
            for skipped in &report.skipped {
                let line = format!(
                    "  #{} '{}': {}",
                    skipped.index, skipped.id, skipped.reason
                );
                writeln!(out, "{}", ansi_color(&line, "dim", colored))?;
            }
        }

        Ok(out)
    }

    fn generate_comparison_report(
        &self,
        result: &ComparisonResult,
        explanation: &MatchExplanation,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "Similarity: {}", result.summary())?;
        if config.explain {
            writeln!(out, "{}", explanation.detailed())?;
        } else {
            write_breakdown(&mut out, result, config.colored)?;
        }
        Ok(out)
    }

    fn generate_strategy_list(
        &self,
        strategies: &[StrategySummary],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        for strategy in strategies {
            let marker = if strategy.is_default { " (default)" } else { "" };
            writeln!(
                out,
                "{}{marker}",
                ansi_color(&strategy.name, "bold", config.colored)
            )?;
            writeln!(out, "  {}", strategy.description)?;
            writeln!(
                out,
                "  match >= {:.2}, possible >= {:.2}, margin >= {:.2}",
                strategy.match_threshold, strategy.possible_threshold, strategy.margin_threshold
            )?;
            writeln!(
                out,
                "  veto {} (moments >= {:.2}, outline <= {:.2})",
                strategy.veto.mode, strategy.veto.moment_floor, strategy.veto.distance_ceiling
            )?;
            if config.explain {
                for spec in &strategy.attributes {
                    writeln!(
                        out,
                        "    {:<20} {:>5.2}  {}",
                        spec.name,
                        spec.weight,
                        spec.kind.name()
                    )?;
                }
            }
        }
        Ok(out)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Summary
    }
}
