//! Match command handler.
//!
//! Implements the `match` subcommand: one query against one inventory.

use super::{exit_codes, report_config, resolve_strategy};
use crate::config::AppConfig;
use crate::matching::{Decision, MatchReport, MatchingEngine};
use crate::model::{load_inventory, load_signature};
use crate::reports::create_reporter;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Input files for the `match` command.
#[derive(Debug, Clone)]
pub struct MatchPaths {
    /// JSON file holding the query signature
    pub query: PathBuf,
    /// JSON file holding the inventory array
    pub inventory: PathBuf,
}

/// Run the match command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_match(paths: &MatchPaths, config: &AppConfig) -> Result<i32> {
    let (report, rendered) = match_and_render(paths, config)?;
    print!("{rendered}");
    Ok(exit_code(report.outcome.decision))
}

fn match_and_render(paths: &MatchPaths, config: &AppConfig) -> Result<(MatchReport, String)> {
    let (_, strategy) = resolve_strategy(config)?;

    let query = load_signature(&paths.query)
        .with_context(|| format!("Failed to load query {}", paths.query.display()))?;
    let inventory = load_inventory(&paths.inventory)
        .with_context(|| format!("Failed to load inventory {}", paths.inventory.display()))?;
    tracing::info!(
        "Matching against {} inventory candidates",
        inventory.len()
    );

    let engine = MatchingEngine::new(config.engine.into());
    let report = engine
        .match_with_report(&query, &inventory, &strategy)
        .context("Matching failed")?;

    log_report(&report);

    let reporter = create_reporter(config.output.format);
    let rendered = reporter
        .generate_match_report(&report, &report_config(config))
        .context("Failed to render report")?;
    Ok((report, rendered))
}

fn log_report(report: &MatchReport) {
    for skipped in &report.skipped {
        tracing::warn!(
            "Skipped candidate #{} '{}': {}",
            skipped.index,
            skipped.id,
            skipped.reason
        );
    }
    for ranked in &report.ranking {
        tracing::debug!(
            "#{} {} scored {:.3} ({})",
            ranked.index,
            ranked.id,
            ranked.score,
            ranked.match_type_hint
        );
    }
    tracing::info!(
        "Decision {} after scoring {} candidates",
        report.outcome.decision,
        report.outcome.candidates_scored
    );
}

const fn exit_code(decision: Decision) -> i32 {
    match decision {
        Decision::Match => exit_codes::MATCH,
        Decision::Possible => exit_codes::POSSIBLE,
        Decision::NoMatch => exit_codes::NO_MATCH,
    }
}
