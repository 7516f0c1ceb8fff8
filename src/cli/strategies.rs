//! Strategies command handler.

use super::{report_config, resolve_strategy};
use crate::config::AppConfig;
use crate::reports::{create_reporter, StrategySummary};
use anyhow::{Context, Result};

/// Print every registered strategy, marking the active one as default.
pub fn run_strategies(config: &AppConfig) -> Result<()> {
    print!("{}", render_strategies(config)?);
    Ok(())
}

fn render_strategies(config: &AppConfig) -> Result<String> {
    let (registry, active) = resolve_strategy(config)?;
    let summaries: Vec<StrategySummary> = registry
        .iter()
        .map(|strategy| StrategySummary::from_strategy(strategy, strategy.name() == active.name()))
        .collect();

    create_reporter(config.output.format)
        .generate_strategy_list(&summaries, &report_config(config))
        .context("Failed to render strategy list")
}
