//! Compare command handler.
//!
//! Scores one signature against another and prints the explanation.

use super::{report_config, resolve_strategy};
use crate::config::AppConfig;
use crate::matching::SignatureComparator;
use crate::model::load_signature;
use crate::reports::create_reporter;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the compare command.
pub fn run_compare(query: &Path, candidate: &Path, config: &AppConfig) -> Result<()> {
    print!("{}", compare_and_render(query, candidate, config)?);
    Ok(())
}

fn compare_and_render(query: &Path, candidate: &Path, config: &AppConfig) -> Result<String> {
    let (_, strategy) = resolve_strategy(config)?;

    let query_sig = load_signature(query)
        .with_context(|| format!("Failed to load signature {}", query.display()))?;
    let candidate_sig = load_signature(candidate)
        .with_context(|| format!("Failed to load signature {}", candidate.display()))?;

    query_sig
        .validate()
        .with_context(|| format!("{} is not a usable signature", query.display()))?;
    candidate_sig
        .validate()
        .with_context(|| format!("{} is not a usable signature", candidate.display()))?;

    let comparator = SignatureComparator::new();
    let result = comparator.compare(&query_sig, &candidate_sig, &strategy);
    let explanation = comparator.explain(&query_sig, &candidate_sig, &strategy);
    tracing::debug!("{}", result.summary());

    create_reporter(config.output.format)
        .generate_comparison_report(&result, &explanation, &report_config(config))
        .context("Failed to render comparison")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_compare_identical_signatures() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("key.json");
        std::fs::write(
            &path,
            r#"{"attributes": {"stamped_code": {"categorical": "KW1"}}}"#,
        )
        .unwrap();

        let config = AppConfig::builder()
            .output_format(OutputFormat::Json)
            .explain(true)
            .build();
        let rendered = compare_and_render(&path, &path, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["result"]["overall_similarity"], 1.0);
        assert_eq!(value["explanation"]["is_match"], true);
    }

    #[test]
    fn test_compare_rejects_empty_signature() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty.json");
        let key = tmp.path().join("key.json");
        std::fs::write(&empty, r#"{"attributes": {}}"#).unwrap();
        std::fs::write(
            &key,
            r#"{"attributes": {"stamped_code": {"categorical": "KW1"}}}"#,
        )
        .unwrap();

        let err = compare_and_render(&empty, &key, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("not a usable signature"));
    }
}
