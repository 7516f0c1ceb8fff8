//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".keymatch.yaml",
    ".keymatch.yml",
    "keymatch.yaml",
    "keymatch.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/keymatch/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("keymatch")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// File not found
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Fields of `other` that still hold their default value do not
    /// override. Strategy definitions are appended.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.strategy != defaults.strategy {
            self.strategy.clone_from(&other.strategy);
        }
        if other.fallback_to_default {
            self.fallback_to_default = true;
        }

        if other.engine.parallel_threshold != defaults.engine.parallel_threshold {
            self.engine.parallel_threshold = other.engine.parallel_threshold;
        }
        if other.engine.ranking_depth != defaults.engine.ranking_depth {
            self.engine.ranking_depth = other.engine.ranking_depth;
        }

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.explain {
            self.output.explain = true;
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        self.strategies.extend(other.strategies.iter().cloned());
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# keymatch configuration
# Place this file at .keymatch.yaml in your project root or ~/.config/keymatch/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# keymatch configuration file
# ============================
#
# Place it at:
#   - .keymatch.yaml in your project root
#   - ~/.config/keymatch/keymatch.yaml for global config
#
# CLI arguments always override file settings.

# Strategy to match with: v1, v2, v3, or a name defined below
strategy: v2

# Use the default strategy instead of failing on an unknown name
fallback_to_default: false

# Engine tuning (never changes outcomes)
engine:
  # Inventories at least this large are scored in parallel
  parallel_threshold: 64
  # Candidates listed in the ranking
  ranking_depth: 5

# Output configuration
output:
  # Format: summary, json
  format: summary
  # Show attribute breakdowns and the ranking
  explain: false
  # Disable colored output
  no_color: false

# Custom strategies, registered after the built-ins
# strategies:
#   - name: workshop
#     extends: v1
#     weights:
#       material: 0.0
#     thresholds:
#       match: 0.85
#       possible: 0.65
#       margin: 0.10
#   - name: blanks-only
#     attributes:
#       - name: key_blank
#         weight: 2.0
#         kind: categorical
#       - name: cut_count
#         weight: 1.0
#         kind: numeric
#         range: 2
#         min: 1
#         max: 12
#     veto:
#       mode: soft
#       penalty: 0.9
#       moment_floor: 0.65
#       distance_ceiling: 0.12
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
