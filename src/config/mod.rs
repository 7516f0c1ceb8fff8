//! Configuration module for keymatch.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! Configuration is resolved once at the boundary. The matching core only
//! ever sees the strategy and engine settings it is handed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use keymatch::config::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .strategy("v1")
//!     .explain(true)
//!     .build();
//!
//! // Load from file
//! use keymatch::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.keymatch.yaml` file in your project root or `~/.config/keymatch/`:
//!
//! ```yaml
//! strategy: v1
//! output:
//!   format: json
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_PARALLEL_THRESHOLD, DEFAULT_RANKING_DEPTH, DEFAULT_STRATEGY, MAX_RANKING_DEPTH,
};
pub use types::{AppConfig, AppConfigBuilder, EngineSettings, OutputSettings};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.keymatch.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
