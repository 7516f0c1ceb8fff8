//! keymatch: key-signature matching engine
//!
//! Matches a described key against an inventory of known keys.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use keymatch::{
    cli::{self, exit_codes, MatchPaths},
    config::{self, AppConfig},
    reports::OutputFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "keymatch")]
#[command(version)]
#[command(about = "Match a described key against an inventory of known keys", long_about = None)]
#[command(after_help = "EXIT CODES (match):
    0  MATCH
    1  POSSIBLE (needs confirmation)
    2  NO_MATCH
    3  Error occurred

EXAMPLES:
    # Match a description against the inventory
    keymatch match --query described.json --inventory keys.json

    # Use an older strategy and show the breakdown
    keymatch match --query described.json -i keys.json --strategy v1 --explain

    # Compare two signatures directly
    keymatch compare described.json stored.json -o json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that score signatures
#[derive(Parser)]
struct StrategyArgs {
    /// Strategy name (v1, v2, v3, or one defined in the config file)
    #[arg(short, long, env = "KEYMATCH_STRATEGY")]
    strategy: Option<String>,

    /// Use the default strategy when the requested one is unknown
    #[arg(long)]
    fallback_default: bool,

    /// Output format
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Include attribute breakdowns
    #[arg(long)]
    explain: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long)]
    no_color: bool,
}

/// Arguments for the `match` subcommand
#[derive(Parser)]
struct MatchArgs {
    /// JSON file with the query signature
    #[arg(long)]
    query: PathBuf,

    /// JSON file with the inventory
    #[arg(short, long)]
    inventory: PathBuf,

    /// Number of candidates listed in the ranking
    #[arg(long, value_name = "N")]
    ranking: Option<usize>,

    #[command(flatten)]
    strategy: StrategyArgs,
}

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// JSON file with the query signature
    query: PathBuf,

    /// JSON file with the candidate signature
    candidate: PathBuf,

    #[command(flatten)]
    strategy: StrategyArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a query signature against an inventory
    Match(MatchArgs),

    /// Compare two signatures and explain the score
    Compare(CompareArgs),

    /// List registered strategies
    Strategies {
        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },

    /// Print an example configuration file
    InitConfig {
        /// Include every option with comments
        #[arg(long)]
        full: bool,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Layer CLI flags over the discovered config file.
fn load_config(config_path: Option<&std::path::Path>, args: Option<&StrategyArgs>) -> AppConfig {
    let mut overrides = AppConfig::builder();
    if let Some(args) = args {
        overrides = overrides
            .fallback_to_default(args.fallback_default)
            .explain(args.explain)
            .no_color(args.no_color);
        if let Some(format) = args.output {
            overrides = overrides.output_format(format);
        }
    }

    let (mut config, _) = AppConfig::from_file_with_overrides(config_path, &overrides.build());

    // An explicit name wins even when it is the default one
    if let Some(name) = args.and_then(|a| a.strategy.as_ref()) {
        config.strategy.clone_from(name);
    }
    config
}

fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Match(args) => {
            let mut config = load_config(config_path, Some(&args.strategy));
            if let Some(depth) = args.ranking {
                config.engine.ranking_depth = depth;
            }
            let paths = MatchPaths {
                query: args.query,
                inventory: args.inventory,
            };
            cli::run_match(&paths, &config)
        }

        Commands::Compare(args) => {
            let config = load_config(config_path, Some(&args.strategy));
            cli::run_compare(&args.query, &args.candidate, &config)?;
            Ok(exit_codes::MATCH)
        }

        Commands::Strategies { output } => {
            let mut config = load_config(config_path, None);
            if let Some(format) = output {
                config.output.format = format;
            }
            cli::run_strategies(&config)?;
            Ok(exit_codes::MATCH)
        }

        Commands::InitConfig { full } => {
            let content = if full {
                config::generate_full_example_config()
            } else {
                config::generate_example_config()
            };
            print!("{content}");
            Ok(exit_codes::MATCH)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::MATCH)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "keymatch", &mut io::stdout());
            Ok(exit_codes::MATCH)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(code) => {
            if code != exit_codes::MATCH {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}
