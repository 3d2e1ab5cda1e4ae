//! seds-index: Sustainability Index of U.S. state energy consumption
//!
//! Scores every state on how fast it closes the gap between nonrenewable and
//! renewable consumption, and on how green its consumption already is.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use seds_index::{
    blend::SiWeight,
    cli::{self, ChartKind, StateFormat},
    config::{AppConfig, ConfigOverrides, ConfigPreset, DegeneratePolicy},
    model::{EnergySource, Year},
    pipeline::exit_codes,
    reports::ReportFormat,
    store::DataFileFormat,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Recognized config file names, in discovery order.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".seds-index.yaml",
    ".seds-index.yml",
    "seds-index.yaml",
    "seds-index.yml",
];

/// Build long version string with scoring info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nInput:",
        "\n  EIA State Energy Data System series records (JSON array or JSON lines)",
        "\n  Year index 1960-2017",
        "\n\nOutput Formats:",
        "\n  summary, json, csv",
        "\n\nScores:",
        "\n  Effort Score, Green Score, Sustainability Index SI_0.0 ... SI_1.0"
    )
}

#[derive(Parser)]
#[command(name = "seds-index")]
#[command(version, long_version = build_long_version())]
#[command(about = "Sustainability Index of U.S. state energy consumption", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Some states could not be scored (with --fail-on-state-errors)
    2  Error occurred

EXAMPLES:
    # Ranked summary of every state
    seds-index score seds.json

    # Rank by effort alone, top ten
    seds-index score seds.json --weight 1.0 --top 10

    # CI check with JSON output
    seds-index score seds.json --preset ci -O scores.json

    # Score card and tables for one state
    seds-index state seds.json OH

    # Renewable consumption by sector as chart JSON
    seds-index chart seds.json Ohio --case sector --source renewable")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs (extracted for readability)
// ============================================================================

/// Record file layout and analysis window, shared by every scoring command
#[derive(Parser)]
struct DataArgs {
    /// Record file layout
    #[arg(long, value_enum)]
    format: Option<DataFileFormat>,

    /// First year of the analysis window
    #[arg(long)]
    window_start: Option<Year>,

    /// Last year of the analysis window
    #[arg(long)]
    window_end: Option<Year>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `score` subcommand
#[derive(Parser)]
struct ScoreArgs {
    /// Record file (falls back to `store.data_file` from the config file)
    data: Option<PathBuf>,

    #[command(flatten)]
    data_args: DataArgs,

    /// Output format (auto detects TTY: summary if interactive, json otherwise)
    #[arg(short, long, value_enum)]
    output: Option<ReportFormat>,

    /// Configuration preset (default, legacy-window, ci)
    #[arg(long, value_enum)]
    preset: Option<ConfigPreset>,

    /// Index weight to rank by, 0.0 (green only) to 1.0 (effort only)
    #[arg(long)]
    weight: Option<SiWeight>,

    /// Show only the first N states in the summary
    #[arg(long)]
    top: Option<usize>,

    /// Divide consumption by this before scoring
    #[arg(long)]
    scale_divisor: Option<f64>,

    /// What to do when every state ties on a metric
    #[arg(long, value_enum)]
    degenerate_policy: Option<DegeneratePolicy>,

    /// Include per-state sector tables in JSON output
    #[arg(long)]
    include_tables: bool,

    /// Exit with code 1 if any state could not be scored
    #[arg(long)]
    fail_on_state_errors: bool,
}

/// Arguments for the `state` subcommand
#[derive(Parser)]
struct StateArgs {
    /// Record file
    data: PathBuf,

    /// State name or postal code
    state: String,

    #[command(flatten)]
    data_args: DataArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: StateFormat,
}

/// Arguments for the `chart` subcommand
#[derive(Parser)]
struct ChartArgs {
    /// Record file
    data: PathBuf,

    /// State name or postal code
    state: String,

    #[command(flatten)]
    data_args: DataArgs,

    /// Chart layout
    #[arg(long = "case", value_enum, default_value = "glance")]
    kind: ChartKind,

    /// Energy source plotted by the sector and fuel layouts
    #[arg(long, value_enum, default_value = "renewable")]
    source: EnergySource,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every state and report the rankings
    Score(ScoreArgs),

    /// Show the scores and sector tables of one state
    State(StateArgs),

    /// Emit time-series chart data for one state
    Chart(ChartArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .seds-index.yaml in the current directory
    Init,
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
        Ok(exit_code) => {
            if exit_code != exit_codes::SUCCESS {
                std::process::exit(exit_code);
            }
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Dispatch to command handlers
fn run(cli: Cli) -> Result<i32> {
    let flags = ConfigOverrides {
        quiet: cli.quiet,
        no_color: cli.no_color,
        ..ConfigOverrides::default()
    };
    match cli.command {
        Commands::Score(args) => {
            let overrides = ConfigOverrides {
                output_format: args.output,
                rank_weight: args.weight.map(SiWeight::value),
                top: args.top,
                scale_divisor: args.scale_divisor,
                degenerate_policy: args.degenerate_policy,
                include_tables: args.include_tables,
                fail_on_state_errors: args.fail_on_state_errors,
                ..data_overrides(&flags, args.data, &args.data_args)
            };
            let config = resolve_config(cli.config.as_deref(), args.preset, &overrides);
            cli::run_score(config)
        }

        Commands::State(args) => {
            let overrides = data_overrides(&flags, Some(args.data), &args.data_args);
            let config = resolve_config(cli.config.as_deref(), None, &overrides);
            cli::run_state(config, &args.state, args.output)
        }

        Commands::Chart(args) => {
            let overrides = data_overrides(&flags, Some(args.data), &args.data_args);
            let config = resolve_config(cli.config.as_deref(), None, &overrides);
            cli::run_chart(config, &args.state, args.kind, args.source)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "seds-index", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = seds_index::config::generate_json_schema()
                .context("failed to serialize schema")?;
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
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    seds_index::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("seds-index").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match seds_index::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".seds-index.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = seds_index::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

/// Add the shared data arguments to the global flag overrides.
fn data_overrides(flags: &ConfigOverrides, data: Option<PathBuf>, args: &DataArgs) -> ConfigOverrides {
    ConfigOverrides {
        data_file: data,
        data_format: args.format,
        window_start: args.window_start,
        window_end: args.window_end,
        output_file: args.output_file.clone(),
        ..flags.clone()
    }
}

/// Layer the preset and CLI overrides over the config file.
fn resolve_config(
    config_path: Option<&Path>,
    preset: Option<ConfigPreset>,
    overrides: &ConfigOverrides,
) -> AppConfig {
    let (config, loaded_from) = AppConfig::from_file_with_overrides(config_path, preset, overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    config
}
