//! CLI argument definitions for finlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `render` | Convert a Markdown report body to HTML |
//! | `report` | Render an analysis report JSON document |
//! | `sanitize` | Sanitize prediction forecast series |
//! | `chart` | Build line-chart configs for predictions |
//! | `summarize` | Summarize market history with forecasts |
//! | `dashboard` | Render prediction cards for selected symbols |
//! | `config` | Show effective settings |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--stream` | `false` | Enable NDJSON event streaming |
//! | `--config` | – | Settings file (TOML) |
//! | `-v` | – | Increase log verbosity (repeatable) |
//!
//! # Examples
//!
//! ```bash
//! finlens sanitize predictions.json --pretty
//! finlens render --raw report.md
//! finlens dashboard predictions.json --symbols AAPL,MSFT
//! finlens summarize --market history.json --predictions predictions.json
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// finlens - forecast sanitizing and report rendering CLI
#[derive(Debug, Parser)]
#[command(
    name = "finlens",
    author,
    version,
    about = "Forecast sanitizing and market report rendering CLI",
    long_about = "finlens turns model predictions and generated market reports into \
display-ready data:\n\
\n\
  • Sanitized forecast series with confidence-band fallbacks\n\
  • Chart.js line-chart configs\n\
  • Markdown report bodies rendered to HTML\n\
  • Structured JSON output with metadata\n\
\n\
Use 'finlens <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Emit NDJSON events (start, progress, chunk, end, error).
    #[arg(long, global = true, default_value_t = false)]
    pub stream: bool,

    /// Settings file; defaults to $FINLENS_HOME/config.toml when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert Markdown to HTML.
    ///
    ///   finlens render report.md
    ///   cat report.md | finlens render - --raw
    Render(RenderArgs),

    /// Render an analysis report JSON document.
    Report(InputArgs),

    /// Sanitize one prediction or an array of predictions.
    ///
    /// Emits one warning per forecast point that needed a fallback value.
    Sanitize(InputArgs),

    /// Build Chart.js line-chart configs for predictions.
    Chart(InputArgs),

    /// Summarize market history, optionally with predictions.
    Summarize(SummarizeArgs),

    /// Render prediction cards for the selected symbols.
    ///
    ///   finlens dashboard predictions.json --symbols AAPL,MSFT
    Dashboard(DashboardArgs),

    /// Show effective settings.
    Config,
}

/// Input file argument; `-` reads stdin.
#[derive(Debug, Args)]
pub struct InputArgs {
    pub input: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    pub input: String,

    /// Print the HTML alone instead of an envelope.
    #[arg(long, default_value_t = false)]
    pub raw: bool,

    /// Do not escape HTML in the source text.
    #[arg(long, default_value_t = false)]
    pub no_escape: bool,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Market history: one FinancialData object or an array.
    #[arg(long)]
    pub market: String,

    /// Predictions to pair with the history by symbol.
    #[arg(long)]
    pub predictions: Option<String>,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    pub input: String,

    /// Comma-separated symbol selection; defaults to the configured assets.
    #[arg(long)]
    pub symbols: Option<String>,
}
