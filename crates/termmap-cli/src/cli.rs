//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "termmap",
    version,
    about = "Map clinical entity descriptions to SNOMED CT and RxNorm codes",
    long_about = "Map free-text clinical entity descriptions to standard codes.\n\n\
                  Medicines map to RxNorm; diagnoses, procedures, labs and everything\n\
                  else map to SNOMED CT."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include query text in logs (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Map every row of an input CSV and write predictions.
    Map(MapArgs),

    /// Show learned acronyms and how texts normalize.
    Acronyms(AcronymsArgs),
}

/// Vocabulary sources and acronym learning settings shared by commands.
#[derive(Args)]
pub struct VocabularyArgs {
    /// SNOMED CT vocabulary CSV (CODE, STR, STY, TTY).
    #[arg(long = "snomed", value_name = "CSV")]
    pub snomed: PathBuf,

    /// RxNorm vocabulary CSV (CODE, STR, STY, TTY).
    #[arg(long = "rxnorm", value_name = "CSV")]
    pub rxnorm: PathBuf,

    /// TOML file with mapper settings.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Acronym cache directory (default: $TERMMAP_CACHE_DIR or data/.cache).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Learn acronyms without reading or writing the cache.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Minimum number of display strings proposing an acronym.
    #[arg(long = "min-support", value_name = "N")]
    pub min_support: Option<usize>,

    /// Maximum number of learned acronyms.
    #[arg(long = "acronym-cap", value_name = "N")]
    pub acronym_cap: Option<usize>,
}

#[derive(Args)]
pub struct MapArgs {
    /// Input CSV with an entity description column and an Entity Type column.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub vocabulary: VocabularyArgs,

    /// Output CSV path.
    #[arg(long = "output", short = 'o', value_name = "CSV", default_value = "predictions.csv")]
    pub output: PathBuf,

    /// Candidates retrieved per query (default: 25).
    #[arg(long = "k", value_name = "N")]
    pub k: Option<usize>,

    /// Rank on retrieval scores instead of token overlap.
    #[arg(long = "retrieval-scores")]
    pub retrieval_scores: bool,

    /// Print the best N candidates of each query with their score breakdown.
    #[arg(long = "show-candidates", value_name = "N", default_value_t = 0)]
    pub show_candidates: usize,
}

#[derive(Args)]
pub struct AcronymsArgs {
    #[command(flatten)]
    pub vocabulary: VocabularyArgs,

    /// Number of learned acronyms to list.
    #[arg(long = "limit", value_name = "N", default_value_t = 20)]
    pub limit: usize,

    /// Texts to normalize with the learned acronyms.
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
