//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default configuration file, loaded only if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "yarrow.toml";

/// yarrow -- scan a file or directory tree with a directory of YARA rules.
#[derive(Parser, Debug)]
#[command(name = "yarrow", version, about, long_about = None)]
pub struct Cli {
    /// File or directory to scan.
    pub target: PathBuf,

    /// Path to a yarrow.toml configuration file (default: ./yarrow.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing rule files (overrides `scan.rules_dir`).
    #[arg(short, long)]
    pub rules_dir: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    /// Also report rules that did not match.
    #[arg(short, long)]
    pub verbose: bool,

    /// Exit with code 4 when at least one rule matched.
    #[arg(long)]
    pub fail_on_match: bool,

    /// Follow symbolic links below the target (loops are reported).
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Scan every non-directory entry without re-checking its type.
    #[arg(long)]
    pub no_verify_leaves: bool,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable line output.
    Text,
    /// One JSON object per line.
    Json,
}
