//! CLI parse: clap types for synthgen. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Synthgen CLI - concurrent synthetic-record generation
#[derive(Parser)]
#[command(name = "synthgen")]
#[command(about = "Generate synthetic records with pluggable generator tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (used when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect registered generator tools
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },
    /// Run a generator tool and persist its records
    Generate(GenerateArgs),
}

#[derive(Subcommand)]
pub enum ToolsCommands {
    /// List registered tools
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a tool's arguments, formats and examples
    Show {
        /// Registered tool name
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Registered tool name
    pub tool: String,

    /// Number of records to generate
    #[arg(long, short = 'n', default_value = "10")]
    pub count: usize,

    /// Maximum in-flight tasks (default from config)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-task backend timeout in seconds, 0 disables (default from config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Artifact format: json, yaml, text, markdown (default from config)
    #[arg(long)]
    pub format: Option<String>,

    /// Output directory (default from config)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Retries for transient backend failures (default from config)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Send prompts to the echo backend instead of the configured one
    #[arg(long)]
    pub dry_run: bool,

    /// Exit successfully even when some tasks failed
    #[arg(long)]
    pub allow_failures: bool,

    /// Summary output format (text or json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Tool-specific flags, passed after `--`
    #[arg(last = true)]
    pub tool_args: Vec<String>,
}
