//! CLI argument parsing for simlens

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "simlens")]
#[command(version)]
#[command(about = "Flag memory-bound and optimal gem5 runs against population baselines", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Analysis configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify runs in a statistics artifact and print the report
    Analyze(AnalyzeArgs),
    /// Parse a gem5 stats.txt and merge it into a statistics artifact
    Ingest(IngestArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Statistics artifact (JSON object of run id -> metrics)
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,

    /// Throughput metric field name (e.g. ipc, system.cpu.ipc)
    #[arg(long, value_name = "FIELD")]
    pub throughput_field: Option<String>,

    /// Duration metric field name (e.g. ticks, simSeconds)
    #[arg(long, value_name = "FIELD")]
    pub duration_field: Option<String>,

    /// Read missing throughput/duration fields as 0.0 instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Report format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Append the aggregate baseline summary to the text report (text format only)
    #[arg(long)]
    pub summary: bool,

    /// Write a duration vs throughput scatter plot (SVG) to this path
    #[arg(long, value_name = "PATH")]
    pub plot: Option<PathBuf>,

    /// Overlay the aggregate summary inside the plot
    #[arg(long)]
    pub annotate: bool,

    /// Plot title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// gem5 stats.txt to parse
    #[arg(value_name = "STATS")]
    pub stats: PathBuf,

    /// Statistics artifact to create or update
    #[arg(long, value_name = "PATH")]
    pub artifact: PathBuf,

    /// Run identifier to store the metrics under
    #[arg(long, value_name = "ID", conflicts_with = "script")]
    pub run_id: Option<String>,

    /// Simulator script whose file name becomes the run identifier
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Keep every stat of the dump instead of the configured selection
    #[arg(long)]
    pub all_metrics: bool,
}
