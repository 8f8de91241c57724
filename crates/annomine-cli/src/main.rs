//! Annomine CLI
//!
//! - `mine`: usages JSON -> frequent patterns -> one rule per pattern ->
//!   `rules_<version>.json` (labels carried over from earlier versions)
//! - `stats`: stability of the labeled current version against history,
//!   precision, and recall against a benchmark
//! - `label`: auto-label larger variants of known conventions
//! - `redundancy`: `sameAs` duplicate review summary

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod report;

#[derive(Parser)]
#[command(name = "annomine")]
#[command(author, version, about = "Mine annotation usage conventions from Java projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine rules from extracted usages and persist them for the configured version.
    Mine(MineArgs),

    /// Compare the labeled current version with every earlier version.
    Stats(StatsArgs),

    /// Mark unknown rules that extend a known convention as `part. correct`.
    Label(VersionArgs),

    /// Summarize duplicate review (`sameAs`) of correct rules.
    Redundancy(RedundancyArgs),
}

#[derive(Args)]
pub struct VersionArgs {
    /// Directory holding `rules_<version>.json` files
    #[arg(long, default_value = ".")]
    pub rules_dir: PathBuf,
    /// Version tag such as `v0.0.10` (defaults to the config's version)
    #[arg(long)]
    pub tag: Option<String>,
    /// Miner config JSON
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct MineArgs {
    /// Usages JSON: `{ "<project>": [ { "items": [...], "location": {...} } ] }`
    #[arg(short, long)]
    pub input: PathBuf,
    /// Target-library annotation declarations (required parameters)
    #[arg(long)]
    pub annotations: Option<PathBuf>,
    /// Also run the auto-labeler on the new rule file
    #[arg(long)]
    pub auto_label: bool,
    /// Write the run summary as JSON here
    #[arg(long)]
    pub summary_out: Option<PathBuf>,
    #[command(flatten)]
    pub target: VersionArgs,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Benchmark rule file for recall
    #[arg(long)]
    pub benchmark: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub target: VersionArgs,
}

#[derive(Args)]
pub struct RedundancyArgs {
    /// Fail unless every rule is labeled and every correct rule reviewed
    #[arg(long)]
    pub strict: bool,
    #[command(flatten)]
    pub target: VersionArgs,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "annomine=info,annomine_miner=info,annomine_rulesdb=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mine(args) => commands::cmd_mine(&args),
        Commands::Stats(args) => commands::cmd_stats(&args),
        Commands::Label(args) => commands::cmd_label(&args),
        Commands::Redundancy(args) => commands::cmd_redundancy(&args),
    }
}
