//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    activity::ActivityCommands,
    company::CompanyCommands,
    completions::CompletionsArgs,
    import::ImportArgs,
    init::InitArgs,
    noc::NocCommands,
    person::PersonCommands,
    project::ProjectCommands,
    recompute::RecomputeArgs,
    report::ReportCommands,
    status::StatusArgs,
};

#[derive(Parser)]
#[command(name = "obra")]
#[command(author, version, about = "Obra - construction project execution tracker")]
#[command(
    long_about = "Tracks construction projects, their activities and nonconformities, \
with spreadsheet ingestion and derived progress summaries."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .obra/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new obra workspace
    Init(InitArgs),

    /// Client company management
    #[command(subcommand)]
    Company(CompanyCommands),

    /// People management (responsible parties)
    #[command(subcommand)]
    Person(PersonCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Activity management (lines of work inside a project)
    #[command(subcommand)]
    Activity(ActivityCommands),

    /// Nonconformity management
    #[command(subcommand)]
    Noc(NocCommands),

    /// Import activities and nonconformities from a spreadsheet
    Import(ImportArgs),

    /// Recompute control summaries from current activity sets
    Recompute(RecomputeArgs),

    /// Show the workspace status dashboard
    Status(StatusArgs),

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for lists, styled for show)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just ids, one per line
    Id,
}

impl OutputFormat {
    /// Resolve `Auto` to the command's natural format
    pub fn resolve(self, fallback: OutputFormat) -> OutputFormat {
        if self == OutputFormat::Auto {
            fallback
        } else {
            self
        }
    }
}
