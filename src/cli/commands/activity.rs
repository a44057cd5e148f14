//! `obra activity` command - Activity management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    date_cell, escape_csv, open_store, parse_date_flag, require_person, require_project,
    truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::progress::{recompute, round2};
use crate::core::Store;
use crate::entities::{ActivityStatus, NewActivity};

#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// Add an activity to a project
    Add(AddArgs),

    /// Update fields of an existing activity
    Update(UpdateArgs),

    /// Remove an activity
    Rm(RmArgs),

    /// List a project's activities
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Project code
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// What the activity is
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Item code from the source document (truncated to 20 chars)
    #[arg(long)]
    pub item: Option<String>,

    /// Responsible person's username
    #[arg(long, short = 'r')]
    pub responsible: Option<String>,

    /// Planned completion date (YYYY-MM-DD)
    #[arg(long)]
    pub planned: Option<String>,

    /// Actual completion date (YYYY-MM-DD)
    #[arg(long)]
    pub actual: Option<String>,

    /// Completion percentage, 0-100
    #[arg(long, default_value_t = 0.0)]
    pub progress: f64,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Status override; derived from progress when omitted
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Activity id
    pub id: i64,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub item: Option<String>,

    /// Responsible person's username
    #[arg(long, short = 'r')]
    pub responsible: Option<String>,

    /// Planned completion date (YYYY-MM-DD)
    #[arg(long)]
    pub planned: Option<String>,

    /// Actual completion date (YYYY-MM-DD)
    #[arg(long)]
    pub actual: Option<String>,

    /// Completion percentage, 0-100
    #[arg(long)]
    pub progress: Option<f64>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Status override; re-derived from --progress when omitted
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Activity id
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project code
    #[arg(long, short = 'p')]
    pub project: String,
}

pub fn run(cmd: ActivityCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ActivityCommands::Add(args) => run_add(args, global),
        ActivityCommands::Update(args) => run_update(args, global),
        ActivityCommands::Rm(args) => run_rm(args, global),
        ActivityCommands::List(args) => run_list(args, global),
    }
}

fn validated_progress(value: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&value) {
        return Err(miette::miette!(
            "Progress must be between 0 and 100, got {}",
            value
        ));
    }
    Ok(round2(value))
}

fn print_recomputed(store: &Store, project_id: i64, code: &str) -> Result<()> {
    let summary = recompute(store, project_id).map_err(|e| miette::miette!("{}", e))?;
    println!(
        "  {} is now at {} ({}/{} completed)",
        style(code).cyan(),
        style(format!("{:.2}%", summary.global_progress)).cyan(),
        summary.completed_activities,
        summary.total_activities,
    );
    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let code = match args.project {
        Some(code) => code,
        None => dialoguer::Input::new()
            .with_prompt("Project code")
            .interact_text()
            .into_diagnostic()?,
    };
    let project = require_project(&store, &code)?;

    let description = match args.description {
        Some(description) => description,
        None => dialoguer::Input::new()
            .with_prompt("Description")
            .interact_text()
            .into_diagnostic()?,
    };

    let responsible_id = match args.responsible.as_deref() {
        Some(username) => Some(require_person(&store, username)?.id),
        None => None,
    };
    let planned_date = args.planned.as_deref().map(parse_date_flag).transpose()?;
    let actual_date = args.actual.as_deref().map(parse_date_flag).transpose()?;
    let progress = validated_progress(args.progress)?;
    let status = match args.status.as_deref() {
        Some(value) => value
            .parse::<ActivityStatus>()
            .map_err(|e| miette::miette!("{}", e))?,
        None => ActivityStatus::from_progress(progress),
    };

    let activity = store
        .create_activity(&NewActivity {
            project_id: project.id,
            item: args.item.map(|i| i.chars().take(20).collect()),
            description,
            responsible_id,
            planned_date,
            actual_date,
            progress,
            notes: args.notes,
            status,
        })
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Added activity {} to {}: {}",
        style("✓").green(),
        style(activity.id).cyan(),
        style(&project.code).cyan(),
        truncate_str(&activity.description, 50),
    );
    print_recomputed(&store, project.id, &project.code)
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let mut activity = store
        .activity(args.id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("Activity {} not found", args.id))?;

    if let Some(description) = args.description {
        activity.description = description;
    }
    if let Some(item) = args.item {
        activity.item = Some(item.chars().take(20).collect());
    }
    if let Some(username) = args.responsible.as_deref() {
        activity.responsible_id = Some(require_person(&store, username)?.id);
    }
    if let Some(planned) = args.planned.as_deref() {
        activity.planned_date = Some(parse_date_flag(planned)?);
    }
    if let Some(actual) = args.actual.as_deref() {
        activity.actual_date = Some(parse_date_flag(actual)?);
    }
    if let Some(progress) = args.progress {
        activity.progress = validated_progress(progress)?;
        // Unless the caller pins one, status follows the new percentage
        if args.status.is_none() {
            activity.status = ActivityStatus::from_progress(activity.progress);
        }
    }
    if let Some(notes) = args.notes {
        activity.notes = Some(notes);
    }
    if let Some(value) = args.status.as_deref() {
        activity.status = value
            .parse::<ActivityStatus>()
            .map_err(|e| miette::miette!("{}", e))?;
    }

    store
        .update_activity(&activity)
        .map_err(|e| miette::miette!("{}", e))?;

    let project = store
        .project(activity.project_id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("Project {} not found", activity.project_id))?;

    println!(
        "{} Updated activity {} ({} at {:.2}%)",
        style("✓").green(),
        style(activity.id).cyan(),
        activity.status,
        activity.progress,
    );
    print_recomputed(&store, project.id, &project.code)
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let activity = store
        .activity(args.id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("Activity {} not found", args.id))?;
    let project = store
        .project(activity.project_id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("Project {} not found", activity.project_id))?;

    store
        .delete_activity(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Removed activity {}: {}",
        style("✓").green(),
        style(args.id).cyan(),
        truncate_str(&activity.description, 50),
    );
    print_recomputed(&store, project.id, &project.code)
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let project = require_project(&store, &args.project)?;
    let activities = store
        .list_activities(project.id)
        .map_err(|e| miette::miette!("{}", e))?;

    if activities.is_empty() {
        println!("No activities in {}.", project.code);
        return Ok(());
    }

    match global.format.resolve(OutputFormat::Tsv) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&activities).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&activities).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for activity in &activities {
                println!("{}", activity.id);
            }
        }
        OutputFormat::Csv => {
            println!("id,item,description,planned_date,actual_date,progress,status");
            for activity in &activities {
                println!(
                    "{},{},{},{},{},{:.2},{}",
                    activity.id,
                    escape_csv(activity.item.as_deref().unwrap_or("")),
                    escape_csv(&activity.description),
                    date_cell(activity.planned_date),
                    date_cell(activity.actual_date),
                    activity.progress,
                    activity.status,
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Item | Description | Planned | Actual | Progress | Status |");
            println!("|---|---|---|---|---|---|---|");
            for activity in &activities {
                println!(
                    "| {} | {} | {} | {} | {} | {:.2}% | {} |",
                    activity.id,
                    activity.item.as_deref().unwrap_or("-"),
                    activity.description,
                    date_cell(activity.planned_date),
                    date_cell(activity.actual_date),
                    activity.progress,
                    activity.status,
                );
            }
        }
        _ => {
            println!(
                "{:<6} {:<12} {:<34} {:<12} {:<12} {:>9} {:<12}",
                style("ID").bold(),
                style("ITEM").bold(),
                style("DESCRIPTION").bold(),
                style("PLANNED").bold(),
                style("ACTUAL").bold(),
                style("PROGRESS").bold(),
                style("STATUS").bold()
            );
            println!("{}", "-".repeat(102));

            for activity in &activities {
                let status_styled = match activity.status {
                    ActivityStatus::Pending => style(activity.status.to_string()).dim(),
                    ActivityStatus::InProgress => style(activity.status.to_string()).yellow(),
                    ActivityStatus::Completed => style(activity.status.to_string()).green(),
                    ActivityStatus::Delayed => style(activity.status.to_string()).red(),
                };
                println!(
                    "{:<6} {:<12} {:<34} {:<12} {:<12} {:>8.2}% {:<12}",
                    style(activity.id).cyan(),
                    activity.item.as_deref().unwrap_or("-"),
                    truncate_str(&activity.description, 32),
                    date_cell(activity.planned_date),
                    date_cell(activity.actual_date),
                    activity.progress,
                    status_styled,
                );
            }

            println!();
            println!("{} activity(s)", style(activities.len()).cyan());
        }
    }

    Ok(())
}
