//! `obra noc` command - Nonconformity management

use chrono::Local;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    date_cell, escape_csv, open_store, parse_date_flag, require_person, require_project,
    truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{NewNonConformity, NocStatus, NonConformity};

#[derive(Subcommand, Debug)]
pub enum NocCommands {
    /// Record a nonconformity against a project
    Add(AddArgs),

    /// Close a nonconformity
    Close(CloseArgs),

    /// List nonconformities (all open ones when no project is given)
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Project code
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Report code (e.g. NOC-3)
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// What was found
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Root cause analysis
    #[arg(long)]
    pub root_cause: Option<String>,

    /// Corrective action taken or planned
    #[arg(long)]
    pub corrective_action: Option<String>,

    /// Responsible person's username
    #[arg(long, short = 'r')]
    pub responsible: Option<String>,

    /// Detection date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub detected: Option<String>,

    /// Closure date (YYYY-MM-DD); setting it closes the record
    #[arg(long)]
    pub closure: Option<String>,

    /// Status override; a closure date always wins
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CloseArgs {
    /// Nonconformity id
    pub id: i64,

    /// Closure date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project code; omit to list open nonconformities across all projects
    #[arg(long, short = 'p')]
    pub project: Option<String>,
}

pub fn run(cmd: NocCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        NocCommands::Add(args) => run_add(args, global),
        NocCommands::Close(args) => run_close(args, global),
        NocCommands::List(args) => run_list(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let project_code = match args.project {
        Some(code) => code,
        None => dialoguer::Input::new()
            .with_prompt("Project code")
            .interact_text()
            .into_diagnostic()?,
    };
    let project = require_project(&store, &project_code)?;

    let code = match args.code {
        Some(code) => code,
        None => dialoguer::Input::new()
            .with_prompt("Nonconformity code")
            .interact_text()
            .into_diagnostic()?,
    };
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
    let detected_date = match args.detected.as_deref() {
        Some(value) => parse_date_flag(value)?,
        None => Local::now().date_naive(),
    };
    let closure_date = args.closure.as_deref().map(parse_date_flag).transpose()?;

    // A closure date always closes; otherwise an explicit status wins over Open
    let status = if closure_date.is_some() {
        NocStatus::Closed
    } else {
        match args.status.as_deref() {
            Some(value) => value
                .parse::<NocStatus>()
                .map_err(|e| miette::miette!("{}", e))?,
            None => NocStatus::Open,
        }
    };

    let noc = store
        .create_nonconformity(&NewNonConformity {
            project_id: project.id,
            code,
            description,
            root_cause: args.root_cause,
            corrective_action: args.corrective_action,
            responsible_id,
            detected_date,
            closure_date,
            status,
        })
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Recorded {} against {} ({})",
        style("✓").green(),
        style(&noc.code).cyan(),
        style(&project.code).cyan(),
        noc.status,
    );
    Ok(())
}

fn run_close(args: CloseArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let noc = store
        .noc(args.id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("Nonconformity {} not found", args.id))?;

    if noc.status == NocStatus::Closed {
        println!(
            "{} {} is already closed",
            style("!").yellow(),
            style(&noc.code).cyan()
        );
        return Ok(());
    }

    let date = match args.date.as_deref() {
        Some(value) => parse_date_flag(value)?,
        None => Local::now().date_naive(),
    };

    store
        .close_nonconformity(args.id, date)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Closed {} on {}",
        style("✓").green(),
        style(&noc.code).cyan(),
        date,
    );
    Ok(())
}

fn styled_status(status: NocStatus) -> console::StyledObject<String> {
    match status {
        NocStatus::Open => style(status.to_string()).red(),
        NocStatus::InProcess => style(status.to_string()).yellow(),
        NocStatus::Closed => style(status.to_string()).green(),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    // (project code, record) pairs, either one project's full list or
    // the open set across every project
    let rows: Vec<(String, NonConformity)> = match args.project.as_deref() {
        Some(code) => {
            let project = require_project(&store, code)?;
            store
                .list_nonconformities(project.id)
                .map_err(|e| miette::miette!("{}", e))?
                .into_iter()
                .map(|n| (project.code.clone(), n))
                .collect()
        }
        None => store
            .open_nonconformities()
            .map_err(|e| miette::miette!("{}", e))?,
    };

    if rows.is_empty() {
        match args.project {
            Some(code) => println!("No nonconformities in {}.", code),
            None => println!("No open nonconformities."),
        }
        return Ok(());
    }

    match global.format.resolve(OutputFormat::Tsv) {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = rows
                .iter()
                .map(|(code, noc)| {
                    serde_json::json!({
                        "project": code,
                        "nonconformity": noc,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&values).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            let values: Vec<serde_json::Value> = rows
                .iter()
                .map(|(code, noc)| {
                    serde_json::json!({
                        "project": code,
                        "nonconformity": noc,
                    })
                })
                .collect();
            print!("{}", serde_yml::to_string(&values).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for (_, noc) in &rows {
                println!("{}", noc.id);
            }
        }
        OutputFormat::Csv => {
            println!("id,project,code,description,detected_date,closure_date,status");
            for (project_code, noc) in &rows {
                println!(
                    "{},{},{},{},{},{},{}",
                    noc.id,
                    escape_csv(project_code),
                    escape_csv(&noc.code),
                    escape_csv(&noc.description),
                    noc.detected_date,
                    date_cell(noc.closure_date),
                    noc.status,
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Project | Code | Description | Detected | Status |");
            println!("|---|---|---|---|---|---|");
            for (project_code, noc) in &rows {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    noc.id, project_code, noc.code, noc.description, noc.detected_date, noc.status,
                );
            }
        }
        _ => {
            println!(
                "{:<6} {:<10} {:<10} {:<36} {:<12} {:<10}",
                style("ID").bold(),
                style("PROJECT").bold(),
                style("CODE").bold(),
                style("DESCRIPTION").bold(),
                style("DETECTED").bold(),
                style("STATUS").bold()
            );
            println!("{}", "-".repeat(88));

            for (project_code, noc) in &rows {
                println!(
                    "{:<6} {:<10} {:<10} {:<36} {:<12} {:<10}",
                    style(noc.id).cyan(),
                    project_code,
                    style(&noc.code).cyan(),
                    truncate_str(&noc.description, 34),
                    noc.detected_date,
                    styled_status(noc.status),
                );
            }

            println!();
            println!("{} nonconformity(s)", style(rows.len()).cyan());
        }
    }

    Ok(())
}
