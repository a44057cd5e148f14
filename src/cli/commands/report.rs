//! `obra report` command - Generate execution reports

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{date_cell, open_store, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::Store;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Per-project execution progress
    Progress(ProgressArgs),

    /// Nonconformity summary and the open list
    Noc(NocArgs),
}

#[derive(clap::Args, Debug)]
pub struct ProgressArgs {
    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct NocArgs {
    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::Progress(args) => run_progress(args, global),
        ReportCommands::Noc(args) => run_noc(args, global),
    }
}

fn run_progress(args: ProgressArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let projects = store.list_projects().map_err(|e| miette::miette!("{}", e))?;

    let mut output = String::new();
    output.push_str("# Progress Report\n\n");

    if projects.is_empty() {
        output.push_str("No projects.\n");
        write_output(&output, args.output)?;
        return Ok(());
    }

    let mut table = Builder::default();
    table.push_record(["Project", "Company", "Activities", "Completed", "Progress", "Status"]);
    for project in &projects {
        let company = store
            .company(project.company_id)
            .map_err(|e| miette::miette!("{}", e))?
            .map(|c| c.name)
            .unwrap_or_else(|| "-".to_string());
        let (total, completed, progress) = match store
            .summary(project.id)
            .map_err(|e| miette::miette!("{}", e))?
        {
            Some(s) => (
                s.total_activities,
                s.completed_activities,
                format!("{:.2}%", s.global_progress),
            ),
            None => {
                let (total, completed) = store
                    .activity_counts(project.id)
                    .map_err(|e| miette::miette!("{}", e))?;
                (total, completed, "-".to_string())
            }
        };
        table.push_record([
            project.code.clone(),
            truncate_str(&company, 24),
            total.to_string(),
            completed.to_string(),
            progress,
            project.status.to_string(),
        ]);
    }
    output.push_str(&table.build().with(Style::markdown()).to_string());
    output.push('\n');

    if let Some(avg) = store.average_progress() {
        output.push_str(&format!("\nAverage activity progress: {:.2}%\n", avg));
    }

    write_output(&output, args.output)?;
    Ok(())
}

fn run_noc(args: NocArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let mut output = String::new();
    output.push_str("# Nonconformity Report\n\n");

    output.push_str("## Summary\n\n");
    let mut summary = Builder::default();
    summary.push_record(["Status", "Count"]);
    let counts = store.noc_status_counts();
    if counts.is_empty() {
        summary.push_record(["(none)", "0"]);
    }
    for entry in &counts {
        summary.push_record([entry.status.clone(), entry.count.to_string()]);
    }
    output.push_str(&summary.build().with(Style::markdown()).to_string());
    output.push('\n');

    let open = store
        .open_nonconformities()
        .map_err(|e| miette::miette!("{}", e))?;
    if !open.is_empty() {
        output.push_str("\n## Open Nonconformities\n\n");
        let mut table = Builder::default();
        table.push_record(["Project", "Code", "Description", "Responsible", "Detected", "Status"]);
        for (project_code, noc) in &open {
            let responsible = responsible_label(&store, noc.responsible_id)?;
            table.push_record([
                project_code.clone(),
                noc.code.clone(),
                truncate_str(&noc.description, 40),
                responsible,
                date_cell(Some(noc.detected_date)),
                noc.status.to_string(),
            ]);
        }
        output.push_str(&table.build().with(Style::markdown()).to_string());
        output.push('\n');
    }

    write_output(&output, args.output)?;
    Ok(())
}

fn responsible_label(store: &Store, id: Option<i64>) -> Result<String> {
    let person = match id {
        Some(id) => store.person(id).map_err(|e| miette::miette!("{}", e))?,
        None => None,
    };
    Ok(person.map(|p| p.username).unwrap_or_else(|| "-".to_string()))
}

pub(crate) fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
