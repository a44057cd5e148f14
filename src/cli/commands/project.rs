//! `obra project` command - Project management

use chrono::Local;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    date_cell, escape_csv, open_store, parse_date_flag, require_person, require_project,
    truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{NewProject, ProjectStatus};

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Add(AddArgs),

    /// List projects with their progress
    List,

    /// Show one project: summary, counts, import history
    Show(ShowArgs),

    /// Delete a project and everything it owns
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Unique project code (e.g. EDP001)
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Display name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Owning company name, created if it does not exist yet
    #[arg(long)]
    pub company: Option<String>,

    /// Responsible person's username
    #[arg(long, short = 'r')]
    pub responsible: Option<String>,

    /// Site supervisor, free text
    #[arg(long)]
    pub supervisor: Option<String>,

    /// Start date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Lifecycle status
    #[arg(long, default_value = "planned")]
    pub status: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project code
    pub code: String,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Project code
    pub code: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::Add(args) => run_add(args, global),
        ProjectCommands::List => run_list(global),
        ProjectCommands::Show(args) => run_show(args, global),
        ProjectCommands::Rm(args) => run_rm(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let code = match args.code {
        Some(code) => code,
        None => dialoguer::Input::new()
            .with_prompt("Project code")
            .interact_text()
            .into_diagnostic()?,
    };

    if store
        .find_project_by_code(&code)
        .map_err(|e| miette::miette!("{}", e))?
        .is_some()
    {
        return Err(miette::miette!("Project '{}' already exists", code));
    }

    let name = match args.name {
        Some(name) => name,
        None => dialoguer::Input::new()
            .with_prompt("Project name")
            .interact_text()
            .into_diagnostic()?,
    };

    let company_name = match args.company {
        Some(company) => company,
        None => dialoguer::Input::new()
            .with_prompt("Client company")
            .interact_text()
            .into_diagnostic()?,
    };

    // Same find-or-create semantics as the importer: exact name match
    let (company, company_created) = match store
        .find_company_by_name(&company_name)
        .map_err(|e| miette::miette!("{}", e))?
    {
        Some(existing) => (existing, false),
        None => (
            store
                .create_company(&company_name, None, None, None)
                .map_err(|e| miette::miette!("{}", e))?,
            true,
        ),
    };

    let responsible_id = match args.responsible.as_deref() {
        Some(username) => Some(require_person(&store, username)?.id),
        None => None,
    };

    let start_date = match args.start.as_deref() {
        Some(value) => parse_date_flag(value)?,
        None => Local::now().date_naive(),
    };
    let end_date = args.end.as_deref().map(parse_date_flag).transpose()?;

    let status: ProjectStatus = args.status.parse().map_err(|e| miette::miette!("{}", e))?;

    let project = store
        .create_project(&NewProject {
            code,
            name,
            company_id: company.id,
            responsible_id,
            supervisor: args.supervisor,
            start_date,
            end_date,
            status,
        })
        .map_err(|e| miette::miette!("{}", e))?;

    if company_created {
        println!(
            "{} Created company {}",
            style("✓").green(),
            style(&company.name).cyan()
        );
    }
    println!(
        "{} Created project {} - {}",
        style("✓").green(),
        style(&project.code).cyan(),
        style(&project.name).white()
    );
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let projects = store.list_projects().map_err(|e| miette::miette!("{}", e))?;

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    match global.format.resolve(OutputFormat::Tsv) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&projects).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&projects).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for project in &projects {
                println!("{}", project.id);
            }
        }
        format => {
            // Company names and progress come from joined lookups
            let mut rows = Vec::new();
            for project in &projects {
                let company = store
                    .company(project.company_id)
                    .map_err(|e| miette::miette!("{}", e))?
                    .map(|c| c.name)
                    .unwrap_or_else(|| "-".to_string());
                let progress = store
                    .summary(project.id)
                    .map_err(|e| miette::miette!("{}", e))?
                    .map(|s| format!("{:.2}%", s.global_progress))
                    .unwrap_or_else(|| "-".to_string());
                rows.push((project, company, progress));
            }

            match format {
                OutputFormat::Csv => {
                    println!("code,name,company,status,start_date,progress");
                    for (project, company, progress) in &rows {
                        println!(
                            "{},{},{},{},{},{}",
                            escape_csv(&project.code),
                            escape_csv(&project.name),
                            escape_csv(company),
                            project.status,
                            project.start_date,
                            progress,
                        );
                    }
                }
                OutputFormat::Md => {
                    println!("| Code | Name | Company | Status | Start | Progress |");
                    println!("|---|---|---|---|---|---|");
                    for (project, company, progress) in &rows {
                        println!(
                            "| {} | {} | {} | {} | {} | {} |",
                            project.code,
                            project.name,
                            company,
                            project.status,
                            project.start_date,
                            progress,
                        );
                    }
                }
                _ => {
                    println!(
                        "{:<10} {:<28} {:<22} {:<12} {:<12} {:>9}",
                        style("CODE").bold(),
                        style("NAME").bold(),
                        style("COMPANY").bold(),
                        style("STATUS").bold(),
                        style("START").bold(),
                        style("PROGRESS").bold()
                    );
                    println!("{}", "-".repeat(98));

                    for (project, company, progress) in &rows {
                        let status_styled = match project.status {
                            ProjectStatus::Planned => style(project.status.to_string()).dim(),
                            ProjectStatus::InProgress => {
                                style(project.status.to_string()).yellow()
                            }
                            ProjectStatus::Finished => style(project.status.to_string()).green(),
                            ProjectStatus::Suspended => style(project.status.to_string()).red(),
                        };
                        println!(
                            "{:<10} {:<28} {:<22} {:<12} {:<12} {:>9}",
                            style(&project.code).cyan(),
                            truncate_str(&project.name, 26),
                            truncate_str(company, 20),
                            status_styled,
                            project.start_date,
                            progress,
                        );
                    }

                    println!();
                    println!("{} project(s)", style(rows.len()).cyan());
                }
            }
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let project = require_project(&store, &args.code)?;

    let company = store
        .company(project.company_id)
        .map_err(|e| miette::miette!("{}", e))?;
    let responsible = match project.responsible_id {
        Some(id) => store.person(id).map_err(|e| miette::miette!("{}", e))?,
        None => None,
    };
    let summary = store
        .summary(project.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let nocs = store
        .list_nonconformities(project.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let open_nocs = nocs
        .iter()
        .filter(|n| n.status != crate::entities::NocStatus::Closed)
        .count();
    let imports = store
        .imports_for_project(project.id)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "project": project,
                "company": company,
                "responsible": responsible,
                "summary": summary,
                "nonconformities": nocs.len(),
                "open_nonconformities": open_nocs,
                "imports": imports,
            });
            println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let value = serde_json::json!({
                "project": project,
                "company": company,
                "responsible": responsible,
                "summary": summary,
                "nonconformities": nocs.len(),
                "open_nonconformities": open_nocs,
                "imports": imports,
            });
            print!("{}", serde_yml::to_string(&value).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} {} - {}",
                style("Project").bold(),
                style(&project.code).cyan().bold(),
                style(&project.name).white().bold()
            );
            println!("{}", "─".repeat(60));
            println!(
                "  Company:      {}",
                company.map(|c| c.name).unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  Responsible:  {}",
                responsible
                    .map(|p| p.label().to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  Supervisor:   {}",
                project.supervisor.as_deref().unwrap_or("-")
            );
            println!("  Start date:   {}", project.start_date);
            println!("  End date:     {}", date_cell(project.end_date));
            println!("  Status:       {}", project.status);
            println!();

            match summary {
                Some(summary) => {
                    println!(
                        "  Activities:   {} total, {} completed",
                        summary.total_activities, summary.completed_activities
                    );
                    println!(
                        "  Progress:     {}  (recomputed {})",
                        style(format!("{:.2}%", summary.global_progress)).cyan(),
                        summary.recomputed_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
                None => {
                    println!(
                        "  Progress:     not computed yet. Run {}",
                        style(format!("obra recompute {}", project.code)).yellow()
                    );
                }
            }
            println!(
                "  Nonconformities: {} ({} open)",
                nocs.len(),
                open_nocs
            );

            if !imports.is_empty() {
                println!();
                println!("  {}", style("Imports").bold());
                for record in &imports {
                    println!(
                        "    {}  {}  {}  {} activities, {} nonconformities",
                        record.imported_at.format("%Y-%m-%d %H:%M"),
                        style(&record.source).dim(),
                        record.profile,
                        record.activities,
                        record.nonconformities,
                    );
                }
            }
        }
    }

    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let project = require_project(&store, &args.code)?;

    if !args.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete project {} and all its activities and nonconformities?",
                project.code
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store
        .delete_project(project.id)
        .map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Deleted project {}",
        style("✓").green(),
        style(&project.code).cyan()
    );
    Ok(())
}
