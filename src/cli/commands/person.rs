//! `obra person` command - People management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, open_store, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum PersonCommands {
    /// Register a person
    Add(AddArgs),

    /// List people
    List,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Username (unique)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Full name
    #[arg(long, short = 'n')]
    pub full_name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Grant the admin flag (imports fall back to the first active admin)
    #[arg(long)]
    pub admin: bool,

    /// Create the account deactivated
    #[arg(long)]
    pub inactive: bool,
}

pub fn run(cmd: PersonCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PersonCommands::Add(args) => run_add(args, global),
        PersonCommands::List => run_list(global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let username = match args.username {
        Some(username) => username,
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .into_diagnostic()?,
    };

    if store
        .find_person_by_username(&username)
        .map_err(|e| miette::miette!("{}", e))?
        .is_some()
    {
        return Err(miette::miette!("Person '{}' already exists", username));
    }

    let full_name = match args.full_name {
        Some(full_name) => full_name,
        None => dialoguer::Input::new()
            .with_prompt("Full name")
            .default(username.clone())
            .interact_text()
            .into_diagnostic()?,
    };

    let person = store
        .create_person(
            &username,
            &full_name,
            args.email.as_deref(),
            args.admin,
            !args.inactive,
        )
        .map_err(|e| miette::miette!("{}", e))?;

    let role = if person.is_admin {
        style("admin").yellow()
    } else {
        style("member").dim()
    };
    println!(
        "{} Created person {} ({})",
        style("✓").green(),
        style(&person.username).cyan(),
        role
    );
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let people = store.list_people().map_err(|e| miette::miette!("{}", e))?;

    if people.is_empty() {
        println!("No people found.");
        return Ok(());
    }

    match global.format.resolve(OutputFormat::Tsv) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&people).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&people).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            println!("id,username,full_name,email,admin,active");
            for person in &people {
                println!(
                    "{},{},{},{},{},{}",
                    person.id,
                    escape_csv(&person.username),
                    escape_csv(&person.full_name),
                    escape_csv(person.email.as_deref().unwrap_or("")),
                    person.is_admin,
                    person.is_active,
                );
            }
        }
        OutputFormat::Id => {
            for person in &people {
                println!("{}", person.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Username | Full name | Email | Admin | Active |");
            println!("|---|---|---|---|---|---|");
            for person in &people {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    person.id,
                    person.username,
                    person.full_name,
                    person.email.as_deref().unwrap_or("-"),
                    if person.is_admin { "yes" } else { "no" },
                    if person.is_active { "yes" } else { "no" },
                );
            }
        }
        _ => {
            println!(
                "{:<6} {:<16} {:<24} {:<24} {:<8} {:<8}",
                style("ID").bold(),
                style("USERNAME").bold(),
                style("FULL NAME").bold(),
                style("EMAIL").bold(),
                style("ADMIN").bold(),
                style("ACTIVE").bold()
            );
            println!("{}", "-".repeat(88));

            for person in &people {
                let admin = if person.is_admin {
                    style("yes").yellow()
                } else {
                    style("-").dim()
                };
                let active = if person.is_active {
                    style("yes").green()
                } else {
                    style("no").red()
                };
                println!(
                    "{:<6} {:<16} {:<24} {:<24} {:<8} {:<8}",
                    person.id,
                    truncate_str(&person.username, 14),
                    truncate_str(&person.full_name, 22),
                    truncate_str(person.email.as_deref().unwrap_or("-"), 22),
                    admin,
                    active,
                );
            }

            println!();
            println!("{} person(s)", style(people.len()).cyan());
        }
    }

    Ok(())
}
