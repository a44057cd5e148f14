//! `obra company` command - Client company management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, open_store, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// Register a client company
    Add(AddArgs),

    /// List companies
    List,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Company name (unique)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Tax identifier
    #[arg(long)]
    pub tax_id: Option<String>,

    /// Contact person
    #[arg(long)]
    pub contact_name: Option<String>,

    /// Contact email
    #[arg(long)]
    pub contact_email: Option<String>,
}

pub fn run(cmd: CompanyCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CompanyCommands::Add(args) => run_add(args, global),
        CompanyCommands::List => run_list(global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let name = match args.name {
        Some(name) => name,
        None => dialoguer::Input::new()
            .with_prompt("Company name")
            .interact_text()
            .into_diagnostic()?,
    };

    if store
        .find_company_by_name(&name)
        .map_err(|e| miette::miette!("{}", e))?
        .is_some()
    {
        return Err(miette::miette!("Company '{}' already exists", name));
    }

    let company = store
        .create_company(
            &name,
            args.tax_id.as_deref(),
            args.contact_name.as_deref(),
            args.contact_email.as_deref(),
        )
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created company {} (id {})",
        style("✓").green(),
        style(&company.name).cyan(),
        company.id
    );
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;
    let companies = store.list_companies().map_err(|e| miette::miette!("{}", e))?;

    if companies.is_empty() {
        println!("No companies found.");
        return Ok(());
    }

    match global.format.resolve(OutputFormat::Tsv) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&companies).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&companies).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            println!("id,name,tax_id,contact_name,contact_email");
            for company in &companies {
                println!(
                    "{},{},{},{},{}",
                    company.id,
                    escape_csv(&company.name),
                    escape_csv(company.tax_id.as_deref().unwrap_or("")),
                    escape_csv(company.contact_name.as_deref().unwrap_or("")),
                    escape_csv(company.contact_email.as_deref().unwrap_or("")),
                );
            }
        }
        OutputFormat::Id => {
            for company in &companies {
                println!("{}", company.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Tax ID | Contact | Email |");
            println!("|---|---|---|---|---|");
            for company in &companies {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    company.id,
                    company.name,
                    company.tax_id.as_deref().unwrap_or("-"),
                    company.contact_name.as_deref().unwrap_or("-"),
                    company.contact_email.as_deref().unwrap_or("-"),
                );
            }
        }
        _ => {
            println!(
                "{:<6} {:<28} {:<14} {:<20} {:<24}",
                style("ID").bold(),
                style("NAME").bold(),
                style("TAX ID").bold(),
                style("CONTACT").bold(),
                style("EMAIL").bold()
            );
            println!("{}", "-".repeat(94));

            for company in &companies {
                println!(
                    "{:<6} {:<28} {:<14} {:<20} {:<24}",
                    company.id,
                    truncate_str(&company.name, 26),
                    company.tax_id.as_deref().unwrap_or("-"),
                    truncate_str(company.contact_name.as_deref().unwrap_or("-"), 18),
                    truncate_str(company.contact_email.as_deref().unwrap_or("-"), 22),
                );
            }

            println!();
            println!("{} company(ies)", style(companies.len()).cyan());
        }
    }

    Ok(())
}
