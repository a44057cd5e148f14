//! `obra recompute` command - Rebuild control summaries

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, require_project};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::progress;

#[derive(clap::Args, Debug)]
pub struct RecomputeArgs {
    /// Project code; omit to recompute every project
    pub code: Option<String>,
}

pub fn run(args: RecomputeArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let results = match args.code.as_deref() {
        Some(code) => {
            let project = require_project(&store, code)?;
            let summary =
                progress::recompute(&store, project.id).map_err(|e| miette::miette!("{}", e))?;
            vec![(project, summary)]
        }
        None => progress::recompute_all(&store).map_err(|e| miette::miette!("{}", e))?,
    };

    if results.is_empty() {
        println!("No projects to recompute.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = results
                .iter()
                .map(|(project, summary)| {
                    serde_json::json!({
                        "project": project.code,
                        "summary": summary,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&values).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            let values: Vec<serde_json::Value> = results
                .iter()
                .map(|(project, summary)| {
                    serde_json::json!({
                        "project": project.code,
                        "summary": summary,
                    })
                })
                .collect();
            print!("{}", serde_yml::to_string(&values).into_diagnostic()?);
        }
        _ => {
            for (project, summary) in &results {
                println!(
                    "{} {} {} ({}/{} completed)",
                    style("✓").green(),
                    style(&project.code).cyan(),
                    style(format!("{:.2}%", summary.global_progress)).cyan(),
                    summary.completed_activities,
                    summary.total_activities,
                );
            }
            if results.len() > 1 {
                println!();
                println!("Recomputed {} project(s)", style(results.len()).cyan());
            }
        }
    }

    Ok(())
}
