//! `obra import` command - Spreadsheet ingestion

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_store;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::import::{self, ImportOptions, ImportReport, MappingProfile, NocOutcome};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Spreadsheet to import: an .xlsx workbook, or a directory of
    /// per-sheet CSV files
    pub source: Option<PathBuf>,

    /// Mapping profile: cover, consolidated, or a path to a profile YAML
    #[arg(long, short = 'p')]
    pub profile: Option<String>,

    /// Project code override (wins over the cover sheet)
    #[arg(long)]
    pub code: Option<String>,

    /// Project name override (wins over the cover sheet)
    #[arg(long)]
    pub name: Option<String>,

    /// Responsible person's username
    #[arg(long, short = 'r')]
    pub responsible: Option<String>,

    /// Print a built-in profile as YAML and exit (a starting point for
    /// custom profiles)
    #[arg(long, value_name = "NAME")]
    pub profile_template: Option<String>,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    // Template printing needs no workspace
    if let Some(name) = args.profile_template.as_deref() {
        let profile = MappingProfile::resolve(name).map_err(|e| miette::miette!("{}", e))?;
        print!("{}", profile.to_yaml().into_diagnostic()?);
        return Ok(());
    }

    let source_path = args.source.ok_or_else(|| {
        miette::miette!(
            "Give a spreadsheet to import, or --profile-template NAME to print a profile"
        )
    })?;

    let (_workspace, store) = open_store(global)?;
    let config = Config::load();

    let profile_spec = args
        .profile
        .or(config.default_profile)
        .unwrap_or_else(|| "cover".to_string());
    let profile = MappingProfile::resolve(&profile_spec).map_err(|e| miette::miette!("{}", e))?;

    let responsible_flag = args.responsible.or(config.responsible);
    let responsible = import::resolve_default_responsible(&store, responsible_flag.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;

    let mut source = import::open_source(&source_path).map_err(|e| miette::miette!("{}", e))?;

    let mut opts = ImportOptions::new(responsible.id);
    opts.code = args.code;
    opts.name = args.name;
    opts.source_label = source_path.display().to_string();
    opts.checksum = import::source_checksum(&source_path).into_diagnostic()?;

    let report =
        import::run(&store, source.as_mut(), &profile, &opts).map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        _ => render_report(&report, global.quiet),
    }

    Ok(())
}

fn render_report(report: &ImportReport, quiet: bool) {
    let skipped = if report.rows_skipped > 0 {
        format!(" ({} rows skipped)", report.rows_skipped)
    } else {
        String::new()
    };
    println!(
        "{} Imported {} activities into {}{}",
        style("✓").green(),
        style(report.activities_imported).cyan(),
        style(&report.project_code).cyan(),
        skipped,
    );

    if quiet {
        return;
    }

    let origin = |created: bool| if created { "created" } else { "existing" };
    println!(
        "  Company:  {} ({})",
        report.company,
        origin(report.company_created)
    );
    println!(
        "  Project:  {} - {} ({})",
        report.project_code,
        report.project_name,
        origin(report.project_created)
    );
    match report.nonconformities {
        NocOutcome::Imported(count) => println!("  Nonconformities: {} imported", count),
        NocOutcome::SheetAbsent => println!("  Nonconformities: no sheet in this source"),
        NocOutcome::NotConfigured => {}
    }
    println!(
        "  Global progress: {} ({}/{} completed)",
        style(format!("{:.2}%", report.global_progress)).cyan(),
        report.completed_activities,
        report.total_activities,
    );

    for warning in &report.warnings {
        println!("  {} {}", style("!").yellow(), warning);
    }
    for err in &report.row_errors {
        println!(
            "  {} {} row {}: {}",
            style("!").yellow(),
            err.sheet,
            err.row,
            err.message
        );
    }
}
