//! `obra status` command - Workspace status dashboard

use console::style;
use miette::Result;
use std::collections::HashMap;

use crate::cli::helpers::open_store;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Store, StoreError};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let (_workspace, store) = open_store(global)?;

    let project_metrics = collect_project_metrics(&store);
    let activity_metrics = collect_activity_metrics(&store);
    let noc_metrics = collect_noc_metrics(&store);
    let progress_rows =
        collect_progress_rows(&store).map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "projects": project_metrics,
                "activities": activity_metrics,
                "nonconformities": noc_metrics,
                "progress": progress_rows,
            });
            println!("{}", serde_json::to_string_pretty(&status).unwrap_or_default());
        }
        _ => {
            let width = 68;

            println!("{}", style("Obra Status").bold().underlined());
            println!("{}", "═".repeat(width));
            println!();

            print_two_columns(
                "PROJECTS",
                &format_project_metrics(&project_metrics),
                "ACTIVITIES",
                &format_activity_metrics(&activity_metrics),
            );

            println!();
            print_section("NONCONFORMITIES", &format_noc_metrics(&noc_metrics));

            if !progress_rows.is_empty() {
                println!();
                print_section("PROGRESS", &format_progress_rows(&progress_rows));
            }

            println!();
            println!("{}", "═".repeat(width));

            let health = calculate_health(&project_metrics, &activity_metrics, &noc_metrics);
            let health_style = match health.as_str() {
                "Healthy" => style(health.clone()).green().bold(),
                "Warning" => style(health.clone()).yellow().bold(),
                "Critical" => style(health.clone()).red().bold(),
                _ => style(health.clone()).dim(),
            };
            println!("Workspace Health: {}", health_style);
        }
    }

    Ok(())
}

#[derive(serde::Serialize, Default)]
struct ProjectMetrics {
    total: usize,
    by_status: HashMap<String, usize>,
}

#[derive(serde::Serialize, Default)]
struct ActivityMetrics {
    total: usize,
    by_status: HashMap<String, usize>,
    avg_progress: f64,
}

#[derive(serde::Serialize, Default)]
struct NocMetrics {
    total: usize,
    by_status: HashMap<String, usize>,
}

#[derive(serde::Serialize)]
struct ProgressRow {
    code: String,
    name: String,
    progress: Option<f64>,
    completed: i64,
    total: i64,
}

fn collect_project_metrics(store: &Store) -> ProjectMetrics {
    let mut metrics = ProjectMetrics::default();
    for entry in store.project_status_counts() {
        metrics.total += entry.count;
        metrics.by_status.insert(entry.status, entry.count);
    }
    metrics
}

fn collect_activity_metrics(store: &Store) -> ActivityMetrics {
    let mut metrics = ActivityMetrics::default();
    for entry in store.activity_status_counts() {
        metrics.total += entry.count;
        metrics.by_status.insert(entry.status, entry.count);
    }
    metrics.avg_progress = store.average_progress().unwrap_or(0.0);
    metrics
}

fn collect_noc_metrics(store: &Store) -> NocMetrics {
    let mut metrics = NocMetrics::default();
    for entry in store.noc_status_counts() {
        metrics.total += entry.count;
        metrics.by_status.insert(entry.status, entry.count);
    }
    metrics
}

fn collect_progress_rows(store: &Store) -> Result<Vec<ProgressRow>, StoreError> {
    let mut rows = Vec::new();
    for project in store.list_projects()? {
        let summary = store.summary(project.id)?;
        let (progress, completed, total) = match summary {
            Some(s) => (
                Some(s.global_progress),
                s.completed_activities,
                s.total_activities,
            ),
            None => {
                let (total, completed) = store.activity_counts(project.id)?;
                (None, completed, total)
            }
        };
        rows.push(ProgressRow {
            code: project.code,
            name: project.name,
            progress,
            completed,
            total,
        });
    }
    Ok(rows)
}

fn count_of(by_status: &HashMap<String, usize>, key: &str) -> usize {
    *by_status.get(key).unwrap_or(&0)
}

fn format_project_metrics(m: &ProjectMetrics) -> Vec<String> {
    let mut lines = vec![
        format!("Total:       {}", m.total),
        format!("In progress: {}", count_of(&m.by_status, "in_progress")),
        format!("Planned:     {}", count_of(&m.by_status, "planned")),
        format!("Finished:    {}", count_of(&m.by_status, "finished")),
    ];
    let suspended = count_of(&m.by_status, "suspended");
    if suspended > 0 {
        lines.push(format!("Suspended:   {} {}", suspended, style("⚠").yellow()));
    }
    lines
}

fn format_activity_metrics(m: &ActivityMetrics) -> Vec<String> {
    let mut lines = vec![
        format!("Total:       {}", m.total),
        format!("Completed:   {}", count_of(&m.by_status, "completed")),
        format!("In progress: {}", count_of(&m.by_status, "in_progress")),
        format!("Pending:     {}", count_of(&m.by_status, "pending")),
    ];
    let delayed = count_of(&m.by_status, "delayed");
    if delayed > 0 {
        lines.push(format!("Delayed:     {} {}", delayed, style("⚠").red()));
    }
    lines.push(format!("Avg:         {:.2}%", m.avg_progress));
    lines
}

fn format_noc_metrics(m: &NocMetrics) -> Vec<String> {
    let open = count_of(&m.by_status, "open");
    let mut lines = Vec::new();
    if open > 0 {
        lines.push(format!("Open:        {} {}", open, style("⚠").red()));
    } else {
        lines.push(format!("Open:        {}", open));
    }
    lines.push(format!(
        "In process:  {}",
        count_of(&m.by_status, "in_process")
    ));
    lines.push(format!("Closed:      {}", count_of(&m.by_status, "closed")));
    lines
}

fn format_progress_rows(rows: &[ProgressRow]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            let pct = match row.progress {
                Some(p) => format!("{:>7.2}%", p),
                None => format!("{:>8}", "-"),
            };
            format!(
                "{:<10} {}  ({}/{} completed)",
                row.code, pct, row.completed, row.total
            )
        })
        .collect()
}

fn print_two_columns(title1: &str, lines1: &[String], title2: &str, lines2: &[String]) {
    let col_width = 32;

    println!("{:<col_width$} {}", style(title1).bold(), style(title2).bold());
    println!("{:-<col_width$} {:-<col_width$}", "", "");

    let max_lines = lines1.len().max(lines2.len());

    for i in 0..max_lines {
        let l1 = lines1.get(i).map(|s| s.as_str()).unwrap_or("");
        let l2 = lines2.get(i).map(|s| s.as_str()).unwrap_or("");
        println!("  {:<30} {}", l1, l2);
    }
}

fn print_section(title: &str, lines: &[String]) {
    println!("{}", style(title).bold());
    println!("{:-<64}", "");
    for line in lines {
        println!("  {}", line);
    }
}

fn calculate_health(
    projects: &ProjectMetrics,
    activities: &ActivityMetrics,
    nocs: &NocMetrics,
) -> String {
    let mut score = 100i32;

    let open_nocs = count_of(&nocs.by_status, "open");
    if open_nocs > 0 {
        score -= 10 * open_nocs as i32;
    }

    let delayed = count_of(&activities.by_status, "delayed");
    if delayed > 0 {
        score -= 15 * delayed as i32;
    }

    let suspended = count_of(&projects.by_status, "suspended");
    if suspended > 0 {
        score -= 10 * suspended as i32;
    }

    if count_of(&nocs.by_status, "in_process") > 3 {
        score -= 5;
    }

    match score {
        80..=100 => "Healthy".to_string(),
        50..=79 => "Warning".to_string(),
        _ => "Critical".to_string(),
    }
}
