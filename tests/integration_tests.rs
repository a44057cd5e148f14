//! Integration tests for the obra CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.
//! Spreadsheet fixtures are written with rust_xlsxwriter so the import
//! pipeline runs against real workbook files.

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get an obra command
fn obra() -> Command {
    let mut cmd = Command::cargo_bin("obra").unwrap();
    // Keep the host shell's import defaults out of the tests
    cmd.env_remove("OBRA_RESPONSIBLE");
    cmd.env_remove("OBRA_PROFILE");
    cmd
}

/// Helper to create a workspace in a temp directory
fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    obra().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create an active admin account imports can fall back to
fn add_admin(tmp: &TempDir, username: &str) {
    obra()
        .current_dir(tmp.path())
        .args([
            "person",
            "add",
            "--username",
            username,
            "--full-name",
            "Site Manager",
            "--admin",
        ])
        .assert()
        .success();
}

/// Helper to create a project under a fixed client company
fn add_project(tmp: &TempDir, code: &str, name: &str) {
    obra()
        .current_dir(tmp.path())
        .args([
            "project",
            "add",
            "--code",
            code,
            "--name",
            name,
            "--company",
            "Constructora Andina",
        ])
        .assert()
        .success();
}

/// Helper to add an activity with a given progress
fn add_activity(tmp: &TempDir, code: &str, description: &str, progress: &str) {
    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            code,
            "-d",
            description,
            "--progress",
            progress,
        ])
        .assert()
        .success();
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    obra()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("construction project"));
}

#[test]
fn test_version_displays() {
    obra()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("obra"));
}

#[test]
fn test_unknown_command_fails() {
    obra()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_workspace_structure() {
    let tmp = TempDir::new().unwrap();

    obra()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized obra workspace"));

    assert!(tmp.path().join(".obra").is_dir());
    assert!(tmp.path().join(".obra/config.yaml").exists());

    let config = fs::read_to_string(tmp.path().join(".obra/config.yaml")).unwrap();
    assert!(config.contains("default_profile"));
    assert!(config.contains("responsible"));
}

#[test]
fn test_init_twice_warns_but_succeeds() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_reinitializes() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized obra workspace"));
}

// ============================================================================
// Workspace Discovery Tests
// ============================================================================

#[test]
fn test_commands_work_from_subdirectory() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    let sub = tmp.path().join("site/daily");
    fs::create_dir_all(&sub).unwrap();

    obra()
        .current_dir(&sub)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EDP001"));
}

#[test]
fn test_workspace_flag_overrides_discovery() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    let elsewhere = TempDir::new().unwrap();

    obra()
        .current_dir(elsewhere.path())
        .arg("--workspace")
        .arg(tmp.path())
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EDP001"));
}

#[test]
fn test_missing_workspace_fails() {
    let tmp = TempDir::new().unwrap();

    obra()
        .current_dir(tmp.path())
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an obra workspace"));
}

// ============================================================================
// Company Command Tests
// ============================================================================

#[test]
fn test_company_add() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args([
            "company",
            "add",
            "--name",
            "ACME",
            "--tax-id",
            "76.543.210-K",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created company ACME"));
}

#[test]
fn test_company_add_duplicate_name_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["company", "add", "--name", "ACME"])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["company", "add", "--name", "ACME"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_company_list_empty() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["company", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No companies found"));
}

#[test]
fn test_company_list_shows_companies() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["company", "add", "--name", "ACME"])
        .assert()
        .success();
    obra()
        .current_dir(tmp.path())
        .args(["company", "add", "--name", "Constructora Andina"])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["company", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ACME"))
        .stdout(predicate::str::contains("Constructora Andina"))
        .stdout(predicate::str::contains("2 company(ies)"));
}

// ============================================================================
// Person Command Tests
// ============================================================================

#[test]
fn test_person_add_admin() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args([
            "person",
            "add",
            "--username",
            "boss",
            "--full-name",
            "Site Manager",
            "--admin",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created person boss (admin)"));
}

#[test]
fn test_person_add_member() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args([
            "person",
            "add",
            "--username",
            "maria",
            "--full-name",
            "Maria Soto",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created person maria (member)"));
}

#[test]
fn test_person_add_duplicate_username_fails() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");

    obra()
        .current_dir(tmp.path())
        .args(["person", "add", "--username", "boss", "--full-name", "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_person_list_shows_people() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");

    obra()
        .current_dir(tmp.path())
        .args([
            "person",
            "add",
            "--username",
            "maria",
            "--full-name",
            "Maria Soto",
            "--inactive",
        ])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["person", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("boss"))
        .stdout(predicate::str::contains("maria"))
        .stdout(predicate::str::contains("2 person(s)"));
}

// ============================================================================
// Project Command Tests
// ============================================================================

#[test]
fn test_project_add_creates_company_on_the_fly() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args([
            "project",
            "add",
            "--code",
            "EDP001",
            "--name",
            "North plant piping",
            "--company",
            "Constructora Andina",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created company Constructora Andina"))
        .stdout(predicate::str::contains(
            "Created project EDP001 - North plant piping",
        ));
}

#[test]
fn test_project_add_reuses_existing_company() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "project",
            "add",
            "--code",
            "EDP002",
            "--name",
            "South yard drainage",
            "--company",
            "Constructora Andina",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project EDP002"))
        .stdout(predicate::str::contains("Created company").not());
}

#[test]
fn test_project_add_duplicate_code_fails() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "project",
            "add",
            "--code",
            "EDP001",
            "--name",
            "Different name",
            "--company",
            "Constructora Andina",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project 'EDP001' already exists"));
}

#[test]
fn test_project_add_invalid_status_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args([
            "project",
            "add",
            "--code",
            "EDP001",
            "--name",
            "North plant piping",
            "--company",
            "Constructora Andina",
            "--status",
            "bogus",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project status"));
}

#[test]
fn test_project_list_empty() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
}

#[test]
fn test_project_list_shows_projects() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_project(&tmp, "EDP002", "South yard drainage");

    obra()
        .current_dir(tmp.path())
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EDP001"))
        .stdout(predicate::str::contains("EDP002"))
        .stdout(predicate::str::contains("2 project(s)"));
}

#[test]
fn test_project_show_before_recompute() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["project", "show", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("North plant piping"))
        .stdout(predicate::str::contains("Constructora Andina"))
        .stdout(predicate::str::contains("not computed yet"));
}

#[test]
fn test_project_show_includes_progress_after_activity() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");
    add_activity(&tmp, "EDP001", "Pipe laying", "40");

    obra()
        .current_dir(tmp.path())
        .args(["project", "show", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 total, 1 completed"))
        .stdout(predicate::str::contains("50.00%"));
}

#[test]
fn test_project_show_unknown_code_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["project", "show", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project with code 'NOPE'"));
}

#[test]
fn test_project_rm_deletes_project() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    obra()
        .current_dir(tmp.path())
        .args(["project", "rm", "EDP001", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted project EDP001"));

    obra()
        .current_dir(tmp.path())
        .args(["project", "show", "EDP001"])
        .assert()
        .failure();
}

#[test]
fn test_project_rm_unknown_code_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["project", "rm", "NOPE", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project with code 'NOPE'"));
}

// ============================================================================
// Activity Command Tests
// ============================================================================

#[test]
fn test_activity_add_updates_summary() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            "EDP001",
            "-d",
            "Trench excavation",
            "--progress",
            "40",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added activity 1 to EDP001"))
        .stdout(predicate::str::contains("is now at 0.00% (0/1 completed)"));
}

#[test]
fn test_activity_add_completed_counts_toward_progress() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            "EDP001",
            "-d",
            "Mobilization",
            "--progress",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now at 50.00% (1/2 completed)"));
}

#[test]
fn test_activity_add_rejects_out_of_range_progress() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            "EDP001",
            "-d",
            "Trench excavation",
            "--progress",
            "150",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Progress must be between 0 and 100"));
}

#[test]
fn test_activity_add_invalid_status_fails() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            "EDP001",
            "-d",
            "Trench excavation",
            "--status",
            "bogus",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid activity status"));
}

#[test]
fn test_activity_add_invalid_date_fails() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            "EDP001",
            "-d",
            "Trench excavation",
            "--planned",
            "01/03/2024",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_activity_add_unknown_responsible_fails() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "activity",
            "add",
            "-p",
            "EDP001",
            "-d",
            "Trench excavation",
            "-r",
            "nobody",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No person with username 'nobody'"));
}

#[test]
fn test_activity_update_rederives_status_from_progress() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    obra()
        .current_dir(tmp.path())
        .args(["activity", "update", "1", "--progress", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updated activity 1 (completed at 100.00%)",
        ))
        .stdout(predicate::str::contains("is now at 100.00% (1/1 completed)"));
}

#[test]
fn test_activity_update_status_override_is_kept() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    obra()
        .current_dir(tmp.path())
        .args(["activity", "update", "1", "--status", "delayed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updated activity 1 (delayed at 40.00%)",
        ));
}

#[test]
fn test_activity_rm_recomputes_summary() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");

    obra()
        .current_dir(tmp.path())
        .args(["activity", "rm", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed activity 1"))
        .stdout(predicate::str::contains("is now at 0.00% (0/0 completed)"));
}

#[test]
fn test_activity_list_empty() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No activities in EDP001"));
}

#[test]
fn test_activity_list_shows_activities() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");
    add_activity(&tmp, "EDP001", "Pipe laying", "40");

    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trench excavation"))
        .stdout(predicate::str::contains("Pipe laying"))
        .stdout(predicate::str::contains("2 activity(s)"));
}

// ============================================================================
// Noc Command Tests
// ============================================================================

#[test]
fn test_noc_add_open_by_default() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "noc",
            "add",
            "-p",
            "EDP001",
            "-c",
            "NOC-1",
            "-d",
            "Weld porosity",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded NOC-1 against EDP001 (open)"));
}

#[test]
fn test_noc_add_closure_date_closes() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    // A closure date always wins over any status flag
    obra()
        .current_dir(tmp.path())
        .args([
            "noc",
            "add",
            "-p",
            "EDP001",
            "-c",
            "NOC-1",
            "-d",
            "Weld porosity",
            "--closure",
            "2024-03-05",
            "--status",
            "open",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(closed)"));
}

#[test]
fn test_noc_add_with_status_override() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "noc",
            "add",
            "-p",
            "EDP001",
            "-c",
            "NOC-1",
            "-d",
            "Weld porosity",
            "--status",
            "in_process",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(in_process)"));
}

#[test]
fn test_noc_close() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args([
            "noc",
            "add",
            "-p",
            "EDP001",
            "-c",
            "NOC-1",
            "-d",
            "Weld porosity",
        ])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["noc", "close", "1", "--date", "2024-03-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Closed NOC-1 on 2024-03-05"));

    // Closing again is a no-op, not an error
    obra()
        .current_dir(tmp.path())
        .args(["noc", "close", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already closed"));
}

#[test]
fn test_noc_close_unknown_id_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["noc", "close", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nonconformity 99 not found"));
}

#[test]
fn test_noc_list_for_project() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["noc", "add", "-p", "EDP001", "-c", "NOC-1", "-d", "Weld porosity"])
        .assert()
        .success();
    obra()
        .current_dir(tmp.path())
        .args([
            "noc",
            "add",
            "-p",
            "EDP001",
            "-c",
            "NOC-2",
            "-d",
            "Wrong coating",
            "--closure",
            "2024-03-05",
        ])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["noc", "list", "-p", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOC-1"))
        .stdout(predicate::str::contains("NOC-2"))
        .stdout(predicate::str::contains("2 nonconformity(s)"));
}

#[test]
fn test_noc_list_without_project_shows_only_open() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["noc", "add", "-p", "EDP001", "-c", "NOC-1", "-d", "Weld porosity"])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["noc", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOC-1"));

    obra()
        .current_dir(tmp.path())
        .args(["noc", "close", "1"])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["noc", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open nonconformities"));
}

// ============================================================================
// Import Command Tests
// ============================================================================

/// Write the multi-sheet layout: a cover sheet naming client and project,
/// an activity sheet with a direct percent column, and a nonconformity
/// sheet. Includes an echoed header row and a blank row to skip.
fn write_cover_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("edp.xlsx");
    let mut workbook = Workbook::new();

    let cover = workbook.add_worksheet();
    cover.set_name("CARATULA EP").unwrap();
    cover.write_string(0, 0, "Cliente").unwrap();
    cover.write_string(0, 1, "Nombre Proyecto").unwrap();
    cover.write_string(0, 2, "Supervisor").unwrap();
    cover.write_string(1, 0, "Constructora Andina").unwrap();
    cover.write_string(1, 1, "North plant piping").unwrap();
    cover.write_string(1, 2, "R. Vega").unwrap();

    let activities = workbook.add_worksheet();
    activities.set_name("EDP 001").unwrap();
    activities.write_string(0, 0, "Item").unwrap();
    activities.write_string(0, 1, "Descripción").unwrap();
    activities.write_string(0, 2, "Fecha Programada").unwrap();
    activities.write_string(0, 3, "Fecha Real").unwrap();
    activities.write_string(0, 4, "% Avance").unwrap();
    activities.write_string(0, 5, "Observaciones").unwrap();
    // Header labels echoed into the data, the importer must skip them
    activities.write_string(1, 0, "Item").unwrap();
    activities.write_string(1, 1, "Descripción").unwrap();
    activities.write_string(2, 0, "1.01").unwrap();
    activities.write_string(2, 1, "Trench excavation").unwrap();
    activities.write_string(2, 2, "2024-02-01").unwrap();
    activities.write_string(2, 3, "15/02/2024").unwrap();
    activities.write_number(2, 4, 100.0).unwrap();
    activities.write_string(3, 0, "1.02").unwrap();
    activities.write_string(3, 1, "Pipe laying").unwrap();
    activities.write_string(3, 2, "2024-03-01").unwrap();
    activities.write_number(3, 4, 40.0).unwrap();
    activities.write_string(3, 5, "waiting on valves").unwrap();
    // Row 4 stays blank; row 5 keeps it inside the used range
    activities.write_string(5, 0, "1.03").unwrap();
    activities.write_string(5, 1, "Hydro test").unwrap();

    let nocs = workbook.add_worksheet();
    nocs.set_name("NOC-1").unwrap();
    nocs.write_string(0, 0, "Código").unwrap();
    nocs.write_string(0, 1, "Descripción").unwrap();
    nocs.write_string(0, 2, "Causa").unwrap();
    nocs.write_string(0, 3, "Acción Correctiva").unwrap();
    nocs.write_string(0, 4, "Fecha Detectada").unwrap();
    nocs.write_string(0, 5, "Fecha Cierre").unwrap();
    nocs.write_string(0, 6, "Estado").unwrap();
    // No code cell: the importer assigns NOC-1 from the row position
    nocs.write_string(1, 1, "Weld porosity").unwrap();
    nocs.write_string(1, 2, "Moisture in electrodes").unwrap();
    nocs.write_string(1, 3, "Re-weld joints").unwrap();
    nocs.write_string(1, 4, "2024-02-20").unwrap();
    nocs.write_string(1, 6, "en proceso").unwrap();
    nocs.write_string(2, 0, "NC-7").unwrap();
    nocs.write_string(2, 1, "Wrong coating applied").unwrap();
    nocs.write_string(2, 4, "2024-02-25").unwrap();
    nocs.write_string(2, 5, "2024-03-05").unwrap();

    workbook.save(&path).unwrap();
    path
}

/// Write the single-sheet consolidated layout: quantities, an ODS column
/// family, and totals, all in the first sheet
fn write_consolidated_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("edp_full.xlsx");
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("EDP COMPLETO").unwrap();
    sheet.write_string(0, 0, "Nº").unwrap();
    sheet.write_string(0, 1, "ITEM").unwrap();
    sheet.write_string(0, 2, "U").unwrap();
    sheet.write_string(0, 3, "Cantidad").unwrap();
    sheet.write_string(0, 4, "PU").unwrap();
    sheet.write_string(0, 5, "ODS 1").unwrap();
    sheet.write_string(0, 6, "ODS2").unwrap();
    sheet.write_string(0, 7, "TOTALES").unwrap();
    sheet.write_string(1, 0, "Nº").unwrap();
    sheet.write_string(1, 1, "ITEM").unwrap();
    // Quantity ratio: 1 of 1 executed
    sheet.write_string(2, 0, "1").unwrap();
    sheet.write_string(2, 1, "Mobilize equipment").unwrap();
    sheet.write_string(2, 2, "gl").unwrap();
    sheet.write_number(2, 3, 1.0).unwrap();
    sheet.write_number(2, 4, 500.0).unwrap();
    sheet.write_number(2, 7, 1.0).unwrap();
    // Quantity ratio: 25 of 100 executed
    sheet.write_string(3, 0, "2").unwrap();
    sheet.write_string(3, 1, "Excavation").unwrap();
    sheet.write_string(3, 2, "m3").unwrap();
    sheet.write_number(3, 3, 100.0).unwrap();
    sheet.write_number(3, 4, 12.0).unwrap();
    sheet.write_number(3, 7, 25.0).unwrap();
    // Zero quantity: falls back to the mean of the ODS family
    sheet.write_string(4, 0, "3").unwrap();
    sheet.write_string(4, 1, "Night shift surcharge").unwrap();
    sheet.write_string(4, 2, "gl").unwrap();
    sheet.write_number(4, 3, 0.0).unwrap();
    sheet.write_number(4, 5, 10.0).unwrap();
    sheet.write_number(4, 6, 20.0).unwrap();

    workbook.save(&path).unwrap();
    path
}

/// Write the cover layout as a directory of CSV files, one per sheet
fn write_csv_sheets(dir: &Path) -> PathBuf {
    let sheets = dir.join("edp_sheets");
    fs::create_dir(&sheets).unwrap();
    fs::write(
        sheets.join("CARATULA EP.csv"),
        "Cliente,Nombre Proyecto,Supervisor\n\
         Constructora Andina,North plant piping,R. Vega\n",
    )
    .unwrap();
    fs::write(
        sheets.join("EDP 001.csv"),
        "Item,Descripción,Fecha Programada,Fecha Real,% Avance,Observaciones\n\
         1.01,Trench excavation,2024-02-01,2024-02-10,100,\n\
         1.02,Pipe laying,2024-03-01,,40,waiting on valves\n",
    )
    .unwrap();
    fs::write(
        sheets.join("NOC-1.csv"),
        "Código,Descripción,Causa,Acción Correctiva,Fecha Detectada,Fecha Cierre,Estado\n\
         ,Weld porosity,Moisture in electrodes,Re-weld joints,2024-02-20,,en proceso\n",
    )
    .unwrap();
    sheets
}

#[test]
fn test_import_cover_workbook_end_to_end() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 activities into EDP001"))
        .stdout(predicate::str::contains("(2 rows skipped)"))
        .stdout(predicate::str::contains("Constructora Andina (created)"))
        .stdout(predicate::str::contains("North plant piping (created)"))
        .stdout(predicate::str::contains("Nonconformities: 2 imported"))
        .stdout(predicate::str::contains(
            "Global progress: 33.33% (1/3 completed)",
        ));

    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trench excavation"))
        .stdout(predicate::str::contains("Hydro test"))
        .stdout(predicate::str::contains("3 activity(s)"));

    obra()
        .current_dir(tmp.path())
        .args(["noc", "list", "-p", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOC-1"))
        .stdout(predicate::str::contains("NC-7"));
}

#[test]
fn test_import_coerces_dates_and_collects_notes() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .assert()
        .success();

    // Day-first "15/02/2024" lands as an ISO actual date
    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP001", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"planned_date\": \"2024-02-01\""))
        .stdout(predicate::str::contains("\"actual_date\": \"2024-02-15\""))
        .stdout(predicate::str::contains("waiting on valves"))
        .stdout(predicate::str::contains("\"progress\": 40.0"))
        .stdout(predicate::str::contains("\"status\": \"pending\""));
}

#[test]
fn test_import_noc_statuses_and_codes() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["noc", "list", "-p", "EDP001", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": \"NOC-1\""))
        .stdout(predicate::str::contains("\"status\": \"in_process\""))
        .stdout(predicate::str::contains("\"code\": \"NC-7\""))
        .stdout(predicate::str::contains("\"status\": \"closed\""))
        .stdout(predicate::str::contains("2024-03-05"));
}

#[test]
fn test_import_consolidated_workbook() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_consolidated_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .args(["--profile", "consolidated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 activities into EDP-FULL"))
        .stdout(predicate::str::contains("Generic client (created)"))
        .stdout(predicate::str::contains(
            "Global progress: 33.33% (1/3 completed)",
        ));

    // Quantity ratio, ODS family mean, and the labeled note columns
    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP-FULL", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"progress\": 100.0"))
        .stdout(predicate::str::contains("\"progress\": 25.0"))
        .stdout(predicate::str::contains("\"progress\": 15.0"))
        .stdout(predicate::str::contains("Unit: gl | Qty: 1 | PU: 500 | Total: 1"));
}

#[test]
fn test_import_csv_directory() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let sheets = write_csv_sheets(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&sheets)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 activities into EDP001"))
        .stdout(predicate::str::contains("Nonconformities: 1 imported"))
        .stdout(predicate::str::contains(
            "Global progress: 50.00% (1/2 completed)",
        ));
}

#[test]
fn test_import_twice_appends_and_keeps_project() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .assert()
        .success()
        .stdout(predicate::str::contains("Constructora Andina (existing)"))
        .stdout(predicate::str::contains("North plant piping (existing)"))
        .stdout(predicate::str::contains("(2/6 completed)"));

    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 activity(s)"));

    // Both runs land in the project's import history
    obra()
        .current_dir(tmp.path())
        .args(["project", "show", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imports"))
        .stdout(predicate::str::contains("edp.xlsx"));
}

#[test]
fn test_import_code_and_name_overrides() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .args(["--code", "CON-7", "--name", "Renamed scope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 activities into CON-7"));

    obra()
        .current_dir(tmp.path())
        .args(["project", "list", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": \"CON-7\""))
        .stdout(predicate::str::contains("\"name\": \"Renamed scope\""));
}

#[test]
fn test_import_with_explicit_responsible() {
    let tmp = setup_workspace();
    let workbook = write_cover_workbook(tmp.path());

    // A named responsible does not need the admin flag
    obra()
        .current_dir(tmp.path())
        .args([
            "person",
            "add",
            "--username",
            "maria",
            "--full-name",
            "Maria Soto",
        ])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .args(["-r", "maria"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 activities"));

    obra()
        .current_dir(tmp.path())
        .args(["project", "list", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"responsible_id\": 1"));
}

#[test]
fn test_import_without_responsible_writes_nothing() {
    let tmp = setup_workspace();
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No responsible party"));

    obra()
        .current_dir(tmp.path())
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));

    obra()
        .current_dir(tmp.path())
        .args(["company", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No companies found"));
}

#[test]
fn test_import_unknown_responsible_fails() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .args(["-r", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No person with username 'nobody'"));
}

#[test]
fn test_import_missing_source_fails() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");

    obra()
        .current_dir(tmp.path())
        .args(["import", "missing.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source not found"));
}

#[test]
fn test_import_unknown_profile_fails() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .args(["--profile", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown profile: nope"));
}

#[test]
fn test_import_without_source_or_template_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Give a spreadsheet to import"));
}

#[test]
fn test_import_profile_template_needs_no_workspace() {
    let tmp = TempDir::new().unwrap();

    obra()
        .current_dir(tmp.path())
        .args(["import", "--profile-template", "cover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CARATULA EP"))
        .stdout(predicate::str::contains("% Avance"));

    obra()
        .current_dir(tmp.path())
        .args(["import", "--profile-template", "consolidated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cantidad"))
        .stdout(predicate::str::contains("TOTALES"));
}

#[test]
fn test_import_custom_profile_yaml() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");

    let profile_path = tmp.path().join("site.yaml");
    fs::write(
        &profile_path,
        r#"
name: site
activities:
  sheet: Avance
  description_columns: [Partida]
  progress_columns: ["% Real"]
defaults:
  company: Minera Norte
  project_code: CON-042
  project_name: Concentrator maintenance
"#,
    )
    .unwrap();

    let sheets = tmp.path().join("site_sheets");
    fs::create_dir(&sheets).unwrap();
    fs::write(
        sheets.join("Avance.csv"),
        "Partida,% Real\n\
         Mill relining,80\n\
         Conveyor splice,\n",
    )
    .unwrap();

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&sheets)
        .arg("--profile")
        .arg(&profile_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 activities into CON-042"))
        .stdout(predicate::str::contains("Minera Norte (created)"))
        .stdout(predicate::str::contains(
            "Global progress: 0.00% (0/2 completed)",
        ));

    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "CON-042", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mill relining"))
        .stdout(predicate::str::contains("\"progress\": 80.0"));
}

#[test]
fn test_import_json_report() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .args(["-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"activities_imported\": 3"))
        .stdout(predicate::str::contains("\"rows_skipped\": 2"))
        .stdout(predicate::str::contains("\"project_code\": \"EDP001\""));
}

#[test]
fn test_import_quiet_keeps_only_the_headline() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");
    let workbook = write_cover_workbook(tmp.path());

    obra()
        .current_dir(tmp.path())
        .arg("import")
        .arg(&workbook)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 activities"))
        .stdout(predicate::str::contains("Company:").not());
}

// ============================================================================
// Recompute Command Tests
// ============================================================================

#[test]
fn test_recompute_single_project() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");
    add_activity(&tmp, "EDP001", "Pipe laying", "40");

    obra()
        .current_dir(tmp.path())
        .args(["recompute", "EDP001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EDP001"))
        .stdout(predicate::str::contains("50.00%"));
}

#[test]
fn test_recompute_all_projects() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_project(&tmp, "EDP002", "South yard drainage");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");

    obra()
        .current_dir(tmp.path())
        .arg("recompute")
        .assert()
        .success()
        .stdout(predicate::str::contains("EDP001"))
        .stdout(predicate::str::contains("EDP002"))
        .stdout(predicate::str::contains("Recomputed 2 project(s)"));
}

#[test]
fn test_recompute_empty_workspace() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .arg("recompute")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects to recompute"));
}

#[test]
fn test_recompute_unknown_project_fails() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["recompute", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project with code 'NOPE'"));
}

// ============================================================================
// Status Command Tests
// ============================================================================

#[test]
fn test_status_empty_workspace() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Obra Status"))
        .stdout(predicate::str::contains("PROJECTS"))
        .stdout(predicate::str::contains("ACTIVITIES"))
        .stdout(predicate::str::contains("NONCONFORMITIES"))
        .stdout(predicate::str::contains("Workspace Health: Healthy"));
}

#[test]
fn test_status_shows_progress_rows() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");
    add_activity(&tmp, "EDP001", "Pipe laying", "40");

    obra()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROGRESS"))
        .stdout(predicate::str::contains("EDP001"))
        .stdout(predicate::str::contains("(1/2 completed)"));
}

#[test]
fn test_status_open_nocs_degrade_health() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    for code in ["NOC-1", "NOC-2", "NOC-3"] {
        obra()
            .current_dir(tmp.path())
            .args(["noc", "add", "-p", "EDP001", "-c", code, "-d", "Defect"])
            .assert()
            .success();
    }

    obra()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace Health: Warning"));
}

#[test]
fn test_status_json_format() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    obra()
        .current_dir(tmp.path())
        .args(["status", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"projects\""))
        .stdout(predicate::str::contains("\"avg_progress\""))
        .stdout(predicate::str::contains("\"nonconformities\""));
}

// ============================================================================
// Report Command Tests
// ============================================================================

#[test]
fn test_report_progress_stdout() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "100");
    add_activity(&tmp, "EDP001", "Pipe laying", "40");

    obra()
        .current_dir(tmp.path())
        .args(["report", "progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Progress Report"))
        .stdout(predicate::str::contains("| Project |"))
        .stdout(predicate::str::contains("EDP001"))
        .stdout(predicate::str::contains("50.00%"))
        .stdout(predicate::str::contains("Average activity progress: 70.00%"));
}

#[test]
fn test_report_progress_to_file() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    let report_path = tmp.path().join("progress.md");
    obra()
        .current_dir(tmp.path())
        .args(["report", "progress", "-o"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to:"));

    let content = fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("# Progress Report"));
    assert!(content.contains("EDP001"));
}

#[test]
fn test_report_noc_lists_open() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["noc", "add", "-p", "EDP001", "-c", "NOC-1", "-d", "Weld porosity"])
        .assert()
        .success();
    obra()
        .current_dir(tmp.path())
        .args([
            "noc",
            "add",
            "-p",
            "EDP001",
            "-c",
            "NOC-2",
            "-d",
            "Wrong coating",
            "--closure",
            "2024-03-05",
        ])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["report", "noc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Nonconformity Report"))
        .stdout(predicate::str::contains("## Summary"))
        .stdout(predicate::str::contains("## Open Nonconformities"))
        .stdout(predicate::str::contains("NOC-1"))
        .stdout(predicate::str::contains("Weld porosity"));
}

#[test]
fn test_report_noc_empty_workspace() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["report", "noc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Nonconformity Report"))
        .stdout(predicate::str::contains("(none)"));
}

// ============================================================================
// Output Format Tests
// ============================================================================

#[test]
fn test_company_list_json_format() {
    let tmp = setup_workspace();

    obra()
        .current_dir(tmp.path())
        .args(["company", "add", "--name", "ACME"])
        .assert()
        .success();

    obra()
        .current_dir(tmp.path())
        .args(["company", "list", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"ACME\""));
}

#[test]
fn test_person_list_yaml_format() {
    let tmp = setup_workspace();
    add_admin(&tmp, "boss");

    obra()
        .current_dir(tmp.path())
        .args(["person", "list", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("username: boss"));
}

#[test]
fn test_project_list_id_format() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["project", "list", "-f", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_project_list_md_format() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");

    obra()
        .current_dir(tmp.path())
        .args(["project", "list", "-f", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "| Code | Name | Company | Status | Start | Progress |",
        ))
        .stdout(predicate::str::contains("EDP001"));
}

#[test]
fn test_activity_list_csv_format() {
    let tmp = setup_workspace();
    add_project(&tmp, "EDP001", "North plant piping");
    add_activity(&tmp, "EDP001", "Trench excavation", "40");

    obra()
        .current_dir(tmp.path())
        .args(["activity", "list", "-p", "EDP001", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "id,item,description,planned_date,actual_date,progress,status",
        ))
        .stdout(predicate::str::contains("Trench excavation"));
}

// ============================================================================
// Completions Command Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    obra()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("obra"));
}
