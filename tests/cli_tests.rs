#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains as str_contains;
use tempfile::TempDir;

#[allow(deprecated)]
fn run_cli(dir: &TempDir, script: &str) -> assert_cmd::assert::Assert {
    let data_file = dir.path().join("study_tasks.csv");
    let mut cmd = Command::cargo_bin("study-planner").expect("cli binary");
    cmd.arg("--data-file")
        .arg(data_file)
        .env("RUST_LOG", "off")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_generates_timetable_in_priority_order() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir,
        "add Math 1:30 2 Mon\nadd History 0:45 1 Tue\ngenerate 09:00\nquit\n",
    )
    .success()
    .stdout(str_contains("Generated Timetable:"))
    .stdout(str_contains("09:00 - 09:45: History (Priority 1)"))
    .stdout(str_contains("09:45 - 11:15: Math (Priority 2)"));
}

#[test]
fn cli_inserts_break_after_an_hour() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir,
        "add A 1:00 1\nadd B 0:30 2\ngenerate 14:00\nquit\n",
    )
    .success()
    .stdout(str_contains("15:00 - 15:15: *** BREAK TIME ***"))
    .stdout(str_contains("15:15 - 15:45: B (Priority 2)"));
}

#[test]
fn cli_rejects_invalid_priority() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "add Math 1:30 7\nlist\nquit\n")
        .success()
        .stdout(str_contains("must be an integer between 1 and 5"))
        .stdout(str_contains("No tasks."));
}

#[test]
fn cli_reports_empty_store_on_generate() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "generate\nquit\n")
        .success()
        .stdout(str_contains("No tasks available to generate a timetable."));
}

#[test]
fn cli_autosaves_and_reloads_tasks() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "add Math 1:30 2 Mon\nquit\n")
        .success()
        .stdout(str_contains("Tasks saved!"));

    let content = std::fs::read_to_string(dir.path().join("study_tasks.csv")).unwrap();
    assert_eq!(content, "Subject,Duration,Priority,Deadline\nMath,1:30,2,Mon\n");

    run_cli(&dir, "list\nquit\n")
        .success()
        .stdout(str_contains("1. Math - 1:30 (Priority: 2)"));
}

#[test]
fn cli_delete_command_removes_task() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "add A 0:30 1\nadd B 0:30 2\ndelete 1\nlist\nquit\n")
        .success()
        .stdout(str_contains("Task deleted! (A)"))
        .stdout(str_contains("1. B - 0:30 (Priority: 2)"));
}

#[test]
fn cli_delete_out_of_range_is_reported() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "add A 0:30 1\ndelete 5\nquit\n")
        .success()
        .stdout(str_contains("no task at position 4"));
}

#[test]
fn cli_chat_answers_known_topics() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "chat Break\nchat something else\nquit\n")
        .success()
        .stdout(str_contains(
            "AI: Take regular breaks: 15 minutes after each hour of study helps maintain focus.",
        ))
        .stdout(str_contains("AI: To get suggestions"));
}

#[test]
fn cli_export_and_import_json() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("tasks.json");
    let script = format!(
        "add Persist 0:40 3\nexport {}\nclear\nimport {}\nlist\nquit\n",
        json_path.display(),
        json_path.display()
    );
    let assert = run_cli(&dir, &script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let after_import = output.split("Tasks imported from").last().unwrap_or_default();
    assert!(
        after_import.contains("Persist - 0:40 (Priority: 3)"),
        "imported task should be listed:\n{}",
        output
    );
}

#[test]
fn cli_keeps_unreadable_data_file_intact() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("study_tasks.csv");
    let original =
        "Subject,Duration,Priority,Deadline\nMath,1:30,2,Mon\nHistory,0:45,1,Tue\nArt,0:30,9,\n";
    std::fs::write(&data_file, original).unwrap();

    run_cli(&dir, "add New 0:10 1\ndelete 1\nclear\nquit\n")
        .success()
        .stdout(str_contains("Error loading tasks"))
        .stdout(str_contains("Autosave is off for this session"))
        .stdout(str_contains("Tasks saved!").not());

    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), original);
}
