use study_planner::{
    CsvTaskFile, PersistenceError, Task, TaskPersistence, TaskStore, load_tasks_from_csv,
    load_tasks_from_json, save_tasks_to_csv, save_tasks_to_json,
};
use tempfile::{NamedTempFile, TempDir};

fn build_sample_store() -> TaskStore {
    TaskStore::from_tasks(vec![
        Task::new("Math", "1:30", 2, "Mon"),
        Task::new("History", "0:45", 1, "Tue"),
        Task::new("Reading, chapter 4", "12:05", 5, ""),
        Task::new("Broken", "abc", 3, "Fri"),
        Task::new("Quotes \"and\" more", "0:30", 4, "next week"),
    ])
    .unwrap()
}

#[test]
fn csv_round_trip_preserves_rows_and_order() {
    let store = build_sample_store();
    let file = NamedTempFile::new().unwrap();

    save_tasks_to_csv(&store, file.path()).unwrap();
    let loaded = load_tasks_from_csv(file.path()).unwrap();

    assert_eq!(loaded.tasks().unwrap(), store.tasks().unwrap());
}

#[test]
fn csv_file_has_exact_header_row() {
    let store = build_sample_store();
    let file = NamedTempFile::new().unwrap();
    save_tasks_to_csv(&store, file.path()).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("Subject,Duration,Priority,Deadline"));
    assert_eq!(lines.next(), Some("Math,1:30,2,Mon"));
}

#[test]
fn empty_store_round_trips_through_csv() {
    let file = NamedTempFile::new().unwrap();
    save_tasks_to_csv(&TaskStore::new(), file.path()).unwrap();
    let loaded = load_tasks_from_csv(file.path()).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn json_round_trip_preserves_rows_and_order() {
    let store = build_sample_store();
    let file = NamedTempFile::new().unwrap();

    save_tasks_to_json(&store, file.path()).unwrap();
    let loaded = load_tasks_from_json(file.path()).unwrap();

    assert_eq!(loaded.tasks().unwrap(), store.tasks().unwrap());
}

#[test]
fn json_load_rejects_out_of_range_priority() {
    let snapshot = serde_json::json!({
        "tasks": [
            { "subject": "Math", "duration": "1:00", "priority": 9, "deadline": "" }
        ]
    });
    let file = NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(file.as_file(), &snapshot).unwrap();

    match load_tasks_from_json(file.path()) {
        Err(PersistenceError::InvalidData(msg)) => assert!(msg.contains("Math"), "{msg}"),
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("expected invalid data"),
    }
}

#[test]
fn csv_load_rejects_out_of_range_priority() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        "Subject,Duration,Priority,Deadline\nMath,1:00,0,Mon\n",
    )
    .unwrap();
    assert!(matches!(
        load_tasks_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn csv_task_file_reports_missing_file_as_none() {
    let dir = TempDir::new().unwrap();
    let file = CsvTaskFile::new(dir.path().join("study_tasks.csv"));
    assert!(file.load_tasks().unwrap().is_none());
}

#[test]
fn csv_task_file_save_then_load() {
    let dir = TempDir::new().unwrap();
    let file = CsvTaskFile::new(dir.path().join("study_tasks.csv"));
    let store = build_sample_store();

    file.save_tasks(&store).unwrap();
    let loaded = file.load_tasks().unwrap().expect("saved tasks");
    assert_eq!(loaded.tasks().unwrap(), store.tasks().unwrap());
}
