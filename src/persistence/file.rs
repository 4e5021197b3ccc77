use super::{PersistenceError, PersistenceResult, TaskPersistence};
use crate::task::{TASK_COLUMNS, Task};
use crate::task_store::TaskStore;
use crate::task_validation;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
struct TaskSnapshot {
    tasks: Vec<Task>,
}

pub fn save_tasks_to_json<P: AsRef<Path>>(store: &TaskStore, path: P) -> PersistenceResult<()> {
    let tasks = store.tasks()?;
    super::validate_tasks(&tasks)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &TaskSnapshot { tasks })?;
    Ok(())
}

pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskStore> {
    let file = File::open(path)?;
    let snapshot: TaskSnapshot = serde_json::from_reader(file)?;
    super::validate_tasks(&snapshot.tasks)?;
    Ok(TaskStore::from_tasks(snapshot.tasks)?)
}

/// One line of the flat task table. Priority is read as text so a bad value can be
/// reported with its row number.
#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "Duration")]
    duration: String,
    #[serde(rename = "Priority")]
    priority: String,
    #[serde(rename = "Deadline", default)]
    deadline: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        Self {
            subject: task.subject.clone(),
            duration: task.duration.clone(),
            priority: task.priority.to_string(),
            deadline: task.deadline.clone(),
        }
    }
}

impl TaskCsvRecord {
    fn into_task(self, row: usize) -> PersistenceResult<Task> {
        let priority = self.priority.trim().parse::<i64>().map_err(|_| {
            PersistenceError::InvalidData(format!(
                "row {row}: priority '{}' is not an integer",
                self.priority
            ))
        })?;
        let priority = task_validation::validate_priority(priority)
            .map_err(|err| PersistenceError::InvalidData(format!("row {row}: {err}")))?;
        Ok(Task::new(self.subject, self.duration, priority, self.deadline))
    }
}

/// Writes the header row followed by one row per task.
pub fn write_tasks_csv<W: Write>(tasks: &[Task], writer: W) -> PersistenceResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(TASK_COLUMNS)?;
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_tasks_csv<R: Read>(reader: R) -> PersistenceResult<Vec<Task>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    for required in &TASK_COLUMNS[..3] {
        if !headers.iter().any(|h| h == *required) {
            return Err(PersistenceError::InvalidData(format!(
                "task table is missing the '{required}' column"
            )));
        }
    }
    let mut tasks = Vec::new();
    for (idx, record) in reader.deserialize::<TaskCsvRecord>().enumerate() {
        // header is line 1
        tasks.push(record?.into_task(idx + 2)?);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(store: &TaskStore, path: P) -> PersistenceResult<()> {
    let tasks = store.tasks()?;
    super::validate_tasks(&tasks)?;
    let file = File::create(path)?;
    write_tasks_csv(&tasks, file)
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskStore> {
    let file = File::open(path)?;
    let tasks = read_tasks_csv(file)?;
    Ok(TaskStore::from_tasks(tasks)?)
}

/// The flat CSV file the planner reads on start-up and writes on save.
#[derive(Debug, Clone)]
pub struct CsvTaskFile {
    path: PathBuf,
}

impl CsvTaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskPersistence for CsvTaskFile {
    fn save_tasks(&self, store: &TaskStore) -> PersistenceResult<()> {
        save_tasks_to_csv(store, &self.path)?;
        tracing::info!(path = %self.path.display(), rows = store.len(), "tasks saved");
        Ok(())
    }

    fn load_tasks(&self) -> PersistenceResult<Option<TaskStore>> {
        if !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "no task file to load");
            return Ok(None);
        }
        let store = load_tasks_from_csv(&self.path)?;
        tracing::info!(path = %self.path.display(), rows = store.len(), "tasks loaded");
        Ok(Some(store))
    }
}
