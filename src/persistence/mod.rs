use crate::task::Task;
use crate::task_store::TaskStore;
use crate::task_validation;
use polars::prelude::PolarsError;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("database error: {0}")]
    Database(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database(value.to_string())
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A place the task list can be written to and restored from.
pub trait TaskPersistence {
    fn save_tasks(&self, store: &TaskStore) -> PersistenceResult<()>;
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load_tasks(&self) -> PersistenceResult<Option<TaskStore>>;
}

/// Checks the invariants every stored row must satisfy. Durations are left alone;
/// a bad duration is reported when a timetable is generated.
pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    for (idx, task) in tasks.iter().enumerate() {
        if task.subject.trim().is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "task #{} has an empty subject",
                idx + 1
            )));
        }
        task_validation::validate_priority(i64::from(task.priority)).map_err(|err| {
            PersistenceError::InvalidData(format!("task #{} ({}): {err}", idx + 1, task.subject))
        })?;
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    CsvTaskFile, load_tasks_from_csv, load_tasks_from_json, read_tasks_csv, save_tasks_to_csv,
    save_tasks_to_json, write_tasks_csv,
};
