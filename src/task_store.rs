use crate::calculations::SequentialPass;
use crate::task::Task;
use crate::task_validation::{TaskDraft, TaskValidationError};
use crate::timetable::{Timetable, TimetableOptions};
use chrono::NaiveDateTime;
use mockable::Clock;
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    #[error("no task at position {position} (store holds {len})")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),
}

/// Ordered collection of study tasks backed by a four-column table.
///
/// Tasks are only ever appended, removed by position, or cleared; rows are never
/// edited in place. Timetables are generated over a snapshot taken by [`TaskStore::tasks`].
pub struct TaskStore {
    df: DataFrame,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            df: DataFrame::empty_with_schema(&Task::schema()),
        }
    }

    pub fn from_tasks<I>(tasks: I) -> Result<Self, PolarsError>
    where
        I: IntoIterator<Item = Task>,
    {
        let mut store = Self::new();
        for task in tasks {
            store.push_task(task)?;
        }
        Ok(store)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Snapshot of the current tasks in insertion order.
    pub fn tasks(&self) -> Result<Vec<Task>, PolarsError> {
        let mut tasks = Vec::with_capacity(self.df.height());
        for idx in 0..self.df.height() {
            tasks.push(Task::from_dataframe_row(&self.df, idx)?);
        }
        Ok(tasks)
    }

    pub fn task(&self, position: usize) -> Result<Option<Task>, PolarsError> {
        if position >= self.df.height() {
            return Ok(None);
        }
        Task::from_dataframe_row(&self.df, position).map(Some)
    }

    /// Validates raw entry fields and appends the resulting task.
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, TaskStoreError> {
        let task = draft.validate()?;
        self.push_task(task.clone())?;
        tracing::debug!(subject = %task.subject, rows = self.len(), "task added");
        Ok(task)
    }

    /// Appends an already-built task without entry validation. Used when restoring
    /// rows from disk.
    pub fn push_task(&mut self, task: Task) -> Result<(), PolarsError> {
        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    /// Removes the task at `position` (0-based) and returns it.
    pub fn delete_task(&mut self, position: usize) -> Result<Task, TaskStoreError> {
        let len = self.df.height();
        if position >= len {
            return Err(TaskStoreError::PositionOutOfRange { position, len });
        }
        let snapshot = self.df.clone();
        let mut removed = None;
        let mut remaining = Vec::with_capacity(len - 1);
        for idx in 0..len {
            let task = Task::from_dataframe_row(&snapshot, idx)?;
            if idx == position {
                removed = Some(task);
            } else {
                remaining.push(task);
            }
        }

        self.df = DataFrame::empty_with_schema(&Task::schema());
        for task in remaining {
            self.push_task(task)?;
        }
        let removed = removed.ok_or(TaskStoreError::PositionOutOfRange { position, len })?;
        tracing::debug!(subject = %removed.subject, position, "task deleted");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.df = DataFrame::empty_with_schema(&Task::schema());
        tracing::debug!("task store cleared");
    }

    pub fn generate_timetable(
        &self,
        start: NaiveDateTime,
        options: &TimetableOptions,
    ) -> Result<Timetable, PolarsError> {
        let tasks = self.tasks()?;
        Ok(SequentialPass::new(&tasks, options).execute(start))
    }

    /// Same as [`TaskStore::generate_timetable`], starting at the clock's current local time.
    pub fn generate_timetable_now<C: Clock>(
        &self,
        clock: &C,
        options: &TimetableOptions,
    ) -> Result<Timetable, PolarsError> {
        self.generate_timetable(clock.local().naive_local(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> TaskStore {
        TaskStore::from_tasks(vec![
            Task::new("Math", "1:30", 2, "Mon"),
            Task::new("History", "0:45", 1, "Tue"),
            Task::new("Art", "0:20", 4, ""),
        ])
        .unwrap()
    }

    #[test]
    fn schema_contains_table_columns() {
        let store = TaskStore::new();
        let names: Vec<String> = store
            .dataframe()
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["Subject", "Duration", "Priority", "Deadline"]);
        assert!(store.is_empty());
    }

    #[test]
    fn add_task_appends_validated_rows() {
        let mut store = TaskStore::new();
        store
            .add_task(&TaskDraft::new(" Math ", "1:30", "2", "Mon"))
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.task(0).unwrap(),
            Some(Task::new("Math", "1:30", 2, "Mon"))
        );
    }

    #[test]
    fn add_task_rejects_invalid_draft_and_leaves_store_unchanged() {
        let mut store = sample_store();
        let err = store
            .add_task(&TaskDraft::new("Math", "1:30", "9", ""))
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::Validation(_)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn delete_task_removes_by_position_and_keeps_order() {
        let mut store = sample_store();
        let removed = store.delete_task(1).unwrap();
        assert_eq!(removed.subject, "History");
        let subjects: Vec<String> = store
            .tasks()
            .unwrap()
            .into_iter()
            .map(|t| t.subject)
            .collect();
        assert_eq!(subjects, vec!["Math", "Art"]);
    }

    #[test]
    fn delete_out_of_range_is_an_error() {
        let mut store = sample_store();
        let err = store.delete_task(3).unwrap_err();
        assert!(matches!(
            err,
            TaskStoreError::PositionOutOfRange {
                position: 3,
                len: 3
            }
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = sample_store();
        store.clear();
        assert!(store.is_empty());
        assert!(store.tasks().unwrap().is_empty());
    }

    #[test]
    fn generating_does_not_mutate_the_store() {
        let store = sample_store();
        let before = store.tasks().unwrap();
        let start = chrono::NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let timetable = store
            .generate_timetable(start, &TimetableOptions::default())
            .unwrap();
        assert_eq!(timetable.study_blocks().count(), 3);
        assert_eq!(store.tasks().unwrap(), before);
    }

    struct FixedClock(chrono::DateTime<chrono::Local>);

    impl Clock for FixedClock {
        fn local(&self) -> chrono::DateTime<chrono::Local> {
            self.0
        }

        fn utc(&self) -> chrono::DateTime<chrono::Utc> {
            self.0.with_timezone(&chrono::Utc)
        }
    }

    #[test]
    fn generate_now_starts_at_the_clock_reading() {
        use chrono::TimeZone;
        let now = chrono::Local
            .with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
            .single()
            .unwrap();
        let timetable = sample_store()
            .generate_timetable_now(&FixedClock(now), &TimetableOptions::default())
            .unwrap();
        assert_eq!(timetable.start(), now.naive_local());
        assert_eq!(timetable.blocks()[0].start(), now.naive_local());
        assert_eq!(timetable.blocks()[0].subject(), Some("History"));
    }
}
