pub mod assistant;
pub mod calculations;
pub mod config;
pub mod duration;
pub mod persistence;
pub mod task;
pub mod task_store;
pub mod task_validation;
pub mod timetable;

pub use calculations::sequential_pass::{generate, generate_timetable};
pub use config::{ConfigError, PlannerConfig};
pub use duration::{DurationParseError, StudyDuration};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteTaskStore;
pub use persistence::{
    CsvTaskFile, PersistenceError, TaskPersistence, load_tasks_from_csv, load_tasks_from_json,
    read_tasks_csv, save_tasks_to_csv, save_tasks_to_json, validate_tasks, write_tasks_csv,
};
pub use task::Task;
pub use task_store::{TaskStore, TaskStoreError};
pub use task_validation::{TaskDraft, TaskValidationError};
pub use timetable::{
    BreakPolicy, BreakPolicyError, Diagnostic, PriorityOrder, ScheduleBlock, Timetable,
    TimetableOptions,
};
