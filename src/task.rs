use crate::duration::{DurationParseError, StudyDuration};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const SUBJECT_COLUMN: &str = "Subject";
pub const DURATION_COLUMN: &str = "Duration";
pub const PRIORITY_COLUMN: &str = "Priority";
pub const DEADLINE_COLUMN: &str = "Deadline";

/// Column order of the persisted task table.
pub const TASK_COLUMNS: [&str; 4] = [
    SUBJECT_COLUMN,
    DURATION_COLUMN,
    PRIORITY_COLUMN,
    DEADLINE_COLUMN,
];

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// One row of the task store.
///
/// `duration` keeps the text exactly as entered or loaded; it is only parsed when a
/// timetable is generated, so a malformed value surfaces as a generation diagnostic
/// rather than a load failure. `deadline` is informational and never affects ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub subject: String,
    pub duration: String,
    pub priority: u8,
    #[serde(default)]
    pub deadline: String,
}

impl Task {
    pub fn new(
        subject: impl Into<String>,
        duration: impl Into<String>,
        priority: u8,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            duration: duration.into(),
            priority,
            deadline: deadline.into(),
        }
    }

    pub fn parsed_duration(&self) -> Result<StudyDuration, DurationParseError> {
        StudyDuration::parse(&self.duration)
    }

    /// Short form used by the task list.
    pub fn list_line(&self) -> String {
        format!(
            "{} - {} (Priority: {})",
            self.subject, self.duration, self.priority
        )
    }

    pub fn detail_line(&self) -> String {
        format!(
            "Subject: {}, Duration: {}, Priority: {}, Deadline: {}",
            self.subject, self.duration, self.priority, self.deadline
        )
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(TASK_COLUMNS.len());

        let subject: [&str; 1] = [self.subject.as_str()];
        columns.push(Series::new(PlSmallStr::from_static(SUBJECT_COLUMN), subject).into_column());

        let duration: [&str; 1] = [self.duration.as_str()];
        columns
            .push(Series::new(PlSmallStr::from_static(DURATION_COLUMN), duration).into_column());

        let priority: [i32; 1] = [i32::from(self.priority)];
        columns
            .push(Series::new(PlSmallStr::from_static(PRIORITY_COLUMN), priority).into_column());

        let deadline: [&str; 1] = [self.deadline.as_str()];
        columns
            .push(Series::new(PlSmallStr::from_static(DEADLINE_COLUMN), deadline).into_column());

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let subject = df
            .column(SUBJECT_COLUMN)?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let duration = df
            .column(DURATION_COLUMN)?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let raw_priority = df
            .column(PRIORITY_COLUMN)?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing priority".into()))?;
        let priority = u8::try_from(raw_priority).map_err(|_| {
            PolarsError::ComputeError(format!("task priority {raw_priority} out of range").into())
        })?;

        let deadline = df
            .column(DEADLINE_COLUMN)?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        Ok(Self {
            subject,
            duration,
            priority,
            deadline,
        })
    }

    pub(crate) fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new(SUBJECT_COLUMN.into(), DataType::String),
            Field::new(DURATION_COLUMN.into(), DataType::String),
            Field::new(PRIORITY_COLUMN.into(), DataType::Int32),
            Field::new(DEADLINE_COLUMN.into(), DataType::String),
        ])
    }
}
