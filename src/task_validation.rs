use crate::duration::{DurationParseError, StudyDuration};
use crate::task::{MAX_PRIORITY, MIN_PRIORITY, Task};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    #[error("please fill in the required field '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    Duration(#[from] DurationParseError),
    #[error("duration must be longer than 0:00")]
    ZeroDuration,
    #[error("priority '{0}' must be an integer between 1 and 5")]
    InvalidPriority(String),
}

/// Raw field text as typed by the user, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub subject: String,
    pub duration: String,
    pub priority: String,
    pub deadline: String,
}

impl TaskDraft {
    pub fn new(
        subject: impl Into<String>,
        duration: impl Into<String>,
        priority: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            duration: duration.into(),
            priority: priority.into(),
            deadline: deadline.into(),
        }
    }

    /// Checks the draft and produces a task ready for the store.
    ///
    /// Fields are trimmed first. Subject, duration and priority are required; the
    /// deadline may be left empty.
    pub fn validate(&self) -> Result<Task, TaskValidationError> {
        let subject = self.subject.trim();
        let duration = self.duration.trim();
        let priority = self.priority.trim();
        let deadline = self.deadline.trim();

        if subject.is_empty() {
            return Err(TaskValidationError::MissingField("subject"));
        }
        if duration.is_empty() {
            return Err(TaskValidationError::MissingField("duration"));
        }
        if priority.is_empty() {
            return Err(TaskValidationError::MissingField("priority"));
        }

        if StudyDuration::parse_entry(duration)?.is_zero() {
            return Err(TaskValidationError::ZeroDuration);
        }
        let priority = parse_priority(priority)?;

        Ok(Task::new(subject, duration, priority, deadline))
    }
}

pub fn parse_priority(input: &str) -> Result<u8, TaskValidationError> {
    let value = input
        .trim()
        .parse::<i64>()
        .map_err(|_| TaskValidationError::InvalidPriority(input.to_string()))?;
    validate_priority(value)
        .map_err(|_| TaskValidationError::InvalidPriority(input.to_string()))
}

pub fn validate_priority(value: i64) -> Result<u8, TaskValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|p| (MIN_PRIORITY..=MAX_PRIORITY).contains(p))
        .ok_or_else(|| TaskValidationError::InvalidPriority(value.to_string()))
}
