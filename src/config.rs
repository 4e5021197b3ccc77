use crate::timetable::{
    BreakPolicy, BreakPolicyError, DEFAULT_BREAK_LENGTH_MINUTES, DEFAULT_BREAK_THRESHOLD_MINUTES,
    PriorityOrder, TimetableOptions,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_FILE: &str = "study_tasks.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    BreakPolicy(#[from] BreakPolicyError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// CSV file the task list is loaded from and saved to.
    pub data_file: PathBuf,
    /// Write the task file after every add, delete and clear.
    pub autosave: bool,
    pub break_threshold_minutes: i64,
    pub break_length_minutes: i64,
    pub priority_order: PriorityOrder,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            autosave: true,
            break_threshold_minutes: DEFAULT_BREAK_THRESHOLD_MINUTES,
            break_length_minutes: DEFAULT_BREAK_LENGTH_MINUTES,
            priority_order: PriorityOrder::default(),
        }
    }
}

impl PlannerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.timetable_options()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn timetable_options(&self) -> Result<TimetableOptions, ConfigError> {
        Ok(TimetableOptions {
            break_policy: BreakPolicy::from_minutes(
                self.break_threshold_minutes,
                self.break_length_minutes,
            )?,
            priority_order: self.priority_order,
        })
    }
}
