use crate::duration::DurationParseError;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_BREAK_THRESHOLD_MINUTES: i64 = 60;
pub const DEFAULT_BREAK_LENGTH_MINUTES: i64 = 15;
/// Upper bound for both break settings: one day.
pub const MAX_BREAK_POLICY_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakPolicyError {
    #[error("break threshold must be positive (got {0} minutes)")]
    NonPositiveThreshold(i64),
    #[error("break length must be positive (got {0} minutes)")]
    NonPositiveLength(i64),
    #[error("break threshold must be at most 1440 minutes (got {0})")]
    ThresholdTooLarge(i64),
    #[error("break length must be at most 1440 minutes (got {0})")]
    LengthTooLarge(i64),
}

/// When breaks are inserted and how long they last.
///
/// A break is placed before a study block once the study time accumulated since the
/// previous break reaches `threshold`. The check only happens between tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BreakPolicyMinutes", into = "BreakPolicyMinutes")]
pub struct BreakPolicy {
    threshold: Duration,
    length: Duration,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BreakPolicyMinutes {
    threshold_minutes: i64,
    length_minutes: i64,
}

impl TryFrom<BreakPolicyMinutes> for BreakPolicy {
    type Error = BreakPolicyError;

    fn try_from(value: BreakPolicyMinutes) -> Result<Self, Self::Error> {
        BreakPolicy::from_minutes(value.threshold_minutes, value.length_minutes)
    }
}

impl From<BreakPolicy> for BreakPolicyMinutes {
    fn from(value: BreakPolicy) -> Self {
        Self {
            threshold_minutes: value.threshold.num_minutes(),
            length_minutes: value.length.num_minutes(),
        }
    }
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            threshold: Duration::minutes(DEFAULT_BREAK_THRESHOLD_MINUTES),
            length: Duration::minutes(DEFAULT_BREAK_LENGTH_MINUTES),
        }
    }
}

impl BreakPolicy {
    pub fn from_minutes(threshold_minutes: i64, length_minutes: i64) -> Result<Self, BreakPolicyError> {
        if threshold_minutes <= 0 {
            return Err(BreakPolicyError::NonPositiveThreshold(threshold_minutes));
        }
        if threshold_minutes > MAX_BREAK_POLICY_MINUTES {
            return Err(BreakPolicyError::ThresholdTooLarge(threshold_minutes));
        }
        if length_minutes <= 0 {
            return Err(BreakPolicyError::NonPositiveLength(length_minutes));
        }
        if length_minutes > MAX_BREAK_POLICY_MINUTES {
            return Err(BreakPolicyError::LengthTooLarge(length_minutes));
        }
        let threshold = Duration::try_minutes(threshold_minutes)
            .ok_or(BreakPolicyError::ThresholdTooLarge(threshold_minutes))?;
        let length = Duration::try_minutes(length_minutes)
            .ok_or(BreakPolicyError::LengthTooLarge(length_minutes))?;
        Ok(Self { threshold, length })
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn length(&self) -> Duration {
        self.length
    }
}

/// Which end of the 1-5 priority scale is scheduled first. Sorting is stable in
/// both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityOrder {
    /// Priority 1 runs first.
    #[default]
    HighestFirst,
    /// Priority 5 runs first.
    LowestFirst,
}

impl PriorityOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighestFirst => "highest_first",
            Self::LowestFirst => "lowest_first",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimetableOptions {
    #[serde(default)]
    pub break_policy: BreakPolicy,
    #[serde(default)]
    pub priority_order: PriorityOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleBlock {
    Study {
        subject: String,
        priority: u8,
        /// Position of the source task in the generator's input.
        task_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Break {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl ScheduleBlock {
    pub fn start(&self) -> NaiveDateTime {
        match self {
            Self::Study { start, .. } | Self::Break { start, .. } => *start,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        match self {
            Self::Study { end, .. } | Self::Break { end, .. } => *end,
        }
    }

    pub fn length(&self) -> Duration {
        self.end() - self.start()
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break { .. })
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Study { subject, .. } => Some(subject),
            Self::Break { .. } => None,
        }
    }

    pub fn render_line(&self) -> String {
        let span = format!(
            "{} - {}",
            self.start().format("%H:%M"),
            self.end().format("%H:%M")
        );
        match self {
            Self::Study {
                subject, priority, ..
            } => format!("{span}: {subject} (Priority {priority})"),
            Self::Break { .. } => format!("{span}: *** BREAK TIME ***"),
        }
    }
}

/// Non-fatal condition reported by a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    NothingToSchedule,
    InvalidDuration {
        task_index: usize,
        subject: String,
        duration: String,
        reason: String,
    },
    ZeroDuration {
        task_index: usize,
        subject: String,
    },
    /// The task would end past the last representable date and time.
    OutOfRange {
        task_index: usize,
        subject: String,
    },
}

impl Diagnostic {
    pub(crate) fn invalid_duration(
        task_index: usize,
        subject: &str,
        duration: &str,
        err: &DurationParseError,
    ) -> Self {
        Self::InvalidDuration {
            task_index,
            subject: subject.to_string(),
            duration: duration.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn task_index(&self) -> Option<usize> {
        match self {
            Self::NothingToSchedule => None,
            Self::InvalidDuration { task_index, .. }
            | Self::ZeroDuration { task_index, .. }
            | Self::OutOfRange { task_index, .. } => Some(*task_index),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NothingToSchedule => {
                write!(f, "No tasks available to generate a timetable.")
            }
            Diagnostic::InvalidDuration {
                subject, reason, ..
            } => write!(
                f,
                "Invalid duration format for {subject}. Skipping task. ({reason})"
            ),
            Diagnostic::ZeroDuration { subject, .. } => {
                write!(f, "Duration for {subject} is 0:00. Skipping task.")
            }
            Diagnostic::OutOfRange { subject, .. } => {
                write!(f, "{subject} would run past the end of the calendar. Skipping task.")
            }
        }
    }
}

/// Result of one generation run: contiguous blocks plus any diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    start: NaiveDateTime,
    blocks: Vec<ScheduleBlock>,
    diagnostics: Vec<Diagnostic>,
}

impl Timetable {
    pub(crate) fn new(
        start: NaiveDateTime,
        blocks: Vec<ScheduleBlock>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            start,
            blocks,
            diagnostics,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// End of the last block, or the start instant when nothing was scheduled.
    pub fn end(&self) -> NaiveDateTime {
        self.blocks.last().map_or(self.start, ScheduleBlock::end)
    }

    pub fn blocks(&self) -> &[ScheduleBlock] {
        &self.blocks
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_parts(self) -> (Vec<ScheduleBlock>, Vec<Diagnostic>) {
        (self.blocks, self.diagnostics)
    }

    pub fn study_blocks(&self) -> impl Iterator<Item = &ScheduleBlock> {
        self.blocks.iter().filter(|b| !b.is_break())
    }

    pub fn break_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_break()).count()
    }

    pub fn total_study_time(&self) -> Duration {
        self.study_blocks()
            .fold(Duration::zero(), |acc, b| acc + b.length())
    }

    pub fn render_text(&self) -> String {
        let mut out = String::from("Generated Timetable:\n");
        for block in &self.blocks {
            if block.is_break() {
                out.push('\n');
                out.push_str(&block.render_line());
                out.push_str("\n\n");
            } else {
                out.push_str(&block.render_line());
                out.push('\n');
            }
        }
        out
    }

    pub fn to_cli_summary(&self) -> String {
        let study = self.total_study_time();
        let mut parts = vec![
            format!("blocks={}", self.blocks.len()),
            format!("breaks={}", self.break_count()),
            format!("study={}:{:02}", study.num_hours(), study.num_minutes() % 60),
        ];
        if !self.blocks.is_empty() {
            parts.push(format!("finish={}", self.end().format("%H:%M")));
        }
        if !self.diagnostics.is_empty() {
            parts.push(format!("skipped={}", self.diagnostics.len()));
        }
        parts.join(", ")
    }
}
