use crate::task::Task;
use crate::timetable::{Diagnostic, PriorityOrder, ScheduleBlock, Timetable, TimetableOptions};
use chrono::{Duration, NaiveDateTime};
use std::cmp::Reverse;

/// Lays tasks out back to back on a single track, most urgent first, with a break
/// whenever enough study time has piled up since the last one.
///
/// The pass only borrows the task slice and never reads the clock; the start
/// instant is supplied by the caller, so repeated runs over the same input are
/// identical.
pub struct SequentialPass<'a> {
    tasks: &'a [Task],
    options: &'a TimetableOptions,
}

impl<'a> SequentialPass<'a> {
    pub fn new(tasks: &'a [Task], options: &'a TimetableOptions) -> Self {
        Self { tasks, options }
    }

    pub fn execute(&self, start: NaiveDateTime) -> Timetable {
        if self.tasks.is_empty() {
            return Timetable::new(start, Vec::new(), vec![Diagnostic::NothingToSchedule]);
        }

        let policy = self.options.break_policy;
        let mut blocks = Vec::with_capacity(self.tasks.len() * 2);
        let mut diagnostics = Vec::new();
        let mut current = start;
        let mut accumulated = Duration::zero();

        for (task_index, task) in self.ordered() {
            let duration = match task.parsed_duration() {
                Ok(d) if d.is_zero() => {
                    diagnostics.push(Diagnostic::ZeroDuration {
                        task_index,
                        subject: task.subject.clone(),
                    });
                    continue;
                }
                Ok(d) => d.to_chrono(),
                Err(err) => {
                    diagnostics.push(Diagnostic::invalid_duration(
                        task_index,
                        &task.subject,
                        &task.duration,
                        &err,
                    ));
                    continue;
                }
            };

            let break_due = accumulated >= policy.threshold();
            let study_start = if break_due {
                current.checked_add_signed(policy.length())
            } else {
                Some(current)
            };
            let Some((study_start, end)) = study_start
                .and_then(|at| at.checked_add_signed(duration).map(|end| (at, end)))
            else {
                diagnostics.push(Diagnostic::OutOfRange {
                    task_index,
                    subject: task.subject.clone(),
                });
                continue;
            };

            if break_due {
                blocks.push(ScheduleBlock::Break {
                    start: current,
                    end: study_start,
                });
                accumulated = Duration::zero();
            }
            blocks.push(ScheduleBlock::Study {
                subject: task.subject.clone(),
                priority: task.priority,
                task_index,
                start: study_start,
                end,
            });
            current = end;
            accumulated = accumulated + duration;
        }

        Timetable::new(start, blocks, diagnostics)
    }

    /// Tasks with their input positions, stably sorted by priority.
    fn ordered(&self) -> Vec<(usize, &'a Task)> {
        let mut ordered: Vec<(usize, &'a Task)> = self.tasks.iter().enumerate().collect();
        match self.options.priority_order {
            PriorityOrder::HighestFirst => ordered.sort_by_key(|(_, task)| task.priority),
            PriorityOrder::LowestFirst => ordered.sort_by_key(|(_, task)| Reverse(task.priority)),
        }
        ordered
    }
}

/// Generates a timetable with the default break policy and priority order.
pub fn generate(tasks: &[Task], start: NaiveDateTime) -> (Vec<ScheduleBlock>, Vec<Diagnostic>) {
    generate_timetable(tasks, start, &TimetableOptions::default()).into_parts()
}

pub fn generate_timetable(
    tasks: &[Task],
    start: NaiveDateTime,
    options: &TimetableOptions,
) -> Timetable {
    SequentialPass::new(tasks, options).execute(start)
}
