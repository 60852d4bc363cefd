use chrono::{DateTime, Duration, Local, TimeZone, Timelike, Utc};

use crate::minute::truncate_to_minute;
use crate::models::{Task, TaskId, TaskInterval};

/// Minutes the default start time is rounded up to.
pub const DEFAULT_START_STEP_MINUTES: u32 = 30;

/// Rounds `at` up to the next multiple of `step` minutes past the local hour.
///
/// An instant already on a mark moves to the following one.
pub fn round_up_to_minutes(at: DateTime<Utc>, step: u32) -> DateTime<Utc> {
    round_up_to_minutes_in(at, step, &Local)
}

/// Like [`round_up_to_minutes`], with the marks counted on the wall clock of `tz`.
///
/// Zones such as +05:45 put the local half hours on :15 and :45 UTC.
pub fn round_up_to_minutes_in<Tz: TimeZone>(at: DateTime<Utc>, step: u32, tz: &Tz) -> DateTime<Utc> {
    let step = step.max(1);
    let minute = truncate_to_minute(at);
    let remainder = minute.with_timezone(tz).minute() % step;
    minute + Duration::minutes(i64::from(step - remainder))
}

/// The start time a new task form is pre-filled with.
pub fn default_start(now: DateTime<Utc>) -> DateTime<Utc> {
    round_up_to_minutes(now, DEFAULT_START_STEP_MINUTES)
}

/// Unvalidated input from the task form, used for both creating and editing.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub completed: bool,
    /// Set when editing; the built task keeps this id.
    pub editing: Option<TaskId>,
}

impl TaskDraft {
    /// An empty form starting at the next half hour and lasting one hour.
    pub fn blank(now: DateTime<Utc>) -> Self {
        let start = default_start(now);
        TaskDraft {
            title: String::new(),
            description: String::new(),
            start,
            end: start + Duration::hours(1),
            completed: false,
            editing: None,
        }
    }

    /// A form pre-filled from an existing task.
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            title: task.title().to_string(),
            description: task.description().to_string(),
            start: task.interval().start,
            end: task.interval().end,
            completed: task.is_marked_complete(),
            editing: Some(task.id()),
        }
    }

    /// Validates the draft and builds a task from it.
    ///
    /// Returns `None` while the form is invalid: an empty title, an end that is
    /// not after the start, or a task that hasn't started yet marked complete.
    pub fn build(&self, now: DateTime<Utc>) -> Option<Task> {
        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() {
            return None;
        }
        let interval = TaskInterval::new(self.start, self.end);
        if !interval.is_valid() {
            return None;
        }
        if self.start > now && self.completed {
            return None;
        }
        let id = self.editing.unwrap_or_default();
        Some(Task::with_id(id, title, description, interval, self.completed))
    }

    /// Why the draft can't be submitted, if it can't.
    pub fn problem(&self, now: DateTime<Utc>) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("a title is required")
        } else if self.end <= self.start {
            Some("the end must be after the start")
        } else if self.start > now && self.completed {
            Some("a task that hasn't started can't be marked complete")
        } else {
            None
        }
    }

    /// True if submitting would change `original`. An invalid draft always differs.
    pub fn differs_from(&self, original: &Task, now: DateTime<Utc>) -> bool {
        match self.build(now) {
            Some(task) => !task.data_matches(original),
            None => true,
        }
    }
}
