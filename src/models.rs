use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, immutable identifier of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }

    /// The first eight hex digits, enough to tell tasks apart in a listing.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TaskId {
    fn from(uuid: Uuid) -> Self {
        TaskId(uuid)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TaskId)
    }
}

/// The display state of a task, derived from the clock and its completion flag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl TaskStatus {
    /// Every status, in the order tasks are usually displayed.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Ongoing, TaskStatus::Upcoming, TaskStatus::Completed];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Upcoming => "Upcoming",
            TaskStatus::Ongoing => "Ongoing",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(TaskStatus::Upcoming),
            "ongoing" => Ok(TaskStatus::Ongoing),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => Err(format!("Unknown status '{}'. Supported: upcoming, ongoing, completed.", other)),
        }
    }
}

/// Classifies a task at the instant `now`.
///
/// Completion always wins. Otherwise a task is upcoming strictly before its
/// start and ongoing from its start onwards; there is no overdue state, so an
/// unfinished task whose end has passed stays ongoing.
pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, marked_complete: bool) -> TaskStatus {
    if marked_complete {
        TaskStatus::Completed
    } else if now < start {
        TaskStatus::Upcoming
    } else {
        TaskStatus::Ongoing
    }
}

/// The period a task occupies.
///
/// `end > start` is required of anything submitted through [`crate::draft::TaskDraft`],
/// but the interval itself does not enforce it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TaskInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TaskInterval { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }
}

/// Represents a single time-bounded to-do item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier, fixed at creation.
    id: TaskId,
    title: String,
    /// Free-form, may be empty.
    #[serde(default)]
    description: String,
    interval: TaskInterval,
    /// Only changed through [`Task::set_completed_status`].
    #[serde(default)]
    marked_complete: bool,
}

impl Task {
    /// Creates a task with a freshly generated id.
    pub fn new(title: impl Into<String>, description: impl Into<String>, interval: TaskInterval, marked_complete: bool) -> Self {
        Self::with_id(TaskId::new(), title, description, interval, marked_complete)
    }

    pub fn with_id(id: TaskId, title: impl Into<String>, description: impl Into<String>, interval: TaskInterval, marked_complete: bool) -> Self {
        Task {
            id,
            title: title.into(),
            description: description.into(),
            interval,
            marked_complete,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn interval(&self) -> TaskInterval {
        self.interval
    }

    /// The same task, id unchanged, with a new title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_interval(mut self, interval: TaskInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_marked_complete(&self) -> bool {
        self.marked_complete
    }

    /// Current status, recomputed from the system clock on every call.
    pub fn status(&self) -> TaskStatus {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> TaskStatus {
        classify(now, self.interval.start, self.marked_complete)
    }

    /// Content may only be edited before the task has started.
    pub fn can_be_edited(&self) -> bool {
        self.can_be_edited_at(Utc::now())
    }

    pub fn can_be_edited_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == TaskStatus::Upcoming
    }

    /// Whether the completion flag may be toggled.
    pub fn can_be_checked(&self) -> bool {
        self.can_be_checked_at(Utc::now())
    }

    pub fn can_be_checked_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status_at(now), TaskStatus::Ongoing | TaskStatus::Completed)
    }

    /// Marks the task complete or incomplete.
    ///
    /// Silently does nothing while the task is upcoming.
    pub fn set_completed_status(&mut self, completed: bool) {
        self.set_completed_status_at(Utc::now(), completed)
    }

    pub fn set_completed_status_at(&mut self, now: DateTime<Utc>, completed: bool) {
        if !self.can_be_checked_at(now) {
            return;
        }
        self.marked_complete = completed;
    }

    /// True if both tasks hold the same content. Ids are not compared.
    pub fn data_matches(&self, other: &Task) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.interval == other.interval
            && self.marked_complete == other.marked_complete
    }

    /// The interval in local time, e.g. `Fri 8 Mar 9:00 AM - 10:30 AM`.
    pub fn formatted_interval(&self) -> String {
        self.formatted_interval_in(&Local)
    }

    /// The interval rendered in `tz`. The end day is omitted when it matches the start day.
    pub fn formatted_interval_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        const DAY: &str = "%a %-d %b";
        const TIME: &str = "%-I:%M %p";
        let start = self.interval.start.with_timezone(tz);
        let end = self.interval.end.with_timezone(tz);
        let start_day = start.format(DAY).to_string();
        let end_day = end.format(DAY).to_string();
        if start_day == end_day {
            format!("{} {} - {}", start_day, start.format(TIME), end.format(TIME))
        } else {
            format!("{} {} - {} {}", start_day, start.format(TIME), end_day, end.format(TIME))
        }
    }
}
