use chrono::{DateTime, Utc};

use crate::minute::same_minute;
use crate::models::{Task, TaskId, TaskStatus};

/// A group of tasks sharing one status, in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSection {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

/// An insertion-ordered set of tasks, rebuilt from a full snapshot on every change.
///
/// Ids are not checked for uniqueness; lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskCollection { tasks }
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_by_id(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == *id)
    }

    /// Tasks whose start falls in the same calendar minute as `at`.
    pub fn tasks_starting_at(&self, at: DateTime<Utc>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| same_minute(t.interval().start, at))
            .collect()
    }

    /// Groups tasks by their status right now.
    pub fn sectioned(&self, statuses: &[TaskStatus]) -> Vec<TaskSection> {
        self.sectioned_at(Utc::now(), statuses)
    }

    /// Groups tasks by their status at `now`, one section per requested status
    /// in the order given. Empty sections are kept.
    pub fn sectioned_at(&self, now: DateTime<Utc>, statuses: &[TaskStatus]) -> Vec<TaskSection> {
        statuses
            .iter()
            .map(|&status| TaskSection {
                status,
                tasks: self
                    .tasks
                    .iter()
                    .filter(|t| t.status_at(now) == status)
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}

impl From<Vec<Task>> for TaskCollection {
    fn from(tasks: Vec<Task>) -> Self {
        TaskCollection::new(tasks)
    }
}
