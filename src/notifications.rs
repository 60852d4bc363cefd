use chrono::{DateTime, Utc};
use tracing::debug;

use crate::minute::truncate_to_minute;
use crate::models::{Task, TaskId};

/// Schedules one-shot alerts keyed by task id.
pub trait NotificationScheduler {
    /// Schedules an alert for the minute containing `trigger`, replacing any
    /// alert already scheduled under `id`.
    fn schedule(&mut self, id: TaskId, title: &str, body: &str, trigger: DateTime<Utc>);

    fn cancel(&mut self, id: &TaskId);

    fn cancel_all(&mut self);
}

/// A scheduled alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: TaskId,
    pub title: String,
    pub body: String,
    /// Always the top of a minute.
    pub trigger: DateTime<Utc>,
}

/// Keeps scheduled alerts in memory until they fall due.
#[derive(Debug, Clone, Default)]
pub struct PendingNotifications {
    pending: Vec<Notification>,
}

impl PendingNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts not yet delivered, in trigger order.
    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    /// Removes and returns every alert whose trigger minute has been reached.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        let now = truncate_to_minute(now);
        let (due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|n| n.trigger <= now);
        self.pending = rest;
        due
    }

    /// Brings the pending alerts in line with `tasks`.
    ///
    /// Every unfinished task whose start minute comes after `after` gets an
    /// alert carrying its current title and start; alerts for anything else
    /// are dropped.
    pub fn reconcile(&mut self, tasks: &[Task], after: DateTime<Utc>) {
        let after = truncate_to_minute(after);
        let wanted: Vec<&Task> = tasks
            .iter()
            .filter(|t| !t.is_marked_complete() && truncate_to_minute(t.interval().start) > after)
            .collect();
        let before = self.pending.len();
        self.pending.retain(|n| wanted.iter().any(|t| t.id() == n.id));
        let dropped = before - self.pending.len();
        for task in &wanted {
            self.schedule(task.id(), task.title(), task.description(), task.interval().start);
        }
        debug!(scheduled = wanted.len(), dropped, "notifications reconciled");
    }
}

impl NotificationScheduler for PendingNotifications {
    fn schedule(&mut self, id: TaskId, title: &str, body: &str, trigger: DateTime<Utc>) {
        self.cancel(&id);
        let notification = Notification {
            id,
            title: title.to_string(),
            body: body.to_string(),
            trigger: truncate_to_minute(trigger),
        };
        debug!(%id, trigger = %notification.trigger, "notification scheduled");
        let at = self.pending.partition_point(|n| n.trigger <= notification.trigger);
        self.pending.insert(at, notification);
    }

    fn cancel(&mut self, id: &TaskId) {
        self.pending.retain(|n| n.id != *id);
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}
