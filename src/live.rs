//! The state behind `tick watch`.
//!
//! Other `tick` processes write the tasks file without telling anyone, so a
//! long-running view cannot rely on database listeners alone. Instead it
//! re-reads the whole snapshot on every refresh and compares it with the last
//! one it saw.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::collection::TaskCollection;
use crate::database::LocalDatabase;
use crate::error::Result;
use crate::minute::truncate_to_minute;
use crate::models::Task;
use crate::notifications::{Notification, PendingNotifications};
use crate::session::Session;

/// What one refresh found.
#[derive(Debug, Clone)]
pub struct Refresh {
    /// Every stored task, ordered by start time.
    pub collection: TaskCollection,
    /// The stored tasks differ from the previous refresh.
    pub changed: bool,
    /// The list should be drawn again: tasks changed or one starts this minute.
    pub redraw: bool,
    /// Alerts whose start minute has arrived, in trigger order.
    pub due: Vec<Notification>,
}

/// A task view kept current by polling the database once a minute.
pub struct LiveView<D> {
    session: Session<D, PendingNotifications>,
    snapshot: Option<Vec<Task>>,
    /// Last minute whose alerts were handed out.
    delivered_through: Option<DateTime<Utc>>,
}

impl<D: LocalDatabase> LiveView<D> {
    pub fn new(session: Session<D, PendingNotifications>) -> Self {
        LiveView {
            session,
            snapshot: None,
            delivered_through: None,
        }
    }

    pub fn session(&self) -> &Session<D, PendingNotifications> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<D, PendingNotifications> {
        &mut self.session
    }

    /// Re-reads the tasks at `now`, reschedules alerts if anything changed and
    /// collects the alerts that have fallen due.
    ///
    /// The first refresh always counts as a change. Alerts for a minute are
    /// handed out once, even if the view refreshes again within that minute.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> Result<Refresh> {
        let tasks = self.session.read_all_tasks()?;
        let changed = self.snapshot.as_ref() != Some(&tasks);
        if changed {
            let after = self
                .delivered_through
                .unwrap_or_else(|| truncate_to_minute(now) - Duration::minutes(1));
            self.session.notifications_mut().reconcile(&tasks, after);
            debug!(tasks = tasks.len(), "task snapshot changed");
            self.snapshot = Some(tasks.clone());
        }

        let due = self.session.notifications_mut().take_due(now);
        self.delivered_through = Some(truncate_to_minute(now));

        let collection = TaskCollection::new(tasks);
        let starting = !collection.tasks_starting_at(now).is_empty();
        Ok(Refresh {
            redraw: changed || starting,
            changed,
            due,
            collection,
        })
    }
}
