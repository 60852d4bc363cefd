use chrono::{DateTime, Utc};
use tracing::debug;

use crate::collection::TaskCollection;
use crate::database::{Listener, ListenerId, LocalDatabase, OperationFlag};
use crate::error::{Error, Result};
use crate::models::{Task, TaskId};
use crate::notifications::NotificationScheduler;

/// Entry point for task workflows.
///
/// Routes every change through the database with the right operation flag and
/// keeps each task's start-time alert in step with it.
pub struct Session<D, N> {
    database: D,
    notifications: N,
}

impl<D: LocalDatabase, N: NotificationScheduler> Session<D, N> {
    pub fn new(database: D, notifications: N) -> Self {
        Session { database, notifications }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut N {
        &mut self.notifications
    }

    pub fn listen(&mut self, listener: Listener) -> Result<ListenerId> {
        self.database.add_listener(listener)
    }

    pub fn end_listen(&mut self, id: ListenerId) -> bool {
        self.database.remove_listener(id)
    }

    pub fn read_all_tasks(&self) -> Result<Vec<Task>> {
        self.database.read_all()
    }

    /// A fresh collection over every stored task.
    pub fn collection(&self) -> Result<TaskCollection> {
        Ok(TaskCollection::new(self.database.read_all()?))
    }

    pub fn create_task(&mut self, task: &Task) -> Result<()> {
        self.database.create(task, &[OperationFlag::Creation])?;
        self.schedule_notification(task);
        Ok(())
    }

    /// Persists a change to the completion flag only.
    pub fn edit_task_completion(&mut self, task: &Task) -> Result<()> {
        self.database.update(task, &[OperationFlag::CompletionEdit])
    }

    /// Persists a change to title, description or interval and reschedules the alert.
    pub fn edit_task_content(&mut self, task: &Task) -> Result<()> {
        self.database.update(task, &[OperationFlag::ContentEdit])?;
        self.notifications.cancel(&task.id());
        self.schedule_notification(task);
        Ok(())
    }

    pub fn delete_task(&mut self, task: &Task) -> Result<()> {
        self.database.delete(task, &[OperationFlag::Deletion])?;
        self.notifications.cancel(&task.id());
        Ok(())
    }

    pub fn delete_all_tasks(&mut self) -> Result<()> {
        self.database.delete_all(&[OperationFlag::Deletion])?;
        self.notifications.cancel_all();
        Ok(())
    }

    /// Checks or unchecks a stored task.
    ///
    /// Returns whether anything changed; toggling an upcoming task is ignored.
    pub fn set_task_completed(&mut self, id: &TaskId, completed: bool, now: DateTime<Utc>) -> Result<bool> {
        let collection = self.collection()?;
        let mut task = collection
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let before = task.is_marked_complete();
        task.set_completed_status_at(now, completed);
        if task.is_marked_complete() == before {
            debug!(%id, status = %task.status_at(now), "completion toggle ignored");
            return Ok(false);
        }
        self.edit_task_completion(&task)?;
        Ok(true)
    }

    fn schedule_notification(&mut self, task: &Task) {
        self.notifications
            .schedule(task.id(), task.title(), task.description(), task.interval().start);
    }
}
