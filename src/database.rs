//! The persistence façade.
//!
//! Every mutating call persists the change and then synchronously hands the
//! full post-change task list to each registered listener, tagged with the
//! operation flags supplied by the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Task;
use crate::storage::TaskStorage;

/// Describes what kind of change a mutation was, so listeners can pick a
/// redraw strategy (full reload vs. moving rows between sections).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationFlag {
    /// A task was created.
    Creation,
    /// A task's title, description or interval changed.
    ContentEdit,
    /// Only a task's completion flag changed.
    CompletionEdit,
    /// A task was deleted.
    Deletion,
}

/// What listeners receive: every stored task after the operation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChange {
    pub tasks: Vec<Task>,
    /// Empty for the snapshot delivered on registration.
    pub flags: Vec<OperationFlag>,
}

impl TaskChange {
    pub fn has_flag(&self, flag: OperationFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Handle returned by [`LocalDatabase::add_listener`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&TaskChange)>;

/// A local task database with change notification.
pub trait LocalDatabase {
    /// Registers `listener` and immediately calls it with the current tasks.
    fn add_listener(&mut self, listener: Listener) -> Result<ListenerId>;

    /// Returns false if `id` wasn't registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// All stored tasks, ordered by start time.
    fn read_all(&self) -> Result<Vec<Task>>;

    fn count(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    fn create(&mut self, task: &Task, flags: &[OperationFlag]) -> Result<()>;

    /// Replaces the stored task with the same id.
    fn update(&mut self, task: &Task, flags: &[OperationFlag]) -> Result<()>;

    /// Removes the stored task with the same id.
    fn delete(&mut self, task: &Task, flags: &[OperationFlag]) -> Result<()>;

    fn delete_all(&mut self, flags: &[OperationFlag]) -> Result<()>;
}

/// [`LocalDatabase`] over any snapshot [`TaskStorage`].
pub struct Database<S: TaskStorage> {
    storage: S,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<S: TaskStorage> Database<S> {
    pub fn new(storage: S) -> Self {
        Database {
            storage,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Hands the just-saved `tasks` to every listener. Never touches storage.
    fn notify(&mut self, mut tasks: Vec<Task>, flags: &[OperationFlag]) {
        if self.listeners.is_empty() {
            return;
        }
        sort_by_start(&mut tasks);
        let change = TaskChange {
            tasks,
            flags: flags.to_vec(),
        };
        debug!(listeners = self.listeners.len(), ?flags, "notifying listeners");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

fn sort_by_start(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.interval().start);
}

impl<S: TaskStorage> LocalDatabase for Database<S> {
    fn add_listener(&mut self, mut listener: Listener) -> Result<ListenerId> {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        listener(&TaskChange {
            tasks: self.read_all()?,
            flags: Vec::new(),
        });
        self.listeners.push((id, listener));
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != len_before
    }

    fn read_all(&self) -> Result<Vec<Task>> {
        let mut tasks = self.storage.load()?;
        sort_by_start(&mut tasks);
        Ok(tasks)
    }

    fn create(&mut self, task: &Task, flags: &[OperationFlag]) -> Result<()> {
        let mut tasks = self.storage.load()?;
        tasks.push(task.clone());
        self.storage.save(&tasks)?;
        info!(id = %task.id(), "task created");
        self.notify(tasks, flags);
        Ok(())
    }

    fn update(&mut self, task: &Task, flags: &[OperationFlag]) -> Result<()> {
        let mut tasks = self.storage.load()?;
        match tasks.iter_mut().find(|t| t.id() == task.id()) {
            Some(t) => *t = task.clone(),
            None => return Err(Error::TaskNotFound(task.id().to_string())),
        }
        self.storage.save(&tasks)?;
        info!(id = %task.id(), ?flags, "task updated");
        self.notify(tasks, flags);
        Ok(())
    }

    fn delete(&mut self, task: &Task, flags: &[OperationFlag]) -> Result<()> {
        let mut tasks = self.storage.load()?;
        let len_before = tasks.len();
        tasks.retain(|t| t.id() != task.id());
        if tasks.len() == len_before {
            return Err(Error::TaskNotFound(task.id().to_string()));
        }
        self.storage.save(&tasks)?;
        info!(id = %task.id(), "task deleted");
        self.notify(tasks, flags);
        Ok(())
    }

    fn delete_all(&mut self, flags: &[OperationFlag]) -> Result<()> {
        self.storage.save(&[])?;
        info!("all tasks deleted");
        self.notify(Vec::new(), flags);
        Ok(())
    }
}
