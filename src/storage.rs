use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Task;

/// Returns the path to the tasks database file (`tasks.json`).
///
/// The path is determined in the following order:
/// 1. `TICK_DB` environment variable.
/// 2. `~/.local/share/tick/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
pub fn db_path() -> PathBuf {
    std::env::var("TICK_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("tick");
        p.push("tasks.json");
        p
    })
}

/// Whole-snapshot persistence for tasks.
///
/// Implementations load and replace the full task list; the database layer
/// above them owns ids, ordering and change notification.
pub trait TaskStorage {
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&mut self, tasks: &[Task]) -> Result<()>;
}

/// Tasks stored as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    /// Storage at [`db_path`].
    pub fn open_default() -> Self {
        Self::new(db_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the database file if it exists.
    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl TaskStorage for JsonFileStorage {
    /// A missing or empty file is an empty task list.
    fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut f = OpenOptions::new().read(true).open(&self.path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks: Vec<Task> = serde_json::from_str(&s).inspect_err(|e| {
            warn!(path = %self.path.display(), error = %e, "tasks file is not valid JSON");
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let s = serde_json::to_string_pretty(tasks)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Keeps tasks in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tasks: Vec<Task>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        self.tasks = tasks.to_vec();
        Ok(())
    }
}
