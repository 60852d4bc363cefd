use std::io::{self, Write};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::collection::TaskCollection;
use crate::database::Database;
use crate::draft::TaskDraft;
use crate::error::{Error, Result};
use crate::live::{LiveView, Refresh};
use crate::minute::MinuteMonitor;
use crate::models::{Task, TaskStatus};
use crate::notifications::PendingNotifications;
use crate::session::Session;
use crate::storage::JsonFileStorage;

/// The session used by the command line: tasks on disk, alerts in memory.
pub type AppSession = Session<Database<JsonFileStorage>, PendingNotifications>;

/// Opens a session over the tasks file at [`crate::storage::db_path`].
pub fn open_session() -> AppSession {
    Session::new(Database::new(JsonFileStorage::open_default()), PendingNotifications::new())
}

/// Parses `YYYY-MM-DD HH:MM` in local time, or an RFC 3339 timestamp.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|_| Error::InvalidDateTime(s.to_string()))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidDateTime(s.to_string()))
}

/// Finds the task whose id is `id` or starts with it.
pub fn resolve_task(collection: &TaskCollection, id: &str) -> Result<Task> {
    let needle = id.trim().to_lowercase();
    if let Ok(exact) = needle.parse() {
        if let Some(t) = collection.get_by_id(&exact) {
            return Ok(t.clone());
        }
    }
    let mut matches = collection.tasks().iter().filter(|t| {
        let full = t.id().to_string();
        !needle.is_empty() && (full.starts_with(&needle) || full.replace('-', "").starts_with(&needle))
    });
    match (matches.next(), matches.next()) {
        (Some(t), None) => Ok(t.clone()),
        (Some(_), Some(_)) => Err(Error::AmbiguousId(id.to_string())),
        (None, _) => Err(Error::TaskNotFound(id.to_string())),
    }
}

/// Adds a new task.
///
/// Missing start/end default to the next half hour and one hour after it.
pub fn cmd_add(title: String, description: Option<String>, start: Option<String>, end: Option<String>, completed: bool, silent: bool) -> Result<()> {
    let now = Utc::now();
    let mut draft = TaskDraft::blank(now);
    draft.title = title;
    draft.description = description.unwrap_or_default();
    draft.completed = completed;
    if let Some(s) = start {
        let start = parse_datetime(&s)?;
        draft.end = start + (draft.end - draft.start);
        draft.start = start;
    }
    if let Some(e) = end {
        draft.end = parse_datetime(&e)?;
    }
    let task = draft
        .build(now)
        .ok_or_else(|| Error::InvalidTask(draft.problem(now).unwrap_or("invalid input").to_string()))?;

    let mut session = open_session();
    session.create_task(&task)?;
    if !silent { println!("Task added (id = {})", task.id().short()); }
    Ok(())
}

/// Marks a task complete or incomplete.
///
/// Upcoming tasks can't be checked; that is reported but isn't an error.
pub fn cmd_complete(id: String, completed: bool, silent: bool) -> Result<()> {
    let now = Utc::now();
    let mut session = open_session();
    let task = resolve_task(&session.collection()?, &id)?;
    let changed = session.set_task_completed(&task.id(), completed, now)?;
    if silent {
        return Ok(());
    }
    if changed {
        let state = if completed { "complete" } else { "incomplete" };
        println!("Task {} marked as {}.", task.id().short(), state);
    } else if !task.can_be_checked_at(now) {
        println!("Task {} hasn't started yet and can't be checked.", task.id().short());
    } else {
        println!("Task {} unchanged.", task.id().short());
    }
    Ok(())
}

/// Edits an upcoming task's content.
pub fn cmd_edit(id: String, title: Option<String>, description: Option<String>, start: Option<String>, end: Option<String>, silent: bool) -> Result<()> {
    let now = Utc::now();
    let mut session = open_session();
    let task = resolve_task(&session.collection()?, &id)?;
    if !task.can_be_edited_at(now) {
        return Err(Error::NotEditable(task.id().short()));
    }

    let mut draft = TaskDraft::from_task(&task);
    if let Some(t) = title { draft.title = t; }
    if let Some(d) = description { draft.description = d; }
    if let Some(s) = start { draft.start = parse_datetime(&s)?; }
    if let Some(e) = end { draft.end = parse_datetime(&e)?; }

    if !draft.differs_from(&task, now) {
        if !silent { println!("Task {} unchanged.", task.id().short()); }
        return Ok(());
    }
    let edited = draft
        .build(now)
        .ok_or_else(|| Error::InvalidTask(draft.problem(now).unwrap_or("invalid input").to_string()))?;
    session.edit_task_content(&edited)?;
    if !silent { println!("Task {} updated.", task.id().short()); }
    Ok(())
}

/// Removes a task.
pub fn cmd_remove(id: String, silent: bool) -> Result<()> {
    let mut session = open_session();
    let task = resolve_task(&session.collection()?, &id)?;
    session.delete_task(&task)?;
    if !silent { println!("Task {} removed.", task.id().short()); }
    Ok(())
}

/// Lists tasks grouped by status.
///
/// With no statuses given, shows ongoing, upcoming and completed in that order.
pub fn cmd_list(statuses: Vec<TaskStatus>) -> Result<()> {
    let session = open_session();
    let collection = session.collection()?;
    if collection.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    let statuses = if statuses.is_empty() { TaskStatus::ALL.to_vec() } else { statuses };
    print_sections(&collection, &statuses, Utc::now());
    Ok(())
}

/// Deletes every task.
pub fn cmd_reset(force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    let mut session = open_session();
    session.delete_all_tasks()?;
    println!("Database reset successfully.");
    Ok(())
}

/// Shows a live task list and prints each task's alert when its start minute
/// arrives. Once a minute the tasks file is re-read, so changes made by other
/// `tick` commands show up too. Runs until Ctrl-C.
pub fn cmd_watch() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch())
}

async fn watch() -> Result<()> {
    let mut view = LiveView::new(open_session());
    show(&view.refresh(Utc::now())?);
    info!(pending = view.session().notifications().pending().len(), "watching tasks");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut monitor = MinuteMonitor::new();
    monitor.start(move || {
        let _ = tx.send(());
    })?;

    loop {
        tokio::select! {
            tick = rx.recv() => {
                if tick.is_none() {
                    break;
                }
                show(&view.refresh(Utc::now())?);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.stop();
    Ok(())
}

fn show(refresh: &Refresh) {
    for alert in &refresh.due {
        println!("⏰ {} {}", alert.title, alert.body);
    }
    if refresh.redraw {
        debug!(changed = refresh.changed, "redrawing");
        print_sections(&refresh.collection, &TaskStatus::ALL, Utc::now());
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Ongoing => Color::Yellow,
        TaskStatus::Upcoming => Color::Cyan,
        TaskStatus::Completed => Color::Green,
    }
}

/// Prints one table per section.
pub fn print_sections(collection: &TaskCollection, statuses: &[TaskStatus], now: DateTime<Utc>) {
    for section in collection.sectioned_at(now, statuses) {
        println!("{} ({})", section.status, section.tasks.len());
        if section.tasks.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("Title").add_attribute(Attribute::Bold),
                Cell::new("When").add_attribute(Attribute::Bold),
                Cell::new("Description").add_attribute(Attribute::Bold),
            ]);
        for t in section.tasks {
            table.add_row(vec![
                Cell::new(t.id().short()),
                Cell::new(t.title()).fg(status_color(section.status)),
                Cell::new(t.formatted_interval()),
                Cell::new(t.description()),
            ]);
        }
        println!("{table}");
    }
}
