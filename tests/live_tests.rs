use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tick::database::Database;
use tick::live::LiveView;
use tick::models::{Task, TaskInterval};
use tick::notifications::PendingNotifications;
use tick::session::Session;
use tick::storage::JsonFileStorage;

type FileSession = Session<Database<JsonFileStorage>, PendingNotifications>;

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, h, m, s).unwrap()
}

fn open(path: &Path) -> FileSession {
    Session::new(Database::new(JsonFileStorage::new(path)), PendingNotifications::new())
}

fn starting(title: &str, start: DateTime<Utc>) -> Task {
    Task::new(title, "", TaskInterval::new(start, start + Duration::hours(1)), false)
}

fn pending_titles(view: &LiveView<Database<JsonFileStorage>>) -> Vec<String> {
    view.session().notifications().pending().iter().map(|n| n.title.clone()).collect()
}

#[test]
fn test_first_refresh_draws_and_schedules_upcoming() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let mut writer = open(&path);
    writer.create_task(&starting("Earlier", at(11, 0, 0))).unwrap();
    writer.create_task(&starting("Later", at(13, 0, 0))).unwrap();

    let mut view = LiveView::new(open(&path));
    let refresh = view.refresh(at(12, 0, 30)).unwrap();
    assert!(refresh.changed);
    assert!(refresh.redraw);
    assert!(refresh.due.is_empty());
    assert_eq!(refresh.collection.len(), 2);
    assert_eq!(pending_titles(&view), ["Later"]);
}

#[test]
fn test_task_added_elsewhere_gets_drawn_and_alerted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let mut view = LiveView::new(open(&path));
    view.refresh(at(12, 0, 30)).unwrap();

    open(&path).create_task(&starting("Standup", at(12, 5, 0))).unwrap();

    let refresh = view.refresh(at(12, 1, 0)).unwrap();
    assert!(refresh.changed);
    assert!(refresh.redraw);
    assert_eq!(refresh.collection.tasks()[0].title(), "Standup");
    assert_eq!(pending_titles(&view), ["Standup"]);

    let refresh = view.refresh(at(12, 5, 0)).unwrap();
    assert!(!refresh.changed);
    assert!(refresh.redraw);
    assert_eq!(refresh.due.len(), 1);
    assert_eq!(refresh.due[0].title, "Standup");
    assert!(pending_titles(&view).is_empty());
}

#[test]
fn test_unchanged_tasks_do_not_redraw() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    open(&path).create_task(&starting("Later", at(15, 0, 0))).unwrap();

    let mut view = LiveView::new(open(&path));
    assert!(view.refresh(at(12, 0, 0)).unwrap().redraw);

    let refresh = view.refresh(at(12, 1, 0)).unwrap();
    assert!(!refresh.changed);
    assert!(!refresh.redraw);
    assert!(refresh.due.is_empty());
    assert_eq!(pending_titles(&view), ["Later"]);
}

#[test]
fn test_edits_elsewhere_move_and_cancel_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let mut writer = open(&path);
    let moved = starting("Moved", at(13, 0, 0));
    let dropped = starting("Dropped", at(14, 0, 0));
    writer.create_task(&moved).unwrap();
    writer.create_task(&dropped).unwrap();

    let mut view = LiveView::new(open(&path));
    view.refresh(at(12, 0, 0)).unwrap();
    assert_eq!(pending_titles(&view), ["Moved", "Dropped"]);

    let moved = moved.with_interval(TaskInterval::new(at(16, 0, 0), at(17, 0, 0)));
    writer.edit_task_content(&moved).unwrap();
    writer.delete_task(&dropped).unwrap();

    let refresh = view.refresh(at(12, 1, 0)).unwrap();
    assert!(refresh.changed);
    let pending = view.session().notifications().pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, moved.id());
    assert_eq!(pending[0].trigger, at(16, 0, 0));
}

#[test]
fn test_alert_is_delivered_once_per_minute() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let mut writer = open(&path);
    writer.create_task(&starting("Review", at(12, 3, 0))).unwrap();

    let mut view = LiveView::new(open(&path));
    view.refresh(at(12, 2, 10)).unwrap();
    assert_eq!(view.refresh(at(12, 3, 0)).unwrap().due.len(), 1);

    writer.create_task(&starting("Lunch", at(13, 0, 0))).unwrap();
    let refresh = view.refresh(at(12, 3, 40)).unwrap();
    assert!(refresh.changed);
    assert!(refresh.due.is_empty());
    assert_eq!(pending_titles(&view), ["Lunch"]);
}

#[test]
fn test_task_started_this_minute_alerts_on_first_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    open(&path).create_task(&starting("Just now", at(12, 0, 10))).unwrap();

    let mut view = LiveView::new(open(&path));
    let refresh = view.refresh(at(12, 0, 30)).unwrap();
    assert_eq!(refresh.due.len(), 1);
    assert!(refresh.redraw);
}
