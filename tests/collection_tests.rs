use chrono::{DateTime, Duration, TimeZone, Utc};
use tick::collection::TaskCollection;
use tick::models::{Task, TaskInterval, TaskStatus};

fn at(year: i32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, h, m, s).unwrap()
}

fn dummy_tasks() -> Vec<Task> {
    let past = at(2000, 12, 0, 0);
    let future = at(2050, 12, 0, 0);
    vec![
        Task::new("T1", "D1", TaskInterval::new(past, future), false),
        Task::new("T2", "D2", TaskInterval::new(past, future), false),
        Task::new("T3", "D3", TaskInterval::new(past, future), false),
        Task::new("T4", "D4", TaskInterval::new(future, future), false),
        Task::new("T5", "D5", TaskInterval::new(future, future), false),
        Task::new("T6", "D6", TaskInterval::new(future, future), true),
    ]
}

#[test]
fn test_task_storage() {
    let mut collection = TaskCollection::new(dummy_tasks());
    let now = Utc::now();
    let new_task = Task::new("New", "Description", TaskInterval::new(now, now), true);
    assert!(collection.get_by_id(&new_task.id()).is_none());
    collection.add(new_task.clone());
    assert_eq!(collection.len(), 7);
    assert_eq!(collection.get_by_id(&new_task.id()), Some(&new_task));
    assert_eq!(collection.tasks().last(), Some(&new_task));
}

#[test]
fn test_duplicate_ids_return_first() {
    let first = Task::new("First", "", TaskInterval::new(at(2000, 0, 0, 0), at(2000, 1, 0, 0)), false);
    let second = Task::with_id(first.id(), "Second", "", first.interval(), false);
    let collection = TaskCollection::new(vec![first.clone(), second]);
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.get_by_id(&first.id()).map(|t| t.title()), Some("First"));
}

#[test]
fn test_task_retrieval_by_date() {
    let collection = TaskCollection::new(dummy_tasks());
    assert!(collection.tasks_starting_at(Utc::now()).is_empty());
    assert_eq!(collection.tasks_starting_at(at(2000, 12, 0, 0)).len(), 3);
    assert_eq!(collection.tasks_starting_at(at(2050, 12, 0, 0)).len(), 3);
    assert_eq!(collection.tasks_starting_at(at(2050, 12, 0, 59)).len(), 3);
    assert!(collection.tasks_starting_at(at(2050, 12, 1, 0)).is_empty());
    assert!(collection.tasks_starting_at(at(2050, 11, 59, 59)).is_empty());
}

#[test]
fn test_start_with_seconds_matches_whole_minute() {
    let start = at(2050, 12, 0, 59);
    let collection = TaskCollection::new(vec![Task::new("T", "", TaskInterval::new(start, start + Duration::hours(1)), false)]);
    for s in [0, 30, 59] {
        assert_eq!(collection.tasks_starting_at(at(2050, 12, 0, s)).len(), 1);
    }
    assert!(collection.tasks_starting_at(at(2050, 12, 1, 0)).is_empty());
}

#[test]
fn test_sectioned_tasks() {
    let collection = TaskCollection::new(dummy_tasks());

    let none = collection.sectioned(&[]);
    assert!(none.is_empty());

    let ongoing = collection.sectioned(&[TaskStatus::Ongoing]);
    assert_eq!(ongoing.len(), 1);
    assert_eq!(ongoing[0].status, TaskStatus::Ongoing);
    assert_eq!(ongoing[0].tasks.len(), 3);
    assert!(ongoing[0].tasks.iter().all(|t| t.status() == TaskStatus::Ongoing));
    let titles: Vec<_> = ongoing[0].tasks.iter().map(|t| t.title()).collect();
    assert_eq!(titles, ["T1", "T2", "T3"]);

    let upcoming = collection.sectioned(&[TaskStatus::Upcoming]);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].tasks.len(), 2);
    assert!(upcoming[0].tasks.iter().all(|t| t.status() == TaskStatus::Upcoming));

    let completed = collection.sectioned(&[TaskStatus::Completed]);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].tasks.len(), 1);
    assert!(completed[0].tasks.iter().all(|t| t.status() == TaskStatus::Completed));

    let all = collection.sectioned(&[TaskStatus::Ongoing, TaskStatus::Upcoming, TaskStatus::Completed]);
    let statuses: Vec<_> = all.iter().map(|s| s.status).collect();
    assert_eq!(statuses, [TaskStatus::Ongoing, TaskStatus::Upcoming, TaskStatus::Completed]);

    let empty = TaskCollection::default().sectioned(&[TaskStatus::Upcoming]);
    assert_eq!(empty.len(), 1);
    assert!(empty[0].tasks.is_empty());
}

#[test]
fn test_all_sections_partition_collection() {
    let collection = TaskCollection::new(dummy_tasks());
    let sections = collection.sectioned(&TaskStatus::ALL);
    let total: usize = sections.iter().map(|s| s.tasks.len()).sum();
    assert_eq!(total, collection.len());
    for task in collection.tasks() {
        let homes = sections.iter().filter(|s| s.tasks.iter().any(|t| t.id() == task.id())).count();
        assert_eq!(homes, 1);
    }
}

#[test]
fn test_repeated_status_yields_identical_sections() {
    let collection = TaskCollection::new(dummy_tasks());
    let sections = collection.sectioned(&[TaskStatus::Upcoming, TaskStatus::Upcoming]);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0], sections[1]);
}

#[test]
fn test_one_of_each_status() {
    let past = at(2000, 12, 0, 0);
    let future = at(2050, 12, 0, 0);
    let collection = TaskCollection::new(vec![
        Task::new("Ongoing", "", TaskInterval::new(past, future), false),
        Task::new("Upcoming", "", TaskInterval::new(future, future), false),
        Task::new("Completed", "", TaskInterval::new(future, future), true),
    ]);
    let counts: Vec<_> = collection
        .sectioned(&[TaskStatus::Ongoing, TaskStatus::Upcoming, TaskStatus::Completed])
        .iter()
        .map(|s| s.tasks.len())
        .collect();
    assert_eq!(counts, [1, 1, 1]);
}

#[test]
fn test_sectioned_at_moves_task_when_it_starts() {
    let start = at(2030, 9, 0, 0);
    let collection = TaskCollection::new(vec![Task::new("T", "", TaskInterval::new(start, start + Duration::hours(1)), false)]);
    let before = collection.sectioned_at(start - Duration::seconds(1), &[TaskStatus::Upcoming, TaskStatus::Ongoing]);
    assert_eq!((before[0].tasks.len(), before[1].tasks.len()), (1, 0));
    let after = collection.sectioned_at(start, &[TaskStatus::Upcoming, TaskStatus::Ongoing]);
    assert_eq!((after[0].tasks.len(), after[1].tasks.len()), (0, 1));
}
