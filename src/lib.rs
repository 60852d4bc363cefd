//! # Tick
//!
//! Time-bounded to-do items whose status follows the clock.
//!
//! A task is *upcoming* before its start, *ongoing* from its start until it is
//! checked off, and *completed* once marked complete. Statuses are never stored:
//! they are derived on every read, and [`minute::MinuteMonitor`] wakes at the top
//! of each minute so views can move tasks between sections as they start.
//!
//! ## Modules
//!
//! - `models`: tasks, ids, intervals and the status rules
//! - `draft`: validation of task form input
//! - `collection`: grouping tasks into status sections and minute lookups
//! - `minute`: minute truncation and the minute-aligned monitor
//! - `storage`: whole-snapshot persistence (JSON file or memory)
//! - `database`: CRUD with operation flags and change listeners
//! - `notifications`: start-time alerts keyed by task id
//! - `session`: the workflows that tie database and alerts together
//! - `live`: the polling refresh behind the watch view
//! - `commands`: the command-line front end

pub mod collection;
pub mod commands;
pub mod database;
pub mod draft;
pub mod error;
pub mod live;
pub mod minute;
pub mod models;
pub mod notifications;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
