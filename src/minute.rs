//! Minute-aligned timing.
//!
//! [`MinuteMonitor`] invokes a callback at the top of every wall-clock minute so
//! callers can re-classify tasks as they cross from upcoming to ongoing.

use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Drops the seconds and sub-second part of `at`.
///
/// Done in UTC; every zone in current use is offset by whole minutes, so the
/// result is the same minute a local calendar would report.
pub fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(at)
}

/// True if both instants fall within the same calendar minute.
pub fn same_minute(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    truncate_to_minute(a) == truncate_to_minute(b)
}

/// The top of the minute following `now`.
pub fn next_minute_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
    truncate_to_minute(now + Duration::minutes(1))
}

/// Fires a callback at the start of every wall-clock minute.
///
/// Each wake-up is re-anchored on the clock rather than repeating a fixed
/// period, so the monitor does not drift. The callback runs on a single tokio
/// task; there is never more than one pending wake-up.
pub struct MinuteMonitor {
    clock: Arc<dyn Clock>,
    handle: Option<JoinHandle<()>>,
}

impl MinuteMonitor {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        MinuteMonitor { clock, handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts calling `on_minute` at every minute boundary.
    ///
    /// Must be called from within a tokio runtime. Starting an already running
    /// monitor replaces its callback.
    pub fn start<F>(&mut self, on_minute: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        self.stop();
        let clock = Arc::clone(&self.clock);
        self.handle = Some(runtime.spawn(run(clock, on_minute)));
        debug!("minute monitor started");
        Ok(())
    }

    /// Cancels the pending wake-up and drops the callback. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("minute monitor stopped");
        }
    }
}

impl Default for MinuteMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MinuteMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<F: FnMut()>(clock: Arc<dyn Clock>, mut on_minute: F) {
    let mut last_fired: Option<DateTime<Utc>> = None;
    loop {
        let now = clock.now();
        let mut wake = next_minute_boundary(now);
        // a timer that fires a hair early must not fire the same boundary twice
        if let Some(prev) = last_fired {
            if wake <= prev {
                wake = prev + Duration::minutes(1);
            }
        }
        let delay = (wake - now).to_std().unwrap_or_default();
        trace!(%wake, ?delay, "waiting for next minute");
        tokio::time::sleep(delay).await;
        last_fired = Some(wake);
        on_minute();
    }
}
