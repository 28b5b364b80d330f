//! Scheduling of publish runs
//!
//! Dispatch itself is owned by an external job runner; [`Scheduler`] is the
//! seam. This module also parses human-readable schedule strings ("30m",
//! "2 hours", "tomorrow") into delays.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, ScheduleError};
use crate::types::{PublishJob, RunHandle};

#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Queue `job`, to run after `delay` or immediately when `None`
    async fn schedule(&self, job: &PublishJob, delay: Option<std::time::Duration>)
        -> Result<RunHandle>;

    /// Cancel a queued run
    ///
    /// Cancelling a run that already finished or was already cancelled is a
    /// no-op, not an error.
    async fn cancel(&self, handle: &RunHandle) -> Result<()>;
}

/// State of a run tracked by [`ManualScheduler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Queued,
    Finished,
    Cancelled,
}

/// A run recorded by [`ManualScheduler`]
#[derive(Debug, Clone)]
pub struct ScheduledRun {
    pub job: PublishJob,
    pub delay: Option<std::time::Duration>,
    pub state: RunState,
}

/// Scheduler that records runs instead of dispatching them
///
/// Runs stay queued until [`ManualScheduler::finish`] or
/// [`Scheduler::cancel`] is called. Available for all builds so integration
/// tests and dry runs can inspect what would have been dispatched.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    runs: Arc<Mutex<HashMap<RunHandle, ScheduledRun>>>,
    fail_with: Option<String>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler whose `schedule` always fails with `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Look up a recorded run
    pub fn run(&self, handle: &RunHandle) -> Option<ScheduledRun> {
        self.runs.lock().ok()?.get(handle).cloned()
    }

    /// Number of runs ever scheduled
    pub fn run_count(&self) -> usize {
        self.runs.lock().map(|runs| runs.len()).unwrap_or(0)
    }

    /// Mark a queued run as finished, as the job runner would
    pub fn finish(&self, handle: &RunHandle) {
        if let Ok(mut runs) = self.runs.lock() {
            if let Some(run) = runs.get_mut(handle) {
                if run.state == RunState::Queued {
                    run.state = RunState::Finished;
                }
            }
        }
    }
}

#[async_trait]
impl Scheduler for ManualScheduler {
    async fn schedule(
        &self,
        job: &PublishJob,
        delay: Option<std::time::Duration>,
    ) -> Result<RunHandle> {
        if let Some(reason) = &self.fail_with {
            return Err(ScheduleError::Dispatch(reason.clone()).into());
        }

        let handle = RunHandle(uuid::Uuid::new_v4().to_string());
        let mut runs = self
            .runs
            .lock()
            .map_err(|_| ScheduleError::Dispatch("scheduler lock poisoned".to_string()))?;
        runs.insert(
            handle.clone(),
            ScheduledRun {
                job: job.clone(),
                delay,
                state: RunState::Queued,
            },
        );
        Ok(handle)
    }

    async fn cancel(&self, handle: &RunHandle) -> Result<()> {
        let mut runs = self
            .runs
            .lock()
            .map_err(|_| ScheduleError::Cancel(handle.to_string()))?;
        if let Some(run) = runs.get_mut(handle) {
            if run.state == RunState::Queued {
                run.state = RunState::Cancelled;
            }
        }
        Ok(())
    }
}

/// Parse a schedule string into an absolute time
///
/// Supports:
/// - Relative durations: "1h", "30m", "2d", "1 hour"
/// - Natural language: "tomorrow", "next monday 10am"
///
/// # Errors
///
/// Returns `ScheduleError::Parse` if the string is empty or matches neither
/// form.
pub fn parse_schedule(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ScheduleError::Parse("schedule string cannot be empty".to_string()).into());
    }

    if let Ok(duration) = parse_duration(input) {
        return Ok(Utc::now() + duration);
    }

    if let Ok(dt) = parse_natural_language(input) {
        return Ok(dt);
    }

    Err(ScheduleError::Parse(format!("could not parse schedule string: {}", input)).into())
}

/// Delay from `now` until `at`, clamped to zero for times in the past
pub fn delay_until(at: DateTime<Utc>, now: DateTime<Utc>) -> std::time::Duration {
    (at - now).to_std().unwrap_or(std::time::Duration::ZERO)
}

fn parse_duration(input: &str) -> Result<Duration> {
    let std_duration = humantime::parse_duration(input)
        .map_err(|e| ScheduleError::Parse(format!("could not parse duration: {}", e)))?;
    let seconds = i64::try_from(std_duration.as_secs())
        .map_err(|_| ScheduleError::Parse("duration out of range".to_string()))?;
    Duration::try_seconds(seconds)
        .ok_or_else(|| ScheduleError::Parse("duration out of range".to_string()).into())
}

fn parse_natural_language(input: &str) -> Result<DateTime<Utc>> {
    chrono_english::parse_date_string(input, Utc::now(), chrono_english::Dialect::Us)
        .map_err(|e| ScheduleError::Parse(format!("could not parse time: {}", e)).into())
}
