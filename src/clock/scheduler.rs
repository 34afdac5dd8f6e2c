/*
 *  clock/scheduler.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Self-rescheduling minute tick
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use chrono::{DateTime, TimeZone, Timelike};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::snapshot::ClockSnapshot;
use super::time_source::{SystemClock, TimeSource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("clock scheduler is already running")]
    AlreadyStarted,
    #[error("clock scheduler must be started from within a tokio runtime")]
    NoRuntime,
}

/// Milliseconds from `now` to the next `hh:mm:00.000`.
///
/// A leap second can push the elapsed part past a full minute, the result
/// is clamped to zero and the tick fires immediately.
pub fn delay_until_next_minute<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let elapsed_ms = i64::from(now.second()) * 1000 + i64::from(now.timestamp_subsec_millis());
    let delay_ms = (60_000 - elapsed_ms).max(0);
    Duration::from_millis(delay_ms as u64)
}

/// Handle to the one outstanding tick
struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    fn is_pending(&self) -> bool {
        !self.task.is_finished()
    }

    fn cancel(self) {
        self.task.abort();
    }
}

/// Keeps a [`ClockSnapshot`] fresh with one wakeup per minute.
///
/// Each delay is computed from the time observed after the previous tick,
/// never from the previous deadline, so a slow callback or a clock jump
/// cannot accumulate drift.
///
/// `stop()` aborts the tick task. See [`ClockScheduler::start`] for the
/// runtime this guarantee holds on.
pub struct ClockScheduler {
    clock: Arc<dyn TimeSource>,
    handle: Option<TickHandle>,
}

impl ClockScheduler {
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock, handle: None }
    }

    /// Scheduler on the host clock
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Deliver a snapshot of "now" to `on_tick` immediately, then one at every minute boundary.
    ///
    /// Call from a current-thread runtime. There the tick task is never
    /// polled again once `stop()` returns, so `on_tick` cannot fire after
    /// teardown. On a multi-thread runtime a tick already running on
    /// another worker may still complete after `stop()`.
    pub fn start<F>(&mut self, mut on_tick: F) -> Result<(), SchedulerError>
    where
        F: FnMut(ClockSnapshot) + Send + 'static,
    {
        if self.is_running() {
            return Err(SchedulerError::AlreadyStarted);
        }
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;

        on_tick(ClockSnapshot::at(&self.clock.now(), self.clock.locale()));

        let clock = Arc::clone(&self.clock);
        let task = runtime.spawn(async move {
            loop {
                let delay = delay_until_next_minute(&clock.now());
                debug!("next clock tick in {} ms", delay.as_millis());
                tokio::time::sleep(delay).await;

                let snapshot = ClockSnapshot::at(&clock.now(), clock.locale());
                debug!("clock tick: {}", snapshot);
                on_tick(snapshot);
            }
        });

        self.handle = Some(TickHandle { task });
        info!("Clock scheduler started");
        Ok(())
    }

    /// Cancel the pending tick. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
            info!("Clock scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(TickHandle::is_pending)
    }
}

impl Drop for ClockScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
