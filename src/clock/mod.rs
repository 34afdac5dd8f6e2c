/*
 *  clock/mod.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Time keeping: snapshots, time sources and the minute scheduler
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

pub mod snapshot;
pub mod time_source;
pub mod scheduler;

// Re-exports
pub use snapshot::{ClockSnapshot, system_locale, parse_locale};
pub use time_source::{TimeSource, SystemClock};
pub use scheduler::{ClockScheduler, SchedulerError, delay_until_next_minute};
