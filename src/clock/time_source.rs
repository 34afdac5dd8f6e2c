/*
 *  clock/time_source.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Wall clock abstraction so ticks can be driven by a fake clock
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

use chrono::{DateTime, FixedOffset, Local, Locale};

use super::snapshot::system_locale;

/// Source of local wall-clock time.
///
/// The offset is carried with the timestamp so labels reflect DST changes
/// at the moment they are formatted.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Locale for the date label, asked again on every tick
    fn locale(&self) -> Locale {
        system_locale()
    }
}

/// The host clock in the host time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
