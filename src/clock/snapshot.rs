/*
 *  clock/snapshot.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Immutable time/date labels for one tick
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

use chrono::{DateTime, Locale, TimeZone};
use log::debug;
use std::fmt;

use crate::constants::{DATE_FORMAT, TIME_FORMAT};

/// The `(time, date)` pair shown until the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSnapshot {
    /// `HH:MM`, 24-hour
    pub time_label: String,

    /// Abbreviated weekday, month and day in the given locale
    pub date_label: String,
}

impl ClockSnapshot {
    /// Build the labels for `time` in `locale`
    pub fn at<Tz>(time: &DateTime<Tz>, locale: Locale) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            time_label: time.format_localized(TIME_FORMAT, locale).to_string(),
            date_label: time.format_localized(DATE_FORMAT, locale).to_string(),
        }
    }
}

impl fmt::Display for ClockSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.time_label, self.date_label)
    }
}

/// Resolve the process default locale from `LC_ALL`, `LC_TIME` then `LANG`.
///
/// Read on every call so a locale change is picked up by the next tick.
pub fn system_locale() -> Locale {
    ["LC_ALL", "LC_TIME", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .map(|value| parse_locale(&value))
        .unwrap_or(Locale::POSIX)
}

/// Map a POSIX locale string (`en_GB.UTF-8`, `de_DE@euro`, `C`) to a chrono locale
pub fn parse_locale(value: &str) -> Locale {
    let name = value.trim().split(['.', '@']).next().unwrap_or_default();
    match name {
        "" | "C" | "POSIX" => Locale::POSIX,
        other => Locale::try_from(other).unwrap_or_else(|_| {
            debug!("unknown locale '{}', using POSIX", other);
            Locale::POSIX
        }),
    }
}
