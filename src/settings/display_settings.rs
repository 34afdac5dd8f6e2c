/*
 *  settings/display_settings.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  User-facing display options and their stored form
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

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use log::warn;
use std::fmt;
use std::str::FromStr;

use crate::constants::{KEY_BACKGROUND_COLOR, KEY_TIME_POSITION, POSITION_LEFT, POSITION_RIGHT};
use crate::display::color::{pack_rgb, unpack_rgb};
use crate::settings::{SettingsError, SettingsStore};

/// Screen edge the clock block hugs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockPosition {
    #[default]
    Start,
    End,
}

impl ClockPosition {
    pub fn as_stored(self) -> &'static str {
        match self {
            ClockPosition::Start => POSITION_LEFT,
            ClockPosition::End => POSITION_RIGHT,
        }
    }

    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            POSITION_LEFT => Some(ClockPosition::Start),
            POSITION_RIGHT => Some(ClockPosition::End),
            _ => None,
        }
    }
}

impl fmt::Display for ClockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_stored())
    }
}

impl FromStr for ClockPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "start" => Ok(ClockPosition::Start),
            "end" => Ok(ClockPosition::End),
            other => ClockPosition::from_stored(other)
                .ok_or_else(|| format!("unknown clock position '{}' (left | right)", s.trim())),
        }
    }
}

/// What the user picked, as applied to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub clock_position: ClockPosition,
    pub background: Rgb888,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { clock_position: ClockPosition::Start, background: Rgb888::BLACK }
    }
}

impl fmt::Display for DisplaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock {} on #{:06X}", self.clock_position, pack_rgb(self.background))
    }
}

impl DisplaySettings {
    /// Read from `store`, falling back to the defaults per key
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();

        let stored = store.get_string(KEY_TIME_POSITION, defaults.clock_position.as_stored());
        let clock_position = ClockPosition::from_stored(&stored).unwrap_or_else(|| {
            warn!("Unknown stored clock position '{}', using {}", stored, defaults.clock_position);
            defaults.clock_position
        });

        let packed = store.get_int(KEY_BACKGROUND_COLOR, i64::from(pack_rgb(defaults.background)));
        Self { clock_position, background: unpack_rgb(packed) }
    }

    /// Stage both keys and commit
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), SettingsError> {
        store.set_string(KEY_TIME_POSITION, self.clock_position.as_stored());
        store.set_int(KEY_BACKGROUND_COLOR, i64::from(pack_rgb(self.background)));
        store.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;

    #[test]
    fn test_empty_store_gives_defaults() {
        let store = MemorySettingsStore::new();
        assert_eq!(DisplaySettings::load(&store), DisplaySettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemorySettingsStore::new();
        let settings = DisplaySettings { clock_position: ClockPosition::End, background: Rgb888::new(0x00, 0x11, 0x22) };
        settings.save(&mut store).unwrap();
        assert_eq!(store.get_string(KEY_TIME_POSITION, ""), "right");
        assert_eq!(store.get_int(KEY_BACKGROUND_COLOR, 0), 0x001122);
        assert_eq!(DisplaySettings::load(&store), settings);
    }

    #[test]
    fn test_bad_position_and_alpha_packed_color() {
        let mut store = MemorySettingsStore::new();
        store.set_string(KEY_TIME_POSITION, "middle");
        // ARGB with an opaque alpha byte
        store.set_int(KEY_BACKGROUND_COLOR, 0xFF33_3333);
        store.commit().unwrap();
        let settings = DisplaySettings::load(&store);
        assert_eq!(settings.clock_position, ClockPosition::Start);
        assert_eq!(settings.background, Rgb888::new(0x33, 0x33, 0x33));
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("left".parse::<ClockPosition>().unwrap(), ClockPosition::Start);
        assert_eq!(" RIGHT ".parse::<ClockPosition>().unwrap(), ClockPosition::End);
        assert_eq!("end".parse::<ClockPosition>().unwrap(), ClockPosition::End);
        assert!("centre".parse::<ClockPosition>().is_err());
        assert_eq!(ClockPosition::End.to_string(), "right");
    }
}
