/*
 *  settings/dialog.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Draft/confirm model behind the settings control
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

use embedded_graphics::pixelcolor::Rgb888;

use crate::display::Palette;
use crate::settings::{ClockPosition, DisplaySettings};

/// Pending edits; nothing takes effect until `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDialog {
    position: ClockPosition,
    background: Rgb888,
}

impl SettingsDialog {
    /// Draft seeded from what is on screen now
    pub fn open(current: &DisplaySettings) -> Self {
        Self { position: current.clock_position, background: current.background }
    }

    pub fn select_position(&mut self, position: ClockPosition) {
        self.position = position;
    }

    pub fn select_color(&mut self, color: Palette) {
        self.background = color.to_rgb();
    }

    /// Palette entry of the draft background, None for a custom stored color
    pub fn color(&self) -> Option<Palette> {
        Palette::from_rgb(self.background)
    }

    /// Confirm; the caller persists and applies the result
    pub fn apply(self) -> DisplaySettings {
        DisplaySettings { clock_position: self.position, background: self.background }
    }

    /// Discard the draft
    pub fn cancel(self) {}
}
