/*
 *  display/color.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Background palette, packed color storage and contrast selection
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
use std::fmt;
use std::str::FromStr;

use crate::constants::{PALETTE_BLACK, PALETTE_DARK_BLUE, PALETTE_DARK_GRAY, PALETTE_DARK_RED};

/// The fixed set of background colors offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Black,
    DarkGray,
    DarkBlue,
    DarkRed,
}

impl Palette {
    pub const ALL: [Palette; 4] = [Palette::Black, Palette::DarkGray, Palette::DarkBlue, Palette::DarkRed];

    pub fn to_rgb(self) -> Rgb888 {
        unpack_rgb(i64::from(self.packed()))
    }

    pub fn packed(self) -> u32 {
        match self {
            Palette::Black => PALETTE_BLACK,
            Palette::DarkGray => PALETTE_DARK_GRAY,
            Palette::DarkBlue => PALETTE_DARK_BLUE,
            Palette::DarkRed => PALETTE_DARK_RED,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Black => "black",
            Palette::DarkGray => "dark-gray",
            Palette::DarkBlue => "dark-blue",
            Palette::DarkRed => "dark-red",
        }
    }

    /// Palette entry for a color, if it is one
    pub fn from_rgb(color: Rgb888) -> Option<Palette> {
        Palette::ALL.into_iter().find(|p| p.to_rgb() == color)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Palette::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| format!("unknown palette color '{}'", s))
    }
}

/// Pack as 0xRRGGBB
pub fn pack_rgb(color: Rgb888) -> u32 {
    (u32::from(color.r()) << 16) | (u32::from(color.g()) << 8) | u32::from(color.b())
}

/// Unpack the low 24 bits; an alpha byte or sign extension above them is ignored
pub fn unpack_rgb(packed: i64) -> Rgb888 {
    let v = (packed & 0x00FF_FFFF) as u32;
    Rgb888::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Relative luminance in 0.0..=1.0
pub fn luminance(color: Rgb888) -> f32 {
    (0.299 * f32::from(color.r()) + 0.587 * f32::from(color.g()) + 0.114 * f32::from(color.b())) / 255.0
}

/// White on dark backgrounds, black on light ones
pub fn contrast_color(background: Rgb888) -> Rgb888 {
    if luminance(background) < 0.5 {
        Rgb888::WHITE
    } else {
        Rgb888::BLACK
    }
}

/// Scale every channel by `level` (0.0..=1.0)
pub fn dim(color: Rgb888, level: f32) -> Rgb888 {
    let level = level.clamp(0.0, 1.0);
    let scale = |c: u8| (f32::from(c) * level).round() as u8;
    Rgb888::new(scale(color.r()), scale(color.g()), scale(color.b()))
}
