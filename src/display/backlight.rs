/*
 *  display/backlight.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Read-only access to the sysfs backlight class
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

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::SYSFS_BACKLIGHT;
use crate::display::error::SurfaceError;

// Only ever read: writing here would change brightness system-wide.

/// Backlight device directory: the configured one, else the first under sysfs
pub fn locate(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        return Some(dir.to_path_buf());
    }
    let mut devices: Vec<PathBuf> = fs::read_dir(SYSFS_BACKLIGHT)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .collect();
    devices.sort();
    devices.into_iter().next()
}

/// `brightness / max_brightness` of the device in `dir`, 0.0..=1.0
pub fn read_level(dir: &Path) -> Result<f32, SurfaceError> {
    let current = read_value(&dir.join("brightness"))?;
    let max = read_value(&dir.join("max_brightness"))?;
    if max == 0 {
        return Err(SurfaceError::BrightnessUnavailable(format!(
            "{} reports max_brightness 0",
            dir.display()
        )));
    }
    Ok((current as f32 / max as f32).clamp(0.0, 1.0))
}

/// Locate and read in one go
pub fn system_level(configured: Option<&Path>) -> Result<f32, SurfaceError> {
    let dir = locate(configured)
        .ok_or_else(|| SurfaceError::BrightnessUnavailable("no backlight device".to_string()))?;
    read_level(&dir)
}

fn read_value(path: &Path) -> Result<u32, SurfaceError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| SurfaceError::BrightnessUnavailable(format!("{}: {}", path.display(), e)))?;
    raw.trim()
        .parse()
        .map_err(|_| SurfaceError::BrightnessUnavailable(format!("{}: not a number", path.display())))
}
