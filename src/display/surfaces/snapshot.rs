/*
 *  display/surfaces/snapshot.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Snapshot surface: every present writes the frame as a PPM image
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
use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::display::backlight;
use crate::display::error::SurfaceError;
use crate::display::framebuffer::FrameCanvas;
use crate::display::traits::{ClockLayout, DisplaySurface, Element};

/// Renders into memory and writes each presented frame to `path`.
///
/// The file is replaced atomically so a viewer polling it never sees a
/// half-written image.
pub struct SnapshotSurface {
    canvas: FrameCanvas,
    path: PathBuf,
    backlight: Option<PathBuf>,
}

impl SnapshotSurface {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32, density: f32) -> Self {
        Self {
            canvas: FrameCanvas::new(width, height, density),
            path: path.into(),
            backlight: None,
        }
    }

    /// Report the level of this sysfs backlight as the system brightness
    pub fn with_backlight(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backlight = Some(dir.into());
        self
    }
}

impl DisplaySurface for SnapshotSurface {
    fn set_background(&mut self, color: Rgb888) {
        self.canvas.set_background(color);
    }

    fn set_text(&mut self, element: Element, text: &str) {
        self.canvas.set_text(element, text);
    }

    fn set_element_color(&mut self, element: Element, color: Rgb888) {
        self.canvas.set_color(element, color);
    }

    fn set_clock_layout(&mut self, layout: ClockLayout) {
        self.canvas.set_layout(layout);
    }

    fn system_brightness(&self) -> Result<f32, SurfaceError> {
        match &self.backlight {
            Some(dir) => backlight::read_level(dir),
            None => Err(SurfaceError::BrightnessUnavailable(
                "snapshot surface has no backlight configured".to_string(),
            )),
        }
    }

    fn set_brightness_override(&mut self, level: f32) -> Result<(), SurfaceError> {
        self.canvas.set_brightness(Some(level));
        Ok(())
    }

    fn clear_brightness_override(&mut self) -> Result<(), SurfaceError> {
        self.canvas.set_brightness(None);
        Ok(())
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let image = self.canvas.to_ppm();
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &image)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| SurfaceError::PresentFailed(format!("{}: {}", self.path.display(), e)))?;
        debug!("Wrote {} byte snapshot to {}", image.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nightclock-{}-{}.ppm", name, std::process::id()))
    }

    #[test]
    fn test_present_writes_ppm() {
        let path = temp_path("present");
        let mut surface = SnapshotSurface::new(&path, 64, 32, 1.0);
        surface.set_background(Rgb888::new(0x00, 0x11, 0x22));
        surface.present().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n64 32\n255\n"));
        let header = b"P6\n64 32\n255\n".len();
        assert_eq!(bytes.len(), header + 64 * 32 * 3);
        assert_eq!(&bytes[header..header + 3], &[0x00, 0x11, 0x22]);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_override_is_local_and_reversible() {
        let path = temp_path("override");
        let mut surface = SnapshotSurface::new(&path, 8, 8, 1.0);
        surface.set_background(Rgb888::WHITE);

        surface.set_brightness_override(0.1).unwrap();
        surface.present().unwrap();
        let dimmed = fs::read(&path).unwrap();

        surface.clear_brightness_override().unwrap();
        surface.present().unwrap();
        let restored = fs::read(&path).unwrap();

        let header = b"P6\n8 8\n255\n".len();
        assert!(dimmed[header] < 64);
        assert_eq!(restored[header], 255);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_present_into_missing_directory_fails() {
        let mut surface = SnapshotSurface::new("/nonexistent-nightclock-dir/frame.ppm", 4, 4, 1.0);
        assert!(matches!(surface.present(), Err(SurfaceError::PresentFailed(_))));
        assert!(surface.system_brightness().is_err());
    }
}
