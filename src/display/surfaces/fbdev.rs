/*
 *  display/surfaces/fbdev.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Linux framebuffer surface, memory mapped
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
use log::{debug, info};
use memmap2::MmapMut;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::constants::SYSFS_GRAPHICS;
use crate::display::backlight;
use crate::display::error::SurfaceError;
use crate::display::framebuffer::{FrameCanvas, PixelFormat};
use crate::display::traits::{ClockLayout, DisplaySurface, Element};

/// Geometry of a framebuffer device as published in sysfs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbGeometry {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Bytes per line, may exceed width * bytes per pixel
    pub stride: usize,
}

impl FbGeometry {
    /// Read `virtual_size`, `bits_per_pixel` and `stride` from `sysfs_dir`
    pub fn from_sysfs(sysfs_dir: &Path) -> Result<Self, SurfaceError> {
        let read = |name: &str| -> Result<String, SurfaceError> {
            fs::read_to_string(sysfs_dir.join(name)).map_err(|e| {
                SurfaceError::InvalidConfiguration(format!("{}/{}: {}", sysfs_dir.display(), name, e))
            })
        };

        let (width, height) = parse_virtual_size(&read("virtual_size")?)?;
        let bits_per_pixel = parse_number(&read("bits_per_pixel")?)?;
        // older kernels lack `stride`
        let stride = match read("stride") {
            Ok(raw) => parse_number(&raw)? as usize,
            Err(_) => width as usize * (bits_per_pixel as usize / 8),
        };
        Ok(Self { width, height, bits_per_pixel, stride })
    }
}

/// "800,480" as published by sysfs
fn parse_virtual_size(raw: &str) -> Result<(u32, u32), SurfaceError> {
    let (w, h) = raw
        .trim()
        .split_once(',')
        .ok_or_else(|| SurfaceError::InvalidConfiguration(format!("bad virtual_size '{}'", raw.trim())))?;
    Ok((parse_number(w)?, parse_number(h)?))
}

fn parse_number(raw: &str) -> Result<u32, SurfaceError> {
    raw.trim()
        .parse()
        .map_err(|_| SurfaceError::InvalidConfiguration(format!("not a number: '{}'", raw.trim())))
}

/// sysfs directory for a device node, `/dev/fb1` -> `/sys/class/graphics/fb1`
fn sysfs_dir_for(device: &Path) -> Result<PathBuf, SurfaceError> {
    let name = device
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| n.starts_with("fb"))
        .ok_or_else(|| SurfaceError::InvalidConfiguration(format!("{} is not a framebuffer device", device.display())))?;
    Ok(Path::new(SYSFS_GRAPHICS).join(name))
}

/// Draws the clock straight into a mapped `/dev/fbN`.
///
/// Brightness is dimmed in software; the backlight is only read.
pub struct FramebufferSurface {
    canvas: FrameCanvas,
    format: PixelFormat,
    geometry: FbGeometry,
    map: MmapMut,
    _file: File,
    backlight: Option<PathBuf>,
}

impl FramebufferSurface {
    /// Map `device`; `size` overrides the width/height the kernel reports
    pub fn open(
        device: &Path,
        size: Option<(u32, u32)>,
        density: f32,
        backlight: Option<PathBuf>,
    ) -> Result<Self, SurfaceError> {
        let mut geometry = FbGeometry::from_sysfs(&sysfs_dir_for(device)?)?;
        let format = PixelFormat::from_bpp(geometry.bits_per_pixel)?;
        if let Some((width, height)) = size {
            geometry.width = width.min(geometry.width);
            geometry.height = height.min(geometry.height);
        }

        let file = OpenOptions::new().read(true).write(true).open(device)?;
        // SAFETY: the mapping is private to this surface and only written via `present`;
        // the kernel keeps the framebuffer memory alive while the file is open.
        let map = unsafe { MmapMut::map_mut(&file)? };

        let needed = geometry.stride * geometry.height as usize;
        if map.len() < needed {
            return Err(SurfaceError::InvalidConfiguration(format!(
                "{} maps {} bytes, {} needed",
                device.display(),
                map.len(),
                needed
            )));
        }

        info!(
            "Framebuffer {} {}x{} {:?} stride {}",
            device.display(),
            geometry.width,
            geometry.height,
            format,
            geometry.stride
        );

        Ok(Self {
            canvas: FrameCanvas::new(geometry.width, geometry.height, density),
            format,
            geometry,
            map,
            _file: file,
            backlight,
        })
    }
}

impl DisplaySurface for FramebufferSurface {
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
        backlight::system_level(self.backlight.as_deref())
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
        let frame = self.canvas.pack(self.format, self.geometry.stride);
        self.map[..frame.len()].copy_from_slice(&frame);
        self.map
            .flush()
            .map_err(|e| SurfaceError::PresentFailed(format!("framebuffer flush: {}", e)))?;
        debug!("Presented {} bytes to framebuffer", frame.len());
        Ok(())
    }
}
