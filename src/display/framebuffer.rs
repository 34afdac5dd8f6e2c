/*
 *  display/framebuffer.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Off-screen canvas and pixel packing for the pixel surfaces
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

use crate::display::color::dim;
use crate::display::error::SurfaceError;
use crate::display::scene::Scene;
use crate::display::traits::{ClockLayout, Element};
use crate::vframebuf::VarFrameBuf;

/// Pixel layouts a Linux framebuffer may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32 bpp, little endian B, G, R, X
    Xrgb8888,

    /// 16 bpp, little endian 5-6-5
    Rgb565,
}

impl PixelFormat {
    pub fn from_bpp(bits_per_pixel: u32) -> Result<Self, SurfaceError> {
        match bits_per_pixel {
            32 => Ok(PixelFormat::Xrgb8888),
            16 => Ok(PixelFormat::Rgb565),
            other => Err(SurfaceError::UnsupportedFormat(format!("{} bits per pixel", other))),
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Xrgb8888 => 4,
            PixelFormat::Rgb565 => 2,
        }
    }

    /// Write one pixel into `out` (exactly `bytes_per_pixel` long)
    #[inline]
    pub fn encode(&self, color: Rgb888, out: &mut [u8]) {
        match self {
            PixelFormat::Xrgb8888 => {
                out[0] = color.b();
                out[1] = color.g();
                out[2] = color.r();
                out[3] = 0xff;
            }
            PixelFormat::Rgb565 => {
                let packed = ((color.r() as u16 >> 3) << 11)
                    | ((color.g() as u16 >> 2) << 5)
                    | (color.b() as u16 >> 3);
                out[..2].copy_from_slice(&packed.to_le_bytes());
            }
        }
    }
}

/// Retained scene plus the canvas it is composed into.
///
/// The brightness override lives here as a software dim, so it only ever
/// affects the pixels this surface puts out.
#[derive(Debug, Clone)]
pub struct FrameCanvas {
    scene: Scene,
    canvas: VarFrameBuf<Rgb888>,
    density: f32,
    brightness: Option<f32>,
}

impl FrameCanvas {
    pub fn new(width: u32, height: u32, density: f32) -> Self {
        Self {
            scene: Scene::default(),
            canvas: VarFrameBuf::new(width, height, Rgb888::BLACK),
            density,
            brightness: None,
        }
    }

    pub fn set_background(&mut self, color: Rgb888) {
        self.scene.background = color;
    }

    pub fn set_text(&mut self, element: Element, text: &str) {
        self.scene.set_text(element, text);
    }

    pub fn set_color(&mut self, element: Element, color: Rgb888) {
        self.scene.set_color(element, color);
    }

    pub fn set_layout(&mut self, layout: ClockLayout) {
        self.scene.layout = layout;
    }

    pub fn set_brightness(&mut self, level: Option<f32>) {
        self.brightness = level.map(|l| l.clamp(0.0, 1.0));
    }

    /// Compose the scene, returning the canvas as last drawn
    pub fn compose(&mut self) -> &VarFrameBuf<Rgb888> {
        // VarFrameBuf never fails to draw
        let _ = self.scene.draw(&mut self.canvas, self.density);
        &self.canvas
    }

    /// Color as it leaves the surface, dimmed when an override is set
    #[inline]
    pub fn output(&self, color: Rgb888) -> Rgb888 {
        match self.brightness {
            Some(level) => dim(color, level),
            None => color,
        }
    }

    /// Compose and pack into `stride`-byte rows of `format`
    pub fn pack(&mut self, format: PixelFormat, stride: usize) -> Vec<u8> {
        self.compose();
        let bpp = format.bytes_per_pixel();
        let mut bytes = vec![0u8; stride * self.canvas.height()];
        for (y, row) in self.canvas.rows().enumerate() {
            let line = &mut bytes[y * stride..(y + 1) * stride];
            for (x, &pixel) in row.iter().enumerate() {
                let at = x * bpp;
                if at + bpp > line.len() {
                    break;
                }
                format.encode(self.output(pixel), &mut line[at..at + bpp]);
            }
        }
        bytes
    }

    /// Compose and encode as a binary PPM (P6)
    pub fn to_ppm(&mut self) -> Vec<u8> {
        self.compose();
        let header = format!("P6\n{} {}\n255\n", self.canvas.width(), self.canvas.height());
        let mut bytes = Vec::with_capacity(header.len() + self.canvas.as_slice().len() * 3);
        bytes.extend_from_slice(header.as_bytes());
        for &pixel in self.canvas.as_slice() {
            let c = self.output(pixel);
            bytes.extend_from_slice(&[c.r(), c.g(), c.b()]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_from_bpp() {
        assert_eq!(PixelFormat::from_bpp(32).unwrap(), PixelFormat::Xrgb8888);
        assert_eq!(PixelFormat::from_bpp(16).unwrap(), PixelFormat::Rgb565);
        assert!(matches!(PixelFormat::from_bpp(24), Err(SurfaceError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_encode_pixels() {
        let mut out = [0u8; 4];
        PixelFormat::Xrgb8888.encode(Rgb888::new(0x11, 0x22, 0x33), &mut out);
        assert_eq!(out, [0x33, 0x22, 0x11, 0xff]);

        let mut out = [0u8; 2];
        PixelFormat::Rgb565.encode(Rgb888::RED, &mut out);
        assert_eq!(u16::from_le_bytes(out), 0xF800);
        PixelFormat::Rgb565.encode(Rgb888::WHITE, &mut out);
        assert_eq!(u16::from_le_bytes(out), 0xFFFF);
    }

    #[test]
    fn test_pack_respects_stride() {
        let mut canvas = FrameCanvas::new(4, 2, 1.0);
        canvas.set_background(Rgb888::new(0x22, 0x00, 0x11));
        // 4 px * 2 bytes + 8 bytes of padding per line
        let bytes = canvas.pack(PixelFormat::Rgb565, 16);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[8..16], &[0u8; 8]);
    }

    #[test]
    fn test_ppm_is_dimmed_with_override() {
        let mut canvas = FrameCanvas::new(2, 1, 1.0);
        canvas.set_background(Rgb888::WHITE);
        let bright = canvas.to_ppm();
        assert!(bright.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(bright[bright.len() - 3..], [255, 255, 255]);

        canvas.set_brightness(Some(0.1));
        let dimmed = canvas.to_ppm();
        assert!(dimmed[dimmed.len() - 3..].iter().all(|&v| v < 255 / 5));

        canvas.set_brightness(None);
        assert_eq!(canvas.to_ppm(), bright);
    }
}
