/*
 *  display/traits.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Core trait definitions for the display surface abstraction
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

use crate::display::error::SurfaceError;
use crate::settings::ClockPosition;

/// Child elements of the clock surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    TimeText,
    DateText,
    /// The settings control; takes a color but no text
    SettingsIcon,
}

/// Placement of the time/date block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockLayout {
    /// Edge the block (and its text) is aligned to
    pub align: ClockPosition,

    /// Margin from the start edge, density-independent units
    pub margin_start_dp: u32,

    /// Margin from the end edge, density-independent units
    pub margin_end_dp: u32,
}

impl ClockLayout {
    /// Aligned to `align` with `margin_dp` on that edge and none on the other
    pub fn aligned(align: ClockPosition, margin_dp: u32) -> Self {
        match align {
            ClockPosition::Start => Self { align, margin_start_dp: margin_dp, margin_end_dp: 0 },
            ClockPosition::End => Self { align, margin_start_dp: 0, margin_end_dp: margin_dp },
        }
    }
}

/// The on-screen region the clock renders into and dims.
///
/// Setters only record state; `present()` pushes the composed frame out.
/// The brightness override is scoped to this surface and never changes
/// the system-wide setting.
pub trait DisplaySurface: Send {
    /// Background color of the root surface
    fn set_background(&mut self, color: Rgb888);

    /// Text of a child element (ignored by elements without text)
    fn set_text(&mut self, element: Element, text: &str);

    /// Foreground color of a child element
    fn set_element_color(&mut self, element: Element, color: Rgb888);

    fn set_clock_layout(&mut self, layout: ClockLayout);

    /// Current system brightness in 0.0..=1.0
    fn system_brightness(&self) -> Result<f32, SurfaceError>;

    /// Override brightness for this surface only (0.0..=1.0)
    fn set_brightness_override(&mut self, level: f32) -> Result<(), SurfaceError>;

    /// Drop the override, back to the system default
    fn clear_brightness_override(&mut self) -> Result<(), SurfaceError>;

    fn present(&mut self) -> Result<(), SurfaceError>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn set_background(&mut self, color: Rgb888) {
        (**self).set_background(color)
    }

    fn set_text(&mut self, element: Element, text: &str) {
        (**self).set_text(element, text)
    }

    fn set_element_color(&mut self, element: Element, color: Rgb888) {
        (**self).set_element_color(element, color)
    }

    fn set_clock_layout(&mut self, layout: ClockLayout) {
        (**self).set_clock_layout(layout)
    }

    fn system_brightness(&self) -> Result<f32, SurfaceError> {
        (**self).system_brightness()
    }

    fn set_brightness_override(&mut self, level: f32) -> Result<(), SurfaceError> {
        (**self).set_brightness_override(level)
    }

    fn clear_brightness_override(&mut self) -> Result<(), SurfaceError> {
        (**self).clear_brightness_override()
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        (**self).present()
    }
}

/// Type-erased surface chosen at runtime from config
pub type BoxedSurface = Box<dyn DisplaySurface>;
