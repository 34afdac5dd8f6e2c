/*
 *  display/surfaces/headless.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Headless surface: records state, logs renders, injects failures
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
use log::info;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::color::pack_rgb;
use crate::display::error::SurfaceError;
use crate::display::scene::Scene;
use crate::display::traits::{ClockLayout, DisplaySurface, Element};

/// Surface without an output device.
///
/// Useful for:
/// - running the clock on a machine with no panel (renders go to the log)
/// - unit and integration tests
///
/// All state sits behind a shared handle so tests can inspect it after the
/// surface has been moved into a presenter.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Arc<Mutex<HeadlessState>>,
}

/// Internal state for the headless surface (shared for inspection)
#[derive(Debug, Default)]
pub struct HeadlessState {
    /// What a real surface would draw
    pub scene: Scene,

    /// Active override, None when following the system
    pub brightness_override: Option<f32>,

    /// Reported system brightness, None simulates an unreadable setting
    pub system_brightness: Option<f32>,

    /// Number of times present() succeeded
    pub present_count: usize,

    /// Number of times an override was set
    pub override_sets: usize,

    /// Number of times the override was cleared
    pub override_clears: usize,

    /// Simulate failures (for error testing)
    pub simulate_present_failure: bool,
    pub simulate_override_failure: bool,
}

impl HeadlessSurface {
    /// Surface whose system brightness cannot be read
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_brightness(level: f32) -> Self {
        let surface = Self::default();
        surface.lock().system_brightness = Some(level);
        surface
    }

    /// Shared handle to the state for inspection
    pub fn state(&self) -> Arc<Mutex<HeadlessState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        // a poisoned lock only means a test panicked mid-update; the state is still readable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DisplaySurface for HeadlessSurface {
    fn set_background(&mut self, color: Rgb888) {
        self.lock().scene.background = color;
    }

    fn set_text(&mut self, element: Element, text: &str) {
        self.lock().scene.set_text(element, text);
    }

    fn set_element_color(&mut self, element: Element, color: Rgb888) {
        self.lock().scene.set_color(element, color);
    }

    fn set_clock_layout(&mut self, layout: ClockLayout) {
        self.lock().scene.layout = layout;
    }

    fn system_brightness(&self) -> Result<f32, SurfaceError> {
        self.lock()
            .system_brightness
            .ok_or_else(|| SurfaceError::BrightnessUnavailable("headless surface has no backlight".to_string()))
    }

    fn set_brightness_override(&mut self, level: f32) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        if state.simulate_override_failure {
            return Err(SurfaceError::Other("Simulated override failure".to_string()));
        }
        state.brightness_override = Some(level.clamp(0.0, 1.0));
        state.override_sets += 1;
        Ok(())
    }

    fn clear_brightness_override(&mut self) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        state.brightness_override = None;
        state.override_clears += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        if state.simulate_present_failure {
            return Err(SurfaceError::PresentFailed("Simulated present failure".to_string()));
        }
        state.present_count += 1;
        info!(
            "[headless] {} {} on #{:06X} ({:?}, brightness {})",
            state.scene.time_text,
            state.scene.date_text,
            pack_rgb(state.scene.background),
            state.scene.layout.align,
            state
                .brightness_override
                .map_or_else(|| "system".to_string(), |l| format!("{:.0}%", l * 100.0)),
        );
        Ok(())
    }
}
