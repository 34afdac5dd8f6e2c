/*
 *  display/presenter.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Applies brightness, theming and labels to a display surface
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
use log::{debug, error, info, warn};

use crate::clock::ClockSnapshot;
use crate::constants::{CLOCK_EDGE_MARGIN_DP, DIM_BRIGHTNESS};
use crate::display::color::contrast_color;
use crate::display::traits::{ClockLayout, DisplaySurface, Element};
use crate::settings::DisplaySettings;

/// Brightness bookkeeping for the lifetime of the process
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrightnessState {
    /// System brightness read at activation, if it could be read
    pub original_level: Option<f32>,

    /// Whether the surface currently carries our dim override
    pub override_active: bool,
}

/// Owns the surface side effects: dim while active, restore on teardown,
/// labels and contrast-aware colors.
///
/// A repeated `activate` only re-affirms; `deactivate` is a no-op unless
/// the override is on. Dropping the presenter deactivates it. Nothing is
/// presented until the first snapshot has been rendered, so the surface
/// never shows a frame without labels.
pub struct DisplayPresenter<S: DisplaySurface> {
    surface: S,
    brightness: BrightnessState,
    settings: DisplaySettings,
    foreground: Rgb888,
    current: Option<ClockSnapshot>,
}

impl<S: DisplaySurface> DisplayPresenter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            brightness: BrightnessState::default(),
            settings: DisplaySettings::default(),
            foreground: contrast_color(DisplaySettings::default().background),
            current: None,
        }
    }

    /// Dim the surface to the fixed override level
    pub fn activate(&mut self) {
        if self.brightness.override_active {
            debug!("Presenter already active, keeping brightness override");
            return;
        }

        self.brightness.original_level = match self.surface.system_brightness() {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("{}; dimming without a stored original", e);
                None
            }
        };

        if let Err(e) = self.surface.set_brightness_override(DIM_BRIGHTNESS) {
            error!("Failed to apply brightness override: {}", e);
        }
        // set even on failure so teardown still attempts the restore
        self.brightness.override_active = true;
        info!(
            "Surface dimmed to {:.0}% (system brightness {})",
            DIM_BRIGHTNESS * 100.0,
            self.brightness
                .original_level
                .map_or_else(|| "unknown".to_string(), |l| format!("{:.0}%", l * 100.0))
        );
        self.present();
    }

    /// Lift the override, back to the system default
    pub fn deactivate(&mut self) {
        if !self.brightness.override_active {
            return;
        }
        if let Err(e) = self.surface.clear_brightness_override() {
            error!("Failed to clear brightness override: {}", e);
        }
        self.brightness.override_active = false;
        info!("Surface brightness restored to system default");
        self.present();
    }

    /// Write the labels of `snapshot` and present
    pub fn render(&mut self, snapshot: &ClockSnapshot) {
        self.surface.set_text(Element::TimeText, &snapshot.time_label);
        self.surface.set_text(Element::DateText, &snapshot.date_label);
        self.current = Some(snapshot.clone());
        self.present();
    }

    /// Background, clock placement and the derived foreground color
    pub fn apply_settings(&mut self, settings: &DisplaySettings) {
        self.surface.set_background(settings.background);
        self.surface.set_clock_layout(ClockLayout::aligned(settings.clock_position, CLOCK_EDGE_MARGIN_DP));

        let foreground = contrast_color(settings.background);
        for element in [Element::TimeText, Element::DateText, Element::SettingsIcon] {
            self.surface.set_element_color(element, foreground);
        }

        self.foreground = foreground;
        self.settings = *settings;
        info!("Applied display settings: {}", settings);
        self.present();
    }

    pub fn is_active(&self) -> bool {
        self.brightness.override_active
    }

    pub fn brightness_state(&self) -> BrightnessState {
        self.brightness
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Text/icon color chosen for the current background
    pub fn foreground(&self) -> Rgb888 {
        self.foreground
    }

    /// Last rendered snapshot
    pub fn current(&self) -> Option<&ClockSnapshot> {
        self.current.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn present(&mut self) {
        if self.current.is_none() {
            debug!("No snapshot rendered yet, holding frame");
            return;
        }
        if let Err(e) = self.surface.present() {
            warn!("Failed to present clock surface: {}", e);
        }
    }
}

impl<S: DisplaySurface> Drop for DisplayPresenter<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::surfaces::HeadlessSurface;
    use crate::settings::ClockPosition;
    use embedded_graphics::pixelcolor::RgbColor;

    fn snapshot(time: &str, date: &str) -> ClockSnapshot {
        ClockSnapshot { time_label: time.into(), date_label: date.into() }
    }

    #[test]
    fn test_activate_then_deactivate_clears_override() {
        let surface = HeadlessSurface::with_system_brightness(0.8);
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.activate();
        assert_eq!(state.lock().unwrap().brightness_override, Some(DIM_BRIGHTNESS));
        assert_eq!(presenter.brightness_state().original_level, Some(0.8));
        assert!(presenter.is_active());

        presenter.deactivate();
        assert_eq!(state.lock().unwrap().brightness_override, None);
        assert!(!presenter.is_active());

        let clears = state.lock().unwrap().override_clears;
        presenter.deactivate();
        assert_eq!(state.lock().unwrap().override_clears, clears);
    }

    #[test]
    fn test_activate_without_system_brightness() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.activate();
        assert_eq!(presenter.brightness_state().original_level, None);
        assert_eq!(state.lock().unwrap().brightness_override, Some(DIM_BRIGHTNESS));
    }

    #[test]
    fn test_double_activate_applies_once() {
        let surface = HeadlessSurface::with_system_brightness(0.5);
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.activate();
        presenter.activate();
        assert_eq!(state.lock().unwrap().override_sets, 1);

        presenter.deactivate();
        assert_eq!(state.lock().unwrap().brightness_override, None);
    }

    #[test]
    fn test_deactivate_without_activate_is_noop() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);
        presenter.deactivate();
        assert_eq!(state.lock().unwrap().override_clears, 0);
        assert_eq!(state.lock().unwrap().present_count, 0);
    }

    #[test]
    fn test_drop_restores_brightness() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        {
            let mut presenter = DisplayPresenter::new(surface);
            presenter.activate();
        }
        assert_eq!(state.lock().unwrap().brightness_override, None);
        assert_eq!(state.lock().unwrap().override_clears, 1);
    }

    #[test]
    fn test_override_failure_still_restores_on_exit() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        state.lock().unwrap().simulate_override_failure = true;
        let mut presenter = DisplayPresenter::new(surface);

        presenter.activate();
        assert!(presenter.is_active());
        state.lock().unwrap().simulate_override_failure = false;
        presenter.deactivate();
        assert_eq!(state.lock().unwrap().override_clears, 1);
    }

    #[test]
    fn test_render_writes_labels() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.render(&snapshot("06:30", "Mon, Mar 11"));
        let s = state.lock().unwrap();
        assert_eq!(s.scene.time_text, "06:30");
        assert_eq!(s.scene.date_text, "Mon, Mar 11");
        assert_eq!(s.present_count, 1);
        drop(s);
        assert_eq!(presenter.current().map(|c| c.time_label.as_str()), Some("06:30"));
    }

    #[test]
    fn test_frames_held_until_first_render() {
        let surface = HeadlessSurface::with_system_brightness(0.9);
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.activate();
        presenter.apply_settings(&DisplaySettings { clock_position: ClockPosition::End, background: Rgb888::WHITE });
        assert_eq!(state.lock().unwrap().present_count, 0);

        presenter.render(&snapshot("23:05", "Sun, Mar 10"));
        {
            let s = state.lock().unwrap();
            assert_eq!(s.present_count, 1);
            assert_eq!(s.brightness_override, Some(DIM_BRIGHTNESS));
            assert_eq!(s.scene.time_text, "23:05");
            assert_eq!(s.scene.background, Rgb888::WHITE);
        }

        // once rendered, settings and teardown go out immediately
        presenter.apply_settings(&DisplaySettings::default());
        presenter.deactivate();
        assert_eq!(state.lock().unwrap().present_count, 3);
    }

    #[test]
    fn test_contrast_foreground() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.apply_settings(&DisplaySettings { clock_position: ClockPosition::Start, background: Rgb888::BLACK });
        assert_eq!(presenter.foreground(), Rgb888::WHITE);

        presenter.apply_settings(&DisplaySettings { clock_position: ClockPosition::Start, background: Rgb888::WHITE });
        assert_eq!(presenter.foreground(), Rgb888::BLACK);
        let s = state.lock().unwrap();
        assert_eq!(s.scene.background, Rgb888::WHITE);
        assert_eq!((s.scene.time_color, s.scene.date_color, s.scene.icon_color), (Rgb888::BLACK, Rgb888::BLACK, Rgb888::BLACK));
    }

    #[test]
    fn test_clock_position_margins() {
        let surface = HeadlessSurface::new();
        let state = surface.state();
        let mut presenter = DisplayPresenter::new(surface);

        presenter.apply_settings(&DisplaySettings { clock_position: ClockPosition::End, ..Default::default() });
        let layout = state.lock().unwrap().scene.layout;
        assert_eq!(layout.align, ClockPosition::End);
        assert!(layout.margin_end_dp > 0);
        assert_eq!(layout.margin_start_dp, 0);

        presenter.apply_settings(&DisplaySettings { clock_position: ClockPosition::Start, ..Default::default() });
        let layout = state.lock().unwrap().scene.layout;
        assert_eq!(layout.align, ClockPosition::Start);
        assert!(layout.margin_start_dp > 0);
        assert_eq!(layout.margin_end_dp, 0);
    }
}
