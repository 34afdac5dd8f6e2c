/*
 *  tests/clock_session.rs
 *
 *  Integration tests for the clock session
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 */

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use nightclock::app::{self, ClockSession, Command};
use nightclock::clock::{ClockScheduler, TimeSource};
use nightclock::constants::{DIM_BRIGHTNESS, KEY_BACKGROUND_COLOR, KEY_TIME_POSITION};
use nightclock::display::{ClockLayout, DisplaySurface, Element, HeadlessSurface, Palette, SurfaceError};
use nightclock::settings::{ClockPosition, MemorySettingsStore, SettingsStore};

/// Wall clock starting at `origin`, advanced by tokio's paused clock
struct PausedClock {
    origin: DateTime<FixedOffset>,
    started: Instant,
}

impl TimeSource for PausedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.origin + TimeDelta::from_std(self.started.elapsed()).unwrap()
    }
}

fn scheduler_at(h: u32, m: u32, s: u32) -> ClockScheduler {
    let origin = NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
        .and_local_timezone(FixedOffset::west_opt(5 * 3600).unwrap())
        .unwrap();
    ClockScheduler::new(Arc::new(PausedClock { origin, started: Instant::now() }))
}

/// Frames as they went out: override level and time text at each present
type Frames = Arc<Mutex<Vec<(Option<f32>, String)>>>;

#[derive(Default)]
struct RecordingSurface {
    level: Option<f32>,
    time_text: String,
    frames: Frames,
}

impl DisplaySurface for RecordingSurface {
    fn set_background(&mut self, _color: Rgb888) {}

    fn set_text(&mut self, element: Element, text: &str) {
        if element == Element::TimeText {
            self.time_text = text.to_string();
        }
    }

    fn set_element_color(&mut self, _element: Element, _color: Rgb888) {}

    fn set_clock_layout(&mut self, _layout: ClockLayout) {}

    fn system_brightness(&self) -> Result<f32, SurfaceError> {
        Ok(1.0)
    }

    fn set_brightness_override(&mut self, level: f32) -> Result<(), SurfaceError> {
        self.level = Some(level);
        Ok(())
    }

    fn clear_brightness_override(&mut self) -> Result<(), SurfaceError> {
        self.level = None;
        Ok(())
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.frames.lock().unwrap().push((self.level, self.time_text.clone()));
        Ok(())
    }
}

fn stored(background: i64, position: &str) -> Box<MemorySettingsStore> {
    let mut store = MemorySettingsStore::new();
    store.set_int(KEY_BACKGROUND_COLOR, background);
    store.set_string(KEY_TIME_POSITION, position);
    store.commit().unwrap();
    Box::new(store)
}

#[tokio::test(start_paused = true)]
async fn test_start_renders_immediately_and_dims() {
    let surface = HeadlessSurface::with_system_brightness(0.7);
    let state = surface.state();

    let (session, _ticks) =
        ClockSession::start(surface, scheduler_at(22, 15, 10), stored(0x333333, "right")).unwrap();

    {
        let s = state.lock().unwrap();
        assert_eq!(s.scene.time_text, "22:15");
        assert_eq!(s.brightness_override, Some(DIM_BRIGHTNESS));
        assert_eq!(s.scene.background, Rgb888::new(0x33, 0x33, 0x33));
        assert_eq!(s.scene.layout.align, ClockPosition::End);
        // dark gray is dark enough for white text
        assert_eq!(s.scene.time_color, Rgb888::WHITE);
    }
    assert!(session.is_running());
    assert_eq!(session.presenter().brightness_state().original_level, Some(0.7));

    drop(session);
    assert_eq!(state.lock().unwrap().brightness_override, None);
}

#[tokio::test(start_paused = true)]
async fn test_every_startup_frame_is_dimmed_and_labelled() {
    let surface = RecordingSurface::default();
    let frames = Arc::clone(&surface.frames);

    let (session, _ticks) =
        ClockSession::start(surface, scheduler_at(1, 43, 5), stored(0xFFFFFF, "right")).unwrap();

    assert_eq!(*frames.lock().unwrap(), vec![(Some(DIM_BRIGHTNESS), "01:43".to_string())]);

    // teardown frame goes out at system brightness
    drop(session);
    assert_eq!(frames.lock().unwrap().last(), Some(&(None, "01:43".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_ticks_keep_rendering_after_input_closes() {
    let surface = HeadlessSurface::new();
    let state = surface.state();
    let (session, ticks) =
        ClockSession::start(surface, scheduler_at(1, 59, 30), Box::new(MemorySettingsStore::new())).unwrap();

    // stdin at EOF from the start
    let (tx, commands) = mpsc::unbounded_channel::<Command>();
    drop(tx);

    // ticks at +30 s (02:00) and +90 s (02:01); stop before +150 s
    let session = app::run(session, ticks, commands, tokio::time::sleep(Duration::from_secs(125))).await;

    let s = state.lock().unwrap();
    assert_eq!(s.scene.time_text, "02:01");
    assert!(!s.scene.date_text.is_empty());
    assert_eq!(s.brightness_override, None);
    drop(s);
    assert!(!session.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_settings_dialog_persists_and_applies() {
    let surface = HeadlessSurface::new();
    let state = surface.state();
    let (session, ticks) =
        ClockSession::start(surface, scheduler_at(6, 0, 0), Box::new(MemorySettingsStore::new())).unwrap();
    assert_eq!(state.lock().unwrap().scene.layout.align, ClockPosition::Start);

    let (tx, commands) = mpsc::unbounded_channel();
    for command in ["settings", "right", "dark-blue", "apply", "quit"] {
        tx.send(command.parse::<Command>().unwrap()).unwrap();
    }

    let session = app::run(session, ticks, commands, std::future::pending::<()>()).await;

    assert_eq!(session.store().get_string(KEY_TIME_POSITION, "left"), "right");
    assert_eq!(session.store().get_int(KEY_BACKGROUND_COLOR, 0), 0x001122);
    let s = state.lock().unwrap();
    assert_eq!(s.scene.layout.align, ClockPosition::End);
    assert!(s.scene.layout.margin_end_dp > 0);
    assert_eq!(s.scene.layout.margin_start_dp, 0);
    assert_eq!(s.scene.background, Palette::DarkBlue.to_rgb());
    assert_eq!(s.brightness_override, None);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_draft() {
    let surface = HeadlessSurface::new();
    let state = surface.state();
    let (mut session, _ticks) =
        ClockSession::start(surface, scheduler_at(6, 0, 0), Box::new(MemorySettingsStore::new())).unwrap();

    session.handle_command(Command::Settings);
    session.handle_command(Command::Color(Palette::DarkRed));
    session.handle_command(Command::Cancel);
    assert!(session.dialog().is_none());

    // without an open dialog selections are ignored
    session.handle_command(Command::Color(Palette::DarkRed));
    session.handle_command(Command::Apply);

    assert_eq!(session.store().get_int(KEY_BACKGROUND_COLOR, -1), -1);
    assert_eq!(state.lock().unwrap().scene.background, Rgb888::BLACK);
}

#[tokio::test(start_paused = true)]
async fn test_failed_commit_still_applies() {
    let surface = HeadlessSurface::new();
    let state = surface.state();
    let mut store = MemorySettingsStore::new();
    store.fail_commits(true);
    let (mut session, _ticks) = ClockSession::start(surface, scheduler_at(6, 0, 0), Box::new(store)).unwrap();

    session.handle_command(Command::Settings);
    session.handle_command(Command::Color(Palette::DarkGray));
    session.handle_command(Command::Apply);

    assert_eq!(state.lock().unwrap().scene.background, Palette::DarkGray.to_rgb());
    assert_eq!(session.store().get_int(KEY_BACKGROUND_COLOR, -1), -1);
}

#[test]
fn test_start_without_runtime_restores_brightness() {
    let surface = HeadlessSurface::new();
    let state = surface.state();
    let result = ClockSession::start(surface, scheduler_at(6, 0, 0), Box::new(MemorySettingsStore::new()));
    assert!(result.is_err());
    let s = state.lock().unwrap();
    assert_eq!(s.brightness_override, None);
    assert_eq!(s.override_clears, 1);
}
