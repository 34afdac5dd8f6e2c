/*
 *  app.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Clock session: wires the scheduler, the presenter and the settings
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

use log::{debug, error, info, warn};
use std::future::Future;
use std::str::FromStr;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::clock::{ClockScheduler, ClockSnapshot, SchedulerError};
use crate::display::{DisplayPresenter, DisplaySurface, Palette};
use crate::settings::{ClockPosition, DisplaySettings, SettingsDialog, SettingsStore};

/// A line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the settings dialog
    Settings,
    Position(ClockPosition),
    Color(Palette),
    Apply,
    Cancel,
    /// Leave the clock
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim().to_ascii_lowercase();
        match word.as_str() {
            "settings" => return Ok(Command::Settings),
            "apply" => return Ok(Command::Apply),
            "cancel" => return Ok(Command::Cancel),
            "quit" | "back" => return Ok(Command::Quit),
            _ => {}
        }
        if let Ok(position) = word.parse::<ClockPosition>() {
            return Ok(Command::Position(position));
        }
        word.parse::<Palette>()
            .map(Command::Color)
            .map_err(|_| format!("unknown command '{}'", s.trim()))
    }
}

/// Whether the session keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything alive while the clock is on screen.
///
/// Ticks arrive over a channel so rendering, settings and teardown all
/// happen on the task that owns the session. Dropping the session stops
/// the scheduler and lifts the brightness override.
pub struct ClockSession<S: DisplaySurface> {
    presenter: DisplayPresenter<S>,
    scheduler: ClockScheduler,
    store: Box<dyn SettingsStore>,
    dialog: Option<SettingsDialog>,
}

impl<S: DisplaySurface> ClockSession<S> {
    /// Load settings, dim the surface, render now and start ticking.
    ///
    /// The returned receiver yields the snapshots of later minute boundaries.
    pub fn start(
        surface: S,
        mut scheduler: ClockScheduler,
        store: Box<dyn SettingsStore>,
    ) -> Result<(Self, UnboundedReceiver<ClockSnapshot>), SchedulerError> {
        let settings = DisplaySettings::load(&*store);
        info!("Loaded display settings: {}", settings);

        // dim and theme first; the presenter holds frames until the first render
        let mut presenter = DisplayPresenter::new(surface);
        presenter.activate();
        presenter.apply_settings(&settings);

        let (tx, mut ticks) = mpsc::unbounded_channel();
        // on failure the presenter drops here and restores brightness
        scheduler.start(move |snapshot| {
            if tx.send(snapshot).is_err() {
                debug!("Clock session gone, dropping tick");
            }
        })?;

        let mut session = Self { presenter, scheduler, store, dialog: None };
        // the first snapshot is queued synchronously by start()
        if let Ok(first) = ticks.try_recv() {
            session.on_tick(first);
        }
        Ok((session, ticks))
    }

    pub fn on_tick(&mut self, snapshot: ClockSnapshot) {
        self.presenter.render(&snapshot);
    }

    /// Persist, then put on screen. A failed commit is logged and the
    /// settings still apply for this session.
    pub fn apply_settings(&mut self, settings: DisplaySettings) {
        if let Err(e) = settings.save(&mut *self.store) {
            error!("Failed to save display settings: {}", e);
        }
        self.presenter.apply_settings(&settings);
    }

    pub fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Settings => {
                let settings = *self.presenter.settings();
                info!("Settings open: {}", settings);
                self.dialog = Some(SettingsDialog::open(&settings));
            }
            Command::Position(position) => match self.dialog.as_mut() {
                Some(dialog) => dialog.select_position(position),
                None => warn!("No settings open, ignoring position {}", position),
            },
            Command::Color(color) => match self.dialog.as_mut() {
                Some(dialog) => dialog.select_color(color),
                None => warn!("No settings open, ignoring color {}", color),
            },
            Command::Apply => match self.dialog.take() {
                Some(dialog) => self.apply_settings(dialog.apply()),
                None => warn!("No settings open, nothing to apply"),
            },
            Command::Cancel => {
                if let Some(dialog) = self.dialog.take() {
                    dialog.cancel();
                    info!("Settings discarded");
                }
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Stop ticking and restore brightness. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.presenter.deactivate();
    }

    pub fn presenter(&self) -> &DisplayPresenter<S> {
        &self.presenter
    }

    pub fn store(&self) -> &dyn SettingsStore {
        &*self.store
    }

    pub fn dialog(&self) -> Option<&SettingsDialog> {
        self.dialog.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }
}

impl<S: DisplaySurface> Drop for ClockSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drive the session until `quit`, or until `shutdown` resolves.
///
/// A closed command channel only stops command handling; the clock keeps
/// running. The session is shut down and handed back.
pub async fn run<S, F>(
    mut session: ClockSession<S>,
    mut ticks: UnboundedReceiver<ClockSnapshot>,
    mut commands: UnboundedReceiver<Command>,
    shutdown: F,
) -> ClockSession<S>
where
    S: DisplaySurface,
    F: Future,
{
    tokio::pin!(shutdown);
    let mut commands_open = true;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            Some(snapshot) = ticks.recv() => session.on_tick(snapshot),
            command = commands.recv(), if commands_open => match command {
                Some(command) => {
                    debug!("Command: {:?}", command);
                    if session.handle_command(command) == Flow::Quit {
                        info!("Quit requested");
                        break;
                    }
                }
                None => {
                    info!("Command input closed, clock keeps running");
                    commands_open = false;
                }
            },
        }
    }

    session.shutdown();
    session
}
