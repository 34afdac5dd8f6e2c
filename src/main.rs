/*
 *  main.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *	(c) 2025-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::Context;
use env_logger::Env;
use log::{error, info, warn};
use std::io::{self, BufRead};
use std::thread;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use nightclock::app::{self, ClockSession, Command};
use nightclock::clock::ClockScheduler;
use nightclock::config::{self, Cli, Config};
use nightclock::display::SurfaceFactory;
use nightclock::settings::{DisplaySettings, SettingsStore, YamlSettingsStore};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
///
/// Once a signal is caught it logs the event and returns, the caller
/// then runs the teardown path.
async fn signal_handler() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Until a signal arrives; if handlers cannot be installed, never
async fn shutdown_signal() {
    if let Err(e) = signal_handler().await {
        error!("Cannot install signal handlers: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Read commands from stdin, one per line.
///
/// A plain thread: a blocking stdin read on the runtime's blocking pool
/// would hold up runtime shutdown until the next newline.
fn spawn_command_reader() -> UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new().name("stdin-commands".into()).spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
        // dropping tx closes the command channel
    });
    if let Err(e) = spawned {
        warn!("No command input: {}", e);
    }
    rx
}

/// CLI shortcuts persist settings before the clock starts
fn apply_cli_settings(cli: &Cli, store: &mut dyn SettingsStore) {
    if cli.position.is_none() && cli.background.is_none() {
        return;
    }
    let mut settings = DisplaySettings::load(&*store);
    if let Some(position) = cli.position {
        settings.clock_position = position;
    }
    if let Some(color) = cli.background {
        settings.background = color.to_rgb();
    }
    match settings.save(store) {
        Ok(()) => info!("Saved display settings: {}", settings),
        Err(e) => error!("Failed to save display settings: {}", e),
    }
}

fn open_store(config: &Config) -> YamlSettingsStore {
    let path = config
        .settings_path
        .clone()
        .unwrap_or_else(YamlSettingsStore::default_path);
    info!("Settings file {}", path.display());
    YamlSettingsStore::open(path)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (config, cli) = config::load().context("loading configuration")?;

    if cli.dump_config {
        println!("{}", config::dump(&config)?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This {} keeps the night quiet", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let mut store = open_store(&config);
    apply_cli_settings(&cli, &mut store);

    let surface = SurfaceFactory::create_from_config(&config.surface())
        .context("creating display surface")?;

    let (session, ticks) = ClockSession::start(surface, ClockScheduler::system(), Box::new(store))
        .context("starting clock")?;
    let commands = spawn_command_reader();

    // the session is shut down on return and again on drop, covering unwinds
    let session = app::run(session, ticks, commands, shutdown_signal()).await;
    drop(session);

    info!("Goodbye");
    Ok(())
}
