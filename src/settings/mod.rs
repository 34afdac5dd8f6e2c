/*
 *  settings/mod.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Persistent display settings
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

pub mod dialog;
pub mod display_settings;
pub mod store;
pub mod yaml;

use thiserror::Error;

pub use dialog::SettingsDialog;
pub use display_settings::{ClockPosition, DisplaySettings};
pub use store::{MemorySettingsStore, SettingValue, SettingsStore};
pub use yaml::YamlSettingsStore;

/// Failures persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("settings store rejected commit: {0}")]
    Rejected(String),
}
