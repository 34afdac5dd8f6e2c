/*
 *  settings/yaml.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  File-backed settings store
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

use dirs_next::config_dir;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::settings::store::{int_from, string_from, SettingValue, SettingsStore};
use crate::settings::SettingsError;

/// Flat YAML map of keys to scalars, e.g.
///
/// ```yaml
/// background_color: 4386
/// time_position: right
/// ```
#[derive(Debug, Clone)]
pub struct YamlSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, SettingValue>,
    pending: BTreeMap<String, SettingValue>,
}

impl YamlSettingsStore {
    /// Open `path`; a missing or unreadable file starts an empty store
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_yaml::from_str::<Option<BTreeMap<String, SettingValue>>>(&raw) {
                Ok(map) => map.unwrap_or_default(),
                Err(e) => {
                    warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Cannot read settings {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values, pending: BTreeMap::new() }
    }

    /// `~/.config/nightclock/settings.yaml`, or the working directory
    pub fn default_path() -> PathBuf {
        config_dir()
            .map(|dir| dir.join("nightclock").join("settings.yaml"))
            .unwrap_or_else(|| PathBuf::from("nightclock-settings.yaml"))
    }
}

impl SettingsStore for YamlSettingsStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        string_from(&self.values, key, default)
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        int_from(&self.values, key, default)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.pending.insert(key.to_string(), SettingValue::Text(value.to_string()));
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.pending.insert(key.to_string(), SettingValue::Int(value));
    }

    fn commit(&mut self) -> Result<(), SettingsError> {
        let mut merged = self.values.clone();
        merged.extend(self.pending.iter().map(|(k, v)| (k.clone(), v.clone())));
        let yaml = serde_yaml::to_string(&merged)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, &self.path)?;

        self.values = merged;
        self.pending.clear();
        info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}
