/*
 *  settings/store.rs
 *
 *  nightclock - a quiet clock for the nightstand
 *  (c) 2025-26 Stuart Hunter
 *
 *  Key/value settings store abstraction
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

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::settings::SettingsError;

/// A stored value; the YAML form is a plain scalar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    Text(String),
}

/// Typed key/value persistence.
///
/// Reads never fail: a missing key or a value of the wrong type yields
/// `default`. Writes are staged until `commit`.
pub trait SettingsStore: Send {
    fn get_string(&self, key: &str, default: &str) -> String;
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_string(&mut self, key: &str, value: &str);
    fn set_int(&mut self, key: &str, value: i64);
    fn commit(&mut self) -> Result<(), SettingsError>;
}

/// Typed lookup shared by the map-backed stores
pub(crate) fn string_from(map: &BTreeMap<String, SettingValue>, key: &str, default: &str) -> String {
    match map.get(key) {
        Some(SettingValue::Text(s)) => s.clone(),
        Some(other) => {
            warn!("Setting '{}' is {:?}, expected text; using '{}'", key, other, default);
            default.to_string()
        }
        None => default.to_string(),
    }
}

pub(crate) fn int_from(map: &BTreeMap<String, SettingValue>, key: &str, default: i64) -> i64 {
    match map.get(key) {
        Some(SettingValue::Int(v)) => *v,
        Some(other) => {
            warn!("Setting '{}' is {:?}, expected an integer; using {}", key, other, default);
            default
        }
        None => default,
    }
}

/// Store that lives and dies with the process
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: BTreeMap<String, SettingValue>,
    pending: BTreeMap<String, SettingValue>,
    commits: usize,
    fail_commit: bool,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful commits
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Make every following commit fail (for error testing)
    pub fn fail_commits(&mut self, fail: bool) {
        self.fail_commit = fail;
    }
}

impl SettingsStore for MemorySettingsStore {
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
        if self.fail_commit {
            return Err(SettingsError::Rejected("simulated commit failure".to_string()));
        }
        self.values.append(&mut self.pending);
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{KEY_BACKGROUND_COLOR, KEY_TIME_POSITION};

    #[test]
    fn test_set_commit_get() {
        let mut store = MemorySettingsStore::new();
        store.set_int(KEY_BACKGROUND_COLOR, 0x001122);
        assert_eq!(store.get_int(KEY_BACKGROUND_COLOR, 0), 0, "uncommitted writes are staged");
        store.commit().unwrap();
        assert_eq!(store.get_int(KEY_BACKGROUND_COLOR, 0), 0x001122);
    }

    #[test]
    fn test_wrong_type_falls_back() {
        let mut store = MemorySettingsStore::new();
        store.set_int(KEY_TIME_POSITION, 7);
        store.set_string(KEY_BACKGROUND_COLOR, "blue");
        store.commit().unwrap();
        assert_eq!(store.get_string(KEY_TIME_POSITION, "left"), "left");
        assert_eq!(store.get_int(KEY_BACKGROUND_COLOR, 0), 0);
    }

    #[test]
    fn test_failed_commit_keeps_old_values() {
        let mut store = MemorySettingsStore::new();
        store.set_string(KEY_TIME_POSITION, "left");
        store.commit().unwrap();
        store.fail_commits(true);
        store.set_string(KEY_TIME_POSITION, "right");
        assert!(store.commit().is_err());
        assert_eq!(store.get_string(KEY_TIME_POSITION, "?"), "left");
        assert_eq!(store.commits(), 1);
    }
}
