//! User preferences persisted across restarts.
//!
//! The persisted subset is `{ theme, settings, last_updated }` under a fixed
//! storage key; the in-session `history` trail never round-trips. Settings
//! are an open, ordered string→bool map with runtime key validation:
//! toggling a key that was never added is rejected silently, adding a key
//! twice only refreshes the timestamp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lode_core::persist::{PersistOptions, Storage, persisted};
use lode_core::Store;

use crate::clock::now_ms;

pub const STORAGE_KEY: &str = "app-storage";
pub const STORAGE_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The persisted subset of [`SettingsState`], also used as a history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub theme: Theme,
    pub settings: BTreeMap<String, bool>,
    pub last_updated: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsState {
    pub theme: Theme,
    pub settings: BTreeMap<String, bool>,
    pub last_updated: Option<u64>,
    /// One entry per successful mutation, session-only.
    pub history: Vec<SettingsSnapshot>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            settings: BTreeMap::from([
                ("notifications".to_string(), true),
                ("sounds".to_string(), false),
            ]),
            last_updated: None,
            history: Vec::new(),
        }
    }
}

fn snapshot_of(s: &SettingsState) -> SettingsSnapshot {
    SettingsSnapshot {
        theme: s.theme,
        settings: s.settings.clone(),
        last_updated: s.last_updated,
    }
}

fn touch(s: &mut SettingsState) {
    s.last_updated = Some(now_ms());
    let snapshot = snapshot_of(s);
    s.history.push(snapshot);
}

#[derive(Clone)]
pub struct SettingsStore(Store<SettingsState>);

impl SettingsStore {
    /// Restores the persisted subset from `storage` (falling back to the
    /// defaults on a corrupt or stale record), then writes back after every
    /// update that changes a persisted field.
    pub fn new(storage: impl Storage + 'static) -> Self {
        let store = persisted(
            Store::new(SettingsState::default()).logged("settings"),
            storage,
            PersistOptions {
                key: STORAGE_KEY,
                version: STORAGE_VERSION,
            },
            snapshot_of,
            |s, r: SettingsSnapshot| {
                s.theme = r.theme;
                s.settings = r.settings;
                s.last_updated = r.last_updated;
            },
        );
        Self(store)
    }

    pub fn toggle_theme(&self) {
        self.0.produce(|s| {
            s.theme = s.theme.flipped();
            touch(s);
        });
    }

    /// Unknown keys are rejected silently; this is policy, not an error.
    pub fn toggle_setting(&self, key: &str) {
        self.0.produce(|s| {
            if let Some(value) = s.settings.get_mut(key) {
                *value = !*value;
                touch(s);
            }
        });
    }

    /// New settings start off. Adding an existing key changes nothing except
    /// the timestamp.
    pub fn add_setting(&self, name: &str) {
        self.0.produce(|s| {
            if s.settings.contains_key(name) {
                s.last_updated = Some(now_ms());
            } else {
                s.settings.insert(name.to_string(), false);
                touch(s);
            }
        });
    }

    /// Everything except the history trail.
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.0.select(snapshot_of)
    }

    pub fn state(&self) -> SettingsState {
        self.0.get()
    }

    pub fn store(&self) -> &Store<SettingsState> {
        &self.0
    }
}
