//! Player preferences
//!
//! Persisted as JSON under `SETTINGS_KEY`. Missing fields take their
//! defaults so older blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence every cue
    pub muted: bool,

    // === Gameplay ===
    /// Show rotating taunts from the bank
    pub taunts_enabled: bool,
    /// On-screen left/right/shoot buttons
    pub show_touch_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            taunts_enabled: true,
            show_touch_controls: false,
        }
    }
}

impl Settings {
    /// Clamp volumes into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = finite_unit(self.master_volume, 0.8);
        self.sfx_volume = finite_unit(self.sfx_volume, 1.0);
        self
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Discarding corrupt settings: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings store unavailable: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(SETTINGS_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {e}"),
            },
            Err(e) => log::warn!("Settings not serialized: {e}"),
        }
    }
}

fn finite_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            muted: true,
            taunts_enabled: false,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_missing_and_corrupt_fall_back() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        store.set(SETTINGS_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_partial_blob_and_clamping() {
        let mut store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"master_volume": 3.0, "muted": true}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 1.0);
        assert!(settings.muted);
        assert!(settings.taunts_enabled);
    }
}
