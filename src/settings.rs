//! Player preferences
//!
//! Persisted separately from the high score as a small JSON object.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistError, Store};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fire continuously without holding the button
    pub auto_fire: bool,
    /// Whether SlowShot power-ups can spawn
    pub slow_shot_enabled: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_fire: false,
            slow_shot_enabled: true,
            volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "dodge_blast_settings";

    pub fn toggle_auto_fire(&mut self) -> bool {
        self.auto_fire = !self.auto_fire;
        self.auto_fire
    }

    pub fn toggle_slow_shot(&mut self) -> bool {
        self.slow_shot_enabled = !self.slow_shot_enabled;
        self.slow_shot_enabled
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Set the volume, clamped to 0.0 - 1.0. Non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Load settings, using defaults when missing or malformed
    pub fn load(store: &impl Store) -> Self {
        let text = match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl Store) {
        let result = serde_json::to_string(self)
            .map_err(PersistError::from)
            .and_then(|json| store.set_item(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.auto_fire);
        assert!(settings.slow_shot_enabled);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.toggle_auto_fire();
        settings.toggle_slow_shot();
        settings.toggle_muted();
        settings.set_volume(0.25);
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut settings = Settings::default();
        settings.set_volume(1.5);
        assert_eq!(settings.volume, 1.0);
        settings.set_volume(-0.2);
        assert_eq!(settings.volume, 0.0);
        settings.set_volume(f32::NAN);
        assert_eq!(settings.volume, 0.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set_item("dodge_blast_settings", r#"{"auto_fire":true}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert!(settings.auto_fire);
        assert!(settings.slow_shot_enabled);
        assert_eq!(settings.volume, 0.8);
        assert!(!settings.muted);
    }

    #[test]
    fn test_malformed_json_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set_item("dodge_blast_settings", "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
