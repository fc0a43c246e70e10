//! Game settings and preferences
//!
//! Persisted in LocalStorage. Only preferences and tuning are stored here,
//! never round state.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game balance
    pub tuning: Tuning,

    // === Display ===
    /// Dashed lines between the three lanes
    pub show_lane_guides: bool,
    /// "Press Space or Enter to play again" line on the game over overlay
    pub show_restart_hint: bool,

    // === Input ===
    /// Start in idle/demo mode (autopilot steers the basket)
    pub idle_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            show_lane_guides: true,
            show_restart_hint: true,
            idle_mode: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruit_catch_settings";

    /// Parse settings JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_nested_tuning_is_sanitized() {
        let json = r#"{ "show_lane_guides": false, "tuning": { "points_per_level": 0 } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert!(!settings.show_lane_guides);
        assert!(settings.show_restart_hint);
        assert_eq!(settings.tuning.points_per_level, 1);
        assert_eq!(settings.tuning.round_seconds, 60);
    }

    #[test]
    fn test_json_round_trip_preserves_changes() {
        let mut settings = Settings::default();
        settings.idle_mode = true;
        settings.tuning.round_seconds = 90;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
