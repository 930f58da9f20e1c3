//! Player preferences
//!
//! Persisted in LocalStorage on the web; defaults everywhere else.

use serde::{Deserialize, Serialize};

use crate::input::{ControlMode, Controls, HEAD_SENSITIVITY};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Control mode selected on startup
    pub control_mode: ControlMode,
    /// Turn gain for head steering
    pub head_sensitivity: f32,
    /// Show on-screen turn/boost/ghost/pause buttons
    pub touch_controls: bool,
    /// Pause automatically when the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Keyboard,
            head_sensitivity: HEAD_SENSITIVITY,
            touch_controls: true,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ghost_serpent_settings";

    /// Head sensitivity kept in a sane range
    pub fn effective_head_sensitivity(&self) -> f32 {
        if self.head_sensitivity.is_finite() {
            self.head_sensitivity.clamp(0.2, 3.0)
        } else {
            HEAD_SENSITIVITY
        }
    }

    /// Build controls configured by these settings
    pub fn controls(&self) -> Controls {
        let mut controls = Controls::new(self.control_mode);
        controls.head_sensitivity = self.effective_head_sensitivity();
        controls
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
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
