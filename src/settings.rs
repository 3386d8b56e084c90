//! Wheel settings
//!
//! Persisted as JSON: a file on native, LocalStorage in the browser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Smallest surface the chrome still fits on
pub const MIN_SIZE: u32 = 64;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wheel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSettings {
    /// Rendering surface size in pixels (square)
    pub size: u32,

    // === Spin ===
    /// Shortest spin (ms, inclusive)
    pub min_duration_ms: f64,
    /// Longest spin (ms, exclusive)
    pub max_duration_ms: f64,
    /// Full revolutions before the final offset
    pub full_turns: u32,

    // === Reward icons ===
    /// Directory holding `<label>.<ext>` icons for numeric labels
    pub asset_dir: String,
    /// Icon file extension
    pub asset_extension: String,
    /// Load icons at all
    pub icons: bool,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,

            min_duration_ms: MIN_SPIN_DURATION_MS,
            max_duration_ms: MAX_SPIN_DURATION_MS,
            full_turns: FULL_TURNS,

            asset_dir: "diamonds".to_string(),
            asset_extension: "webp".to_string(),
            icons: true,
        }
    }
}

impl WheelSettings {
    /// Clamp out-of-range values instead of rejecting the whole file
    pub fn validated(mut self) -> Self {
        if self.size < MIN_SIZE {
            log::warn!("Wheel size {} too small, using {}", self.size, MIN_SIZE);
            self.size = MIN_SIZE;
        }
        if !self.min_duration_ms.is_finite() || self.min_duration_ms < 0.0 {
            self.min_duration_ms = MIN_SPIN_DURATION_MS;
        }
        if !self.max_duration_ms.is_finite() || self.max_duration_ms < self.min_duration_ms {
            self.max_duration_ms = self.min_duration_ms;
        }
        self.full_turns = self.full_turns.max(1);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "spin_wheel_settings";

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
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: settings come from an optional file instead
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
