//! Game settings and preferences
//!
//! Persisted as JSON next to the executable on native; defaults on any load
//! error so a corrupt file can never block startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::ControlScheme;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// How many desert decor props the arena scatters
    pub fn prop_budget(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 115,
            QualityPreset::High => 155,
        }
    }

    /// Trail raster edge length in pixels
    pub fn trail_resolution(&self) -> usize {
        match self {
            QualityPreset::Low => 256,
            QualityPreset::Medium => 512,
            QualityPreset::High => 512,
        }
    }

    /// Whether the renderer should draw shadow maps
    pub fn shadows_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Show FPS counter
    pub show_fps: bool,
    /// Player 1 key bindings
    pub player1: ControlScheme,
    /// Player 2 key bindings
    pub player2: ControlScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_fps: true,
            player1: ControlScheme::wasd(),
            player2: ControlScheme::arrows(),
        }
    }
}

impl Settings {
    /// Load from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Bad settings file {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings file; using defaults");
                Self::default()
            }
        }
    }

    /// Save as pretty JSON; failure is logged, not fatal
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {err}", path.display());
                }
            }
            Err(err) => log::warn!("Could not serialize settings: {err}"),
        }
    }
}
