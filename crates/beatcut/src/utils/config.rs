//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.beatcut.toml`.

use beatcut_engine::EffectControls;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_MEDIA_DIR: &str = "media";

const CONFIG_TEMPLATE: &str = r#"# beatcut configuration file

# Directory scanned for media segments (default: ./media)
# media_dir = "media"

# Timeout in seconds when switching audio devices (default: 3)
# device_timeout_secs = 3

# Last selected audio device (auto-saved)
# last_device = "Device Name"
# last_device_is_input = false

# =============================================================================
# Effect controls (0.0 - 1.0, auto-saved on quit)
# =============================================================================

# How hard a beat must hit before a segment cut is considered
# cut_sensitivity = 0.5

# How quickly cuts may re-trigger (0 = once per second, 1 = ten per second)
# cut_frequency = 0.5

# How loud a frame must be before the zoom pulses
# scale_sensitivity = 0.5

# How quickly zoom pulses may re-trigger, and how fast they relax
# scale_frequency = 0.5
"#;

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    pub last_device: Option<String>,
    pub last_device_is_input: Option<bool>,
    pub device_timeout_secs: Option<u64>,
    pub media_dir: Option<String>,

    // Effect controls
    pub cut_sensitivity: Option<f32>,
    pub cut_frequency: Option<f32>,
    pub scale_sensitivity: Option<f32>,
    pub scale_frequency: Option<f32>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".beatcut.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            let _ = fs::write(&path, CONFIG_TEMPLATE);
            println!("Created config template at {:?}", path);
        }

        fs::read_to_string(&path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Ok(content) = toml::to_string(self) {
                let _ = fs::write(&path, &content);
                println!("Config saved to {:?}", path);
            }
        }
    }

    pub fn device_timeout_secs(&self) -> u64 {
        self.device_timeout_secs
            .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS)
    }

    pub fn media_dir(&self) -> PathBuf {
        PathBuf::from(self.media_dir.as_deref().unwrap_or(DEFAULT_MEDIA_DIR))
    }

    pub fn set_device(&mut self, name: &str, is_input: bool) {
        self.last_device = Some(name.to_string());
        self.last_device_is_input = Some(is_input);
        self.save();
    }

    /// Initial effect controls, falling back to the engine defaults.
    pub fn controls(&self) -> EffectControls {
        let defaults = EffectControls::default();
        EffectControls {
            cut_sensitivity: self.cut_sensitivity.unwrap_or(defaults.cut_sensitivity),
            cut_frequency: self.cut_frequency.unwrap_or(defaults.cut_frequency),
            scale_sensitivity: self.scale_sensitivity.unwrap_or(defaults.scale_sensitivity),
            scale_frequency: self.scale_frequency.unwrap_or(defaults.scale_frequency),
        }
        .clamped()
    }

    /// Persist the current effect controls.
    pub fn set_controls(&mut self, controls: EffectControls) {
        self.cut_sensitivity = Some(controls.cut_sensitivity);
        self.cut_frequency = Some(controls.cut_frequency);
        self.scale_sensitivity = Some(controls.scale_sensitivity);
        self.scale_frequency = Some(controls.scale_frequency);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_controls_fall_back_to_defaults() {
        let config = Config::default();
        assert_eq!(config.controls(), EffectControls::default());
    }

    #[test]
    fn stored_controls_are_clamped() {
        let config = Config {
            cut_sensitivity: Some(3.0),
            scale_frequency: Some(-1.0),
            ..Config::default()
        };
        let controls = config.controls();
        assert_eq!(controls.cut_sensitivity, 1.0);
        assert_eq!(controls.scale_frequency, 0.0);
        assert_eq!(controls.cut_frequency, 0.5);
    }
}
