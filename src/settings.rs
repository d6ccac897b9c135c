//! Display settings and preferences
//!
//! Nothing here affects gameplay; it only decides how the frame is drawn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FOV, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::ConfigError;

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Screen pixels per ray column
    pub fn column_width(&self) -> u32 {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 2,
            QualityPreset::High => 1,
        }
    }

    /// Grain dots per 10k screen pixels
    pub fn grain_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 8.0,
            QualityPreset::High => 16.0,
        }
    }
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Render field of view (radians)
    pub fov: f32,
    pub quality: QualityPreset,

    // === Post-process ===
    pub vignette: bool,
    pub grain: bool,
    /// Seed for the grain overlay (kept apart from the gameplay RNG)
    pub grain_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fov: FOV,
            quality: QualityPreset::Medium,
            vignette: true,
            grain: true,
            grain_seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the cosmetic passes entirely
        if preset == QualityPreset::Low {
            self.vignette = false;
            self.grain = false;
        }
    }

    /// Number of ray columns for the current screen width and preset
    pub fn num_rays(&self) -> usize {
        (self.screen_width / self.quality.column_width()).max(1) as usize
    }

    /// Effective grain dot count for one frame
    pub fn grain_dots(&self) -> usize {
        if !self.grain {
            return 0;
        }
        let pixels = (self.screen_width * self.screen_height) as f32;
        (pixels / 10_000.0 * self.quality.grain_density()) as usize
    }

    /// Distance from the eye to the projection plane, in pixels
    pub fn projection_distance(&self) -> f32 {
        (self.screen_width as f32 / 2.0) / (self.fov / 2.0).tan()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::InvalidSettings(
                "screen dimensions must be non-zero".to_string(),
            ));
        }
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(ConfigError::InvalidSettings(format!(
                "fov must be in (0, π), got {}",
                self.fov
            )));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }
}
