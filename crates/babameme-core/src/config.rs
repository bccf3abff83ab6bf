//! Editor configuration.

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};

/// Viewport width (CSS px) at or below which the compact layout is used.
pub const DEFAULT_COMPACT_BREAKPOINT: f64 = 768.0;

/// Settings for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Image source the surface draws for every sticker.
    pub mascot_url: String,
    /// Viewport width at or below which the compact layout is used.
    pub compact_breakpoint: f64,
    /// Start the session with one sticker already placed.
    pub initial_sticker: bool,
    /// File name offered for downloaded memes.
    pub export_file_name: String,
    /// Device pixel ratio used when rasterizing an export.
    pub export_pixel_ratio: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mascot_url: "https://i.imgur.com/ZvW1pC3.png".to_string(),
            compact_breakpoint: DEFAULT_COMPACT_BREAKPOINT,
            initial_sticker: true,
            export_file_name: "baba-meme.png".to_string(),
            export_pixel_ratio: 2.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check values a session cannot work with.
    pub fn validate(&self) -> EditorResult<()> {
        if self.compact_breakpoint.is_nan() || self.compact_breakpoint < 0.0 {
            return Err(EditorError::Config(format!(
                "compact_breakpoint must be non-negative, got {}",
                self.compact_breakpoint
            )));
        }
        if self.export_pixel_ratio.is_nan() || self.export_pixel_ratio <= 0.0 {
            return Err(EditorError::Config(format!(
                "export_pixel_ratio must be positive, got {}",
                self.export_pixel_ratio
            )));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(EditorError::Config("export_file_name is empty".to_string()));
        }
        Ok(())
    }
}
