//! Board configuration.

use crate::color::RgbColor;
use crate::tools::ToolConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Unknown tool: {0:?}")]
    UnknownTool(String),
    #[error("Stroke width {0} is outside 1-50")]
    StrokeWidthOutOfRange(f64),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(String),
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Color of a blank surface; also what the eraser paints.
    pub background_color: RgbColor,
    /// Maximum number of history entries (`None` = unbounded).
    pub history_limit: Option<usize>,
    /// Multiply stroke widths by the device pixel ratio so lines keep their
    /// layout thickness on dense displays.
    pub scale_stroke_width: bool,
    /// Tool configuration in effect when the board is created.
    pub default_tool: ToolConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            background_color: RgbColor::WHITE,
            history_limit: None,
            scale_stroke_width: true,
            default_tool: ToolConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded board configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_tool.validate()
    }
}
