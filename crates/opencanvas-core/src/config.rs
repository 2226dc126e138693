//! Editor configuration.

use crate::shapes::SerializableColor;
use kurbo::Size;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest canvas width or height, in pixels.
pub const MAX_CANVAS_DIMENSION: f64 = 16_384.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Canvas size must be positive, got {0}x{1}")]
    InvalidSize(f64, f64),
    #[error("Canvas size must be at most 16384 per side, got {0}x{1}")]
    TooLarge(f64, f64),
}

/// Canvas defaults the editor starts from and returns to on clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Background color, as a CSS hex string in JSON.
    #[serde(serialize_with = "color_to_hex", deserialize_with = "color_from_hex")]
    pub background: SerializableColor,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: SerializableColor::white(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes the editor cannot render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_canvas_size(self.width, self.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Check a canvas size: both sides finite, positive and at most
/// [`MAX_CANVAS_DIMENSION`].
pub fn validate_canvas_size(width: f64, height: f64) -> Result<(), ConfigError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !(positive(width) && positive(height)) {
        return Err(ConfigError::InvalidSize(width, height));
    }
    if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
        return Err(ConfigError::TooLarge(width, height));
    }
    Ok(())
}

fn color_to_hex<S: Serializer>(color: &SerializableColor, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&color.to_hex())
}

fn color_from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SerializableColor, D::Error> {
    let raw = String::deserialize(deserializer)?;
    SerializableColor::from_hex(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {raw}")))
}
