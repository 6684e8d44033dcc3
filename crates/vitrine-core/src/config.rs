//! Editor configuration.

use crate::canvas::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::clipboard::DEFAULT_PASTE_OFFSET;
use crate::shapes::{DEFAULT_FONT_FAMILY, SerializableColor, Text};
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Style applied to newly placed objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleDefaults {
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    pub text_fill: SerializableColor,
    pub font_family: String,
    pub font_size: f64,
    /// Content of a freshly placed text object.
    pub placeholder_text: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            fill: Some(SerializableColor::new(204, 204, 204, 255)),
            stroke: Some(SerializableColor::black()),
            stroke_width: 2.0,
            text_fill: SerializableColor::black(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: Text::DEFAULT_FONT_SIZE,
            placeholder_text: "Text".to_string(),
        }
    }
}

/// Tunables for an editing session. Every field has a default, so a partial
/// JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Size of a blank document.
    pub default_width: f64,
    pub default_height: f64,
    /// Opacity multiplier for the placement preview.
    pub ghost_opacity: f64,
    pub paste_offset: Vec2,
    pub duplicate_offset: Vec2,
    /// Cap on history entries, including the base. `None` keeps every step.
    pub history_limit: Option<usize>,
    /// Size given to a newly placed video.
    pub video_size: Size,
    /// Largest size a newly placed image is shown at.
    pub max_image_size: Size,
    /// Pointer hit tolerance in document units.
    pub hit_tolerance: f64,
    pub style: StyleDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            ghost_opacity: 0.5,
            paste_offset: DEFAULT_PASTE_OFFSET,
            duplicate_offset: DEFAULT_PASTE_OFFSET,
            history_limit: None,
            video_size: Size::new(320.0, 180.0),
            max_image_size: Size::new(600.0, 400.0),
            hit_tolerance: 4.0,
            style: StyleDefaults::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
