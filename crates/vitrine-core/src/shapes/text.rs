//! Text object.

use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Font family used when a document does not name one.
pub const DEFAULT_FONT_FAMILY: &str = "Times New Roman";

/// Approximate advance of one glyph as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.16;

/// A block of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    /// The text content; `\n` separates lines.
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "SerializableColor::black")]
    pub fill: SerializableColor,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    Text::DEFAULT_FONT_SIZE
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 40.0;

    /// Create a text object with default font settings.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: default_font_family(),
            font_size: Self::DEFAULT_FONT_SIZE,
            fill: SerializableColor::black(),
        }
    }

    /// Lines of text in display order. Always yields at least one line.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Height of one line in local units.
    pub fn line_advance(&self) -> f64 {
        self.font_size * LINE_HEIGHT
    }
}

impl ShapeTrait for Text {
    fn local_bounds(&self) -> Rect {
        let lines = self.lines();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f64 * self.font_size * CHAR_WIDTH_FACTOR;
        let height = lines.len() as f64 * self.line_advance();
        Rect::new(0.0, 0.0, width, height)
    }

    fn outline(&self) -> BezPath {
        self.local_bounds().to_path(0.1)
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: Some(self.fill),
            stroke: None,
            stroke_width: 0.0,
        }
    }
}
