//! Image object referencing an uploaded or inline raster.

use super::color::optional_paint;
use super::rectangle::{clamp_radius, rounded_outline};
use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};

/// An image drawn into a `width` x `height` box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Source reference: an uploaded URL or a `data:` URL.
    #[serde(default, rename = "src")]
    pub source_ref: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Optional border.
    #[serde(default, with = "optional_paint")]
    pub stroke: Option<SerializableColor>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub corner_radius: f64,
}

impl Image {
    pub fn new(source_ref: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            source_ref: source_ref.into(),
            width,
            height,
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        }
    }

    /// Scale the image to fit within max dimensions while preserving aspect ratio.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        if self.width <= 0.0 || self.height <= 0.0 {
            return self;
        }
        if self.width <= max_width && self.height <= max_height {
            return self;
        }
        let aspect = self.width / self.height;
        let target_aspect = max_width / max_height;

        if aspect > target_aspect {
            self.width = max_width;
            self.height = max_width / aspect;
        } else {
            self.height = max_height;
            self.width = max_height * aspect;
        }
        self
    }

    pub fn effective_radius(&self) -> f64 {
        clamp_radius(self.corner_radius, self.width, self.height)
    }
}

impl ShapeTrait for Image {
    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn outline(&self) -> BezPath {
        rounded_outline(self.width, self.height, self.effective_radius())
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: None,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        }
    }
}
