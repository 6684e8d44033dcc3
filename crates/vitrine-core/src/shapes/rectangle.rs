//! Rectangle object, optionally hosting an embedded video.

use super::color::optional_paint;
use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(default = "default_side")]
    pub width: f64,
    #[serde(default = "default_side")]
    pub height: f64,
    #[serde(default, with = "optional_paint")]
    pub fill: Option<SerializableColor>,
    #[serde(default = "default_stroke", with = "optional_paint")]
    pub stroke: Option<SerializableColor>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    /// Reference to a video played inside the rectangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

pub(super) fn default_side() -> f64 {
    100.0
}

pub(super) fn default_stroke() -> Option<SerializableColor> {
    Some(SerializableColor::black())
}

pub(super) fn default_stroke_width() -> f64 {
    1.0
}

impl Rectangle {
    /// Create a rectangle with the default outline.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fill: None,
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
            corner_radius: 0.0,
            video: None,
        }
    }

    /// Create a borderless rectangle that plays `video`.
    pub fn video(width: f64, height: f64, video: impl Into<String>) -> Self {
        Self {
            stroke: None,
            stroke_width: 0.0,
            video: Some(video.into()),
            ..Self::new(width, height)
        }
    }

    pub fn is_video(&self) -> bool {
        self.video.is_some()
    }

    /// Corner radius clamped so opposite corners never overlap.
    pub fn effective_radius(&self) -> f64 {
        clamp_radius(self.corner_radius, self.width, self.height)
    }
}

pub(super) fn clamp_radius(radius: f64, width: f64, height: f64) -> f64 {
    radius.max(0.0).min(width.abs() / 2.0).min(height.abs() / 2.0)
}

pub(super) fn rounded_outline(width: f64, height: f64, radius: f64) -> BezPath {
    let rect = Rect::new(0.0, 0.0, width, height);
    if radius > 0.0 {
        RoundedRect::from_rect(rect, radius).to_path(0.1)
    } else {
        rect.to_path(0.1)
    }
}

impl ShapeTrait for Rectangle {
    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn outline(&self) -> BezPath {
        rounded_outline(self.width, self.height, self.effective_radius())
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        }
    }
}
