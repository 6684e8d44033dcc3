//! Circle object.

use super::color::optional_paint;
use super::rectangle::{default_stroke, default_stroke_width};
use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Circle as KurboCircle, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle whose bounding box starts at the object origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default, with = "optional_paint")]
    pub fill: Option<SerializableColor>,
    #[serde(default = "default_stroke", with = "optional_paint")]
    pub stroke: Option<SerializableColor>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_radius() -> f64 {
    50.0
}

impl Circle {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            fill: None,
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl ShapeTrait for Circle {
    fn local_bounds(&self) -> Rect {
        let d = self.radius * 2.0;
        Rect::new(0.0, 0.0, d, d)
    }

    fn outline(&self) -> BezPath {
        KurboCircle::new((self.radius, self.radius), self.radius.abs()).to_path(0.1)
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        }
    }
}
