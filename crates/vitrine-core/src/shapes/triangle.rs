//! Isosceles triangle object with the apex at the top edge.

use super::color::optional_paint;
use super::rectangle::{default_side, default_stroke, default_stroke_width};
use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triangle {
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
}

impl Triangle {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fill: None,
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl ShapeTrait for Triangle {
    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn outline(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((self.width / 2.0, 0.0));
        path.line_to((self.width, self.height));
        path.line_to((0.0, self.height));
        path.close_path();
        path
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        }
    }
}
