//! Straight line object.

use super::color::optional_paint;
use super::path::default_path_stroke_width;
use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Line as KurboLine, Point, Rect};
use serde::{Deserialize, Serialize};

/// A line from the object origin to `(x2, y2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(default)]
    pub x2: f64,
    #[serde(default)]
    pub y2: f64,
    #[serde(default = "default_stroke", with = "optional_paint")]
    pub stroke: Option<SerializableColor>,
    #[serde(default = "default_path_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke() -> Option<SerializableColor> {
    Some(SerializableColor::black())
}

impl Line {
    /// Create a line ending at `end`, relative to the object origin.
    pub fn to(end: Point) -> Self {
        Self {
            x2: end.x,
            y2: end.y,
            stroke: default_stroke(),
            stroke_width: default_path_stroke_width(),
        }
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Unscaled length of the line.
    pub fn length(&self) -> f64 {
        self.as_kurbo().length()
    }

    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(Point::ZERO, self.end())
    }
}

impl ShapeTrait for Line {
    fn local_bounds(&self) -> Rect {
        Rect::from_points(Point::ZERO, self.end())
    }

    fn outline(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(Point::ZERO);
        path.line_to(self.end());
        path
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: None,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        }
    }
}
