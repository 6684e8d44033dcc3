//! Open paths: polylines, quadratic curves and arrows.

use super::color::optional_paint;
use super::{Paint, SerializableColor, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Angle between the shaft and each barb of an arrow head.
const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// How the point sequence is joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCurve {
    /// Straight segments between consecutive points.
    #[default]
    Polyline,
    /// Quadratic segments: start, then (control, end) pairs.
    Quadratic,
}

/// An open path in object-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub curve: PathCurve,
    /// Draw an arrow head at the last point.
    #[serde(default)]
    pub arrow_head: bool,
    #[serde(default = "default_stroke", with = "optional_paint")]
    pub stroke: Option<SerializableColor>,
    #[serde(default = "default_path_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke() -> Option<SerializableColor> {
    Some(SerializableColor::black())
}

pub(super) fn default_path_stroke_width() -> f64 {
    2.0
}

impl Path {
    /// Straight polyline through `points`.
    pub fn polyline(points: Vec<Point>) -> Self {
        Self {
            points,
            curve: PathCurve::Polyline,
            arrow_head: false,
            stroke: default_stroke(),
            stroke_width: default_path_stroke_width(),
        }
    }

    /// Quadratic curve from `start` to `end` bent towards `control`.
    pub fn curve(start: Point, control: Point, end: Point) -> Self {
        Self {
            curve: PathCurve::Quadratic,
            ..Self::polyline(vec![start, control, end])
        }
    }

    /// Straight arrow from `start` to `end`.
    pub fn arrow(start: Point, end: Point) -> Self {
        Self {
            arrow_head: true,
            ..Self::polyline(vec![start, end])
        }
    }

    /// Length of each arrow barb.
    pub fn arrow_head_length(&self) -> f64 {
        (self.stroke_width * 4.0).max(10.0)
    }

    fn shaft(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((first, rest)) = self.points.split_first() else {
            return path;
        };
        path.move_to(*first);
        match self.curve {
            PathCurve::Polyline => {
                for p in rest {
                    path.line_to(*p);
                }
            }
            PathCurve::Quadratic => {
                let mut pairs = rest.chunks_exact(2);
                for pair in pairs.by_ref() {
                    path.quad_to(pair[0], pair[1]);
                }
                // A trailing point without a control is joined straight.
                for p in pairs.remainder() {
                    path.line_to(*p);
                }
            }
        }
        path
    }

    /// Direction the path travels as it reaches its last point.
    fn end_direction(&self) -> Option<Vec2> {
        let end = *self.points.last()?;
        self.points
            .iter()
            .rev()
            .skip(1)
            .map(|p| end - *p)
            .find(|d| d.hypot2() > f64::EPSILON)
            .map(|d| d.normalize())
    }
}

impl ShapeTrait for Path {
    fn local_bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        self.outline().bounding_box()
    }

    fn outline(&self) -> BezPath {
        let mut path = self.shaft();
        if self.arrow_head {
            if let (Some(end), Some(dir)) = (self.points.last().copied(), self.end_direction()) {
                let back = -dir * self.arrow_head_length();
                for angle in [ARROW_HEAD_ANGLE, -ARROW_HEAD_ANGLE] {
                    let barb = kurbo::Affine::rotate(angle) * back.to_point();
                    path.move_to(end);
                    path.line_to(end + barb.to_vec2());
                }
            }
        }
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
