//! Canvas object definitions and the geometry shared by editor and renderer.

mod circle;
mod color;
mod image;
mod line;
mod path;
mod rectangle;
mod text;
mod triangle;

pub use circle::Circle;
pub use color::{ColorParseError, SerializableColor};
pub use image::Image;
pub use line::Line;
pub use path::{Path, PathCurve};
pub use rectangle::Rectangle;
pub use text::{CHAR_WIDTH_FACTOR, DEFAULT_FONT_FAMILY, LINE_HEIGHT, Text};
pub use triangle::Triangle;

use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for canvas objects.
pub type ObjectId = Uuid;

/// Fill and stroke of an object as drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
}

impl Paint {
    /// Stroke color when the stroke is actually visible.
    pub fn visible_stroke(&self) -> Option<SerializableColor> {
        self.stroke.filter(|_| self.stroke_width > 0.0)
    }
}

/// Geometry every object variant provides, in object-local coordinates.
pub trait ShapeTrait {
    /// Unscaled, unrotated bounds.
    fn local_bounds(&self) -> Rect;

    /// Outline for drawing and hit testing.
    fn outline(&self) -> BezPath;

    /// Fill and stroke.
    fn paint(&self) -> Paint;
}

/// Looping animation played on the public page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    None,
    Pulse,
    Rotate,
    Bounce,
}

impl Animation {
    pub fn name(&self) -> &'static str {
        match self {
            Animation::None => "none",
            Animation::Pulse => "pulse",
            Animation::Rotate => "rotate",
            Animation::Bounce => "bounce",
        }
    }

    pub fn all() -> &'static [Animation] {
        &[
            Animation::None,
            Animation::Pulse,
            Animation::Rotate,
            Animation::Bounce,
        ]
    }
}

/// Variant-specific part of a canvas object, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(Text),
    Rectangle(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Image(Image),
    Path(Path),
    Line(Line),
}

impl ObjectKind {
    /// Every `type` tag the codec accepts.
    pub const TAGS: &'static [&'static str] = &[
        "text",
        "rectangle",
        "circle",
        "triangle",
        "image",
        "path",
        "line",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::Text(_) => "text",
            ObjectKind::Rectangle(_) => "rectangle",
            ObjectKind::Circle(_) => "circle",
            ObjectKind::Triangle(_) => "triangle",
            ObjectKind::Image(_) => "image",
            ObjectKind::Path(_) => "path",
            ObjectKind::Line(_) => "line",
        }
    }

    fn shape(&self) -> &dyn ShapeTrait {
        match self {
            ObjectKind::Text(s) => s,
            ObjectKind::Rectangle(s) => s,
            ObjectKind::Circle(s) => s,
            ObjectKind::Triangle(s) => s,
            ObjectKind::Image(s) => s,
            ObjectKind::Path(s) => s,
            ObjectKind::Line(s) => s,
        }
    }

    pub fn local_bounds(&self) -> Rect {
        self.shape().local_bounds()
    }

    pub fn outline(&self) -> BezPath {
        self.shape().outline()
    }

    pub fn paint(&self) -> Paint {
        self.shape().paint()
    }

    /// Set the fill. Returns false for variants without a fill.
    pub fn set_fill(&mut self, fill: Option<SerializableColor>) -> bool {
        match self {
            ObjectKind::Text(t) => t.fill = fill.unwrap_or(SerializableColor::transparent()),
            ObjectKind::Rectangle(r) => r.fill = fill,
            ObjectKind::Circle(c) => c.fill = fill,
            ObjectKind::Triangle(t) => t.fill = fill,
            ObjectKind::Image(_) | ObjectKind::Path(_) | ObjectKind::Line(_) => return false,
        }
        true
    }

    /// Set the stroke color. Returns false for variants without a stroke.
    pub fn set_stroke(&mut self, stroke: Option<SerializableColor>) -> bool {
        match self {
            ObjectKind::Text(_) => return false,
            ObjectKind::Rectangle(r) => r.stroke = stroke,
            ObjectKind::Circle(c) => c.stroke = stroke,
            ObjectKind::Triangle(t) => t.stroke = stroke,
            ObjectKind::Image(i) => i.stroke = stroke,
            ObjectKind::Path(p) => p.stroke = stroke,
            ObjectKind::Line(l) => l.stroke = stroke,
        }
        true
    }

    /// Set the stroke width. Returns false for variants without a stroke.
    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        match self {
            ObjectKind::Text(_) => return false,
            ObjectKind::Rectangle(r) => r.stroke_width = width,
            ObjectKind::Circle(c) => c.stroke_width = width,
            ObjectKind::Triangle(t) => t.stroke_width = width,
            ObjectKind::Image(i) => i.stroke_width = width,
            ObjectKind::Path(p) => p.stroke_width = width,
            ObjectKind::Line(l) => l.stroke_width = width,
        }
        true
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Check that every dimension and point is a finite number.
    pub fn is_finite(&self) -> bool {
        match self {
            ObjectKind::Text(t) => t.font_size.is_finite(),
            ObjectKind::Rectangle(r) => {
                all_finite(&[r.width, r.height, r.stroke_width, r.corner_radius])
            }
            ObjectKind::Circle(c) => all_finite(&[c.radius, c.stroke_width]),
            ObjectKind::Triangle(t) => all_finite(&[t.width, t.height, t.stroke_width]),
            ObjectKind::Image(i) => {
                all_finite(&[i.width, i.height, i.stroke_width, i.corner_radius])
            }
            ObjectKind::Path(p) => {
                p.stroke_width.is_finite() && p.points.iter().all(|pt| pt.is_finite())
            }
            ObjectKind::Line(l) => all_finite(&[l.x2, l.y2, l.stroke_width]),
        }
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn one() -> f64 {
    1.0
}

/// One element of a canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    #[serde(default = "Uuid::new_v4")]
    pub id: ObjectId,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Rotation in degrees, clockwise, about the object's center.
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub animation: Animation,
    /// Locked objects cannot be moved, scaled or rotated.
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl CanvasObject {
    /// Create an object at the origin with identity transform.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            opacity: 1.0,
            flip_x: false,
            flip_y: false,
            animation: Animation::None,
            locked: false,
            kind,
        }
    }

    /// Builder: place the object's origin at `point`.
    pub fn at(mut self, point: Point) -> Self {
        self.left = point.x;
        self.top = point.y;
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    /// Give the object a new unique identifier (used for duplicates and pastes).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Declared size, before scaling.
    pub fn base_size(&self) -> Size {
        self.kind.local_bounds().size()
    }

    /// On-screen size: declared size times scale.
    pub fn effective_size(&self) -> Size {
        let base = self.base_size();
        Size::new(base.width * self.scale_x.abs(), base.height * self.scale_y.abs())
    }

    /// Object-local to document transform.
    ///
    /// Scale is applied first, then flip about the center, then rotation about
    /// the center, then translation to `(left, top)`.
    pub fn transform(&self) -> Affine {
        let scale = Affine::scale_non_uniform(self.scale_x, self.scale_y);
        let center = (scale * self.kind.local_bounds().center()).to_vec2();
        let flip = Affine::scale_non_uniform(
            if self.flip_x { -1.0 } else { 1.0 },
            if self.flip_y { -1.0 } else { 1.0 },
        );
        Affine::translate((self.left, self.top))
            * Affine::translate(center)
            * Affine::rotate(self.angle.to_radians())
            * flip
            * Affine::translate(-center)
            * scale
    }

    /// Axis-aligned bounds in document coordinates.
    pub fn world_bounds(&self) -> Rect {
        self.transform().transform_rect_bbox(self.kind.local_bounds())
    }

    /// Check if a document point hits this object.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let affine = self.transform();
        if affine.determinant().abs() < f64::EPSILON {
            return false;
        }
        let local = affine.inverse() * point;
        let scale = self.scale_x.abs().max(self.scale_y.abs()).max(f64::EPSILON);
        let slack = tolerance / scale + self.kind.paint().stroke_width / 2.0;
        self.kind.local_bounds().inflate(slack, slack).contains(local)
    }

    /// Opacity clamped to the drawable range.
    pub fn effective_opacity(&self) -> f64 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Check that the header and the variant hold only finite numbers.
    ///
    /// JSON has no representation for infinities or NaN, so anything else
    /// cannot be persisted.
    pub fn is_finite(&self) -> bool {
        let header = [
            self.left,
            self.top,
            self.scale_x,
            self.scale_y,
            self.angle,
            self.opacity,
        ];
        all_finite(&header) && self.kind.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_at(left: f64, top: f64, w: f64, h: f64) -> CanvasObject {
        CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(w, h))).at(Point::new(left, top))
    }

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_identity_transform_is_translation() {
        let obj = rect_at(100.0, 50.0, 20.0, 10.0);
        let coeffs = obj.transform().as_coeffs();
        assert_eq!(coeffs, [1.0, 0.0, 0.0, 1.0, 100.0, 50.0]);
    }

    #[test]
    fn test_effective_size_uses_scale() {
        let mut obj = rect_at(0.0, 0.0, 100.0, 40.0);
        obj.scale_x = 2.0;
        obj.scale_y = 0.5;
        let size = obj.effective_size();
        assert!((size.width - 200.0).abs() < f64::EPSILON);
        assert!((size.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotation_about_center() {
        let mut obj = rect_at(0.0, 0.0, 100.0, 100.0);
        obj.angle = 90.0;
        let t = obj.transform();
        // Center stays put.
        assert!(approx(t * Point::new(50.0, 50.0), Point::new(50.0, 50.0)));
        // Top-left corner swings to the top-right (clockwise on screen).
        assert!(approx(t * Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_flip_before_rotation() {
        let mut obj = rect_at(0.0, 0.0, 100.0, 50.0);
        obj.flip_x = true;
        let t = obj.transform();
        assert!(approx(t * Point::new(0.0, 0.0), Point::new(100.0, 0.0)));

        obj.angle = 90.0;
        let t = obj.transform();
        // Flip maps (0,0) to (100,0); rotating that about (50,25) gives (75,75).
        assert!(approx(t * Point::new(0.0, 0.0), Point::new(75.0, 75.0)));
    }

    #[test]
    fn test_hit_test_respects_rotation() {
        let mut obj = rect_at(0.0, 0.0, 200.0, 20.0);
        assert!(obj.hit_test(Point::new(190.0, 10.0), 0.0));
        obj.angle = 90.0;
        assert!(!obj.hit_test(Point::new(190.0, 10.0), 0.0));
        assert!(obj.hit_test(Point::new(100.0, 90.0), 0.0));
    }

    #[test]
    fn test_object_json_shape() {
        let obj = CanvasObject::new(ObjectKind::Text(Text::new("Hello"))).at(Point::new(1.0, 2.0));
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["left"], 1.0);
        assert_eq!(json["scaleX"], 1.0);
        assert_eq!(json["fontFamily"], DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn test_missing_attributes_default() {
        let obj: CanvasObject = serde_json::from_str(r#"{"type":"circle"}"#).unwrap();
        assert!((obj.opacity - 1.0).abs() < f64::EPSILON);
        assert!((obj.scale_x - 1.0).abs() < f64::EPSILON);
        assert_eq!(obj.animation, Animation::None);
        assert!(!obj.locked);
        assert!(matches!(obj.kind, ObjectKind::Circle(_)));
    }

    #[test]
    fn test_non_finite_numbers_are_detected() {
        let mut obj = rect_at(0.0, 0.0, 10.0, 10.0);
        assert!(obj.is_finite());
        obj.scale_x = f64::INFINITY;
        assert!(!obj.is_finite());

        let path = CanvasObject::new(ObjectKind::Path(Path::polyline(vec![
            Point::ZERO,
            Point::new(f64::NAN, 1.0),
        ])));
        assert!(!path.is_finite());
    }

    #[test]
    fn test_set_fill_unsupported_on_lines() {
        let mut kind = ObjectKind::Line(Line::to(Point::new(1.0, 0.0)));
        assert!(!kind.set_fill(Some(SerializableColor::white())));
        assert!(kind.set_stroke(Some(SerializableColor::white())));
    }

    #[test]
    fn test_tags_cover_every_variant() {
        let kinds = [
            ObjectKind::Text(Text::new("")),
            ObjectKind::Rectangle(Rectangle::new(1.0, 1.0)),
            ObjectKind::Circle(Circle::new(1.0)),
            ObjectKind::Triangle(Triangle::new(1.0, 1.0)),
            ObjectKind::Image(Image::new("", 1.0, 1.0)),
            ObjectKind::Path(Path::polyline(vec![])),
            ObjectKind::Line(Line::to(Point::ZERO)),
        ];
        for kind in kinds {
            assert!(ObjectKind::TAGS.contains(&kind.tag()));
        }
    }
}
