//! Backend-neutral output of the renderer.

use kurbo::{Affine, BezPath, Rect, Size};
use vitrine_core::shapes::{Animation, ObjectId, SerializableColor};

/// The drawing surface: document size and background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub background: SerializableColor,
}

impl Frame {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width over height of the stored document.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// What a node draws, in node-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Lines of text laid out top-down from the local origin.
    Text {
        lines: Vec<String>,
        font_family: String,
        font_size: f64,
        /// Distance between consecutive baselines.
        line_height: f64,
        fill: SerializableColor,
    },
    /// Any vector shape: rectangles, circles, triangles, paths, lines.
    Shape {
        path: BezPath,
        fill: Option<SerializableColor>,
        stroke: Option<SerializableColor>,
        stroke_width: f64,
    },
    Image {
        src: String,
        width: f64,
        height: f64,
        corner_radius: f64,
        stroke: Option<SerializableColor>,
        stroke_width: f64,
    },
    /// Autoplaying, muted, looping video filling its box.
    Video {
        src: String,
        width: f64,
        height: f64,
        corner_radius: f64,
        stroke: Option<SerializableColor>,
        stroke_width: f64,
    },
}

/// One drawable object.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: ObjectId,
    /// Node-local to frame coordinates.
    pub transform: Affine,
    pub opacity: f64,
    pub animation: Animation,
    /// Unscaled local bounds of the content.
    pub bounds: Rect,
    pub content: NodeContent,
}

impl VisualNode {
    /// Axis-aligned bounds in frame coordinates.
    pub fn frame_bounds(&self) -> Rect {
        self.transform.transform_rect_bbox(self.bounds)
    }
}

/// Rendered document: a frame and its nodes back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    pub frame: Frame,
    pub nodes: Vec<VisualNode>,
}

impl VisualTree {
    /// Scale that fits the frame to `host_width`, and the host height that
    /// keeps the document aspect ratio.
    pub fn fit_to_width(&self, host_width: f64) -> (f64, f64) {
        if self.frame.width <= 0.0 {
            return (1.0, self.frame.height);
        }
        let scale = host_width / self.frame.width;
        (scale, self.frame.height * scale)
    }

    /// Transform from frame coordinates to a host of `host_width`.
    pub fn host_transform(&self, host_width: f64) -> Affine {
        Affine::scale(self.fit_to_width(host_width).0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(width: f64, height: f64) -> VisualTree {
        VisualTree {
            frame: Frame {
                width,
                height,
                background: SerializableColor::white(),
            },
            nodes: Vec::new(),
        }
    }

    #[test]
    fn test_fit_to_width_keeps_aspect() {
        let (scale, height) = tree(900.0, 500.0).fit_to_width(450.0);
        assert!((scale - 0.5).abs() < 1e-12);
        assert!((height - 250.0).abs() < 1e-12);

        let (scale, height) = tree(900.0, 500.0).fit_to_width(1800.0);
        assert!((scale - 2.0).abs() < 1e-12);
        assert!((height - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_host_transform() {
        let t = tree(1000.0, 100.0).host_transform(500.0);
        assert_eq!(t * kurbo::Point::new(1000.0, 100.0), kurbo::Point::new(500.0, 50.0));
    }
}
