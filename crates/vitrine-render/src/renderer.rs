//! Renderer trait and the visual tree builder.

use crate::tree::{Frame, NodeContent, VisualNode, VisualTree};
use vitrine_core::canvas::CanvasDocument;
use vitrine_core::codec::decode_or_none;
use vitrine_core::shapes::{CanvasObject, ObjectKind};

/// Trait for rendering backends.
///
/// Rendering is a pure function of the document: the same document always
/// produces the same output.
pub trait Renderer: Send + Sync {
    type Output;

    fn render(&self, document: &CanvasDocument) -> Self::Output;

    /// Render persisted canvas content. Content that does not decode renders
    /// nothing.
    fn render_content(&self, content: &str) -> Option<Self::Output> {
        decode_or_none(content).map(|document| self.render(&document))
    }
}

/// Produces a [`VisualTree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer;

impl Renderer for TreeRenderer {
    type Output = VisualTree;

    fn render(&self, document: &CanvasDocument) -> VisualTree {
        let tree = VisualTree {
            frame: Frame {
                width: document.width,
                height: document.height,
                background: document.background,
            },
            nodes: document.objects.iter().map(visual_node).collect(),
        };
        log::debug!(
            "Rendered {}x{} frame with {} nodes",
            tree.frame.width,
            tree.frame.height,
            tree.nodes.len()
        );
        tree
    }
}

/// Render a document to a visual tree.
pub fn render(document: &CanvasDocument) -> VisualTree {
    TreeRenderer.render(document)
}

/// Render persisted canvas content, or nothing if it does not decode.
pub fn render_content(content: &str) -> Option<VisualTree> {
    TreeRenderer.render_content(content)
}

fn visual_node(object: &CanvasObject) -> VisualNode {
    VisualNode {
        id: object.id,
        transform: object.transform(),
        opacity: object.effective_opacity(),
        animation: object.animation,
        bounds: object.kind.local_bounds(),
        content: content(&object.kind),
    }
}

fn content(kind: &ObjectKind) -> NodeContent {
    match kind {
        ObjectKind::Text(text) => NodeContent::Text {
            lines: text.lines().into_iter().map(str::to_string).collect(),
            font_family: text.font_family.clone(),
            font_size: text.font_size,
            line_height: text.line_advance(),
            fill: text.fill,
        },
        ObjectKind::Rectangle(rect) => match &rect.video {
            Some(src) => NodeContent::Video {
                src: src.clone(),
                width: rect.width,
                height: rect.height,
                corner_radius: rect.effective_radius(),
                stroke: rect.stroke,
                stroke_width: rect.stroke_width,
            },
            None => shape(kind),
        },
        ObjectKind::Image(image) => NodeContent::Image {
            src: image.source_ref.clone(),
            width: image.width,
            height: image.height,
            corner_radius: image.effective_radius(),
            stroke: image.stroke,
            stroke_width: image.stroke_width,
        },
        ObjectKind::Circle(_)
        | ObjectKind::Triangle(_)
        | ObjectKind::Path(_)
        | ObjectKind::Line(_) => shape(kind),
    }
}

fn shape(kind: &ObjectKind) -> NodeContent {
    let paint = kind.paint();
    NodeContent::Shape {
        path: kind.outline(),
        fill: paint.fill,
        stroke: paint.visible_stroke(),
        stroke_width: paint.stroke_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use vitrine_core::shapes::{Circle, Rectangle};

    #[test]
    fn test_nodes_follow_list_order() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        let a = doc.add_object(CanvasObject::new(ObjectKind::Circle(Circle::new(5.0))));
        let b = doc.add_object(
            CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)))
                .at(Point::new(20.0, 20.0)),
        );
        let tree = render(&doc);
        let ids: Vec<_> = tree.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_video_rectangle_is_video_node() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        doc.add_object(CanvasObject::new(ObjectKind::Rectangle(Rectangle::video(
            32.0,
            18.0,
            "https://cdn.example/a.webm",
        ))));
        let tree = render(&doc);
        let NodeContent::Video { src, width, .. } = &tree.nodes[0].content else {
            panic!("expected video");
        };
        assert_eq!(src, "https://cdn.example/a.webm");
        assert_eq!(*width, 32.0);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        let mut object = CanvasObject::new(ObjectKind::Circle(Circle::new(5.0)));
        object.opacity = 7.0;
        doc.add_object(object);
        assert_eq!(render(&doc).nodes[0].opacity, 1.0);
    }

    #[test]
    fn test_hidden_stroke_is_dropped() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        let mut rect = Rectangle::new(10.0, 10.0);
        rect.stroke_width = 0.0;
        doc.add_object(CanvasObject::new(ObjectKind::Rectangle(rect)));
        let NodeContent::Shape { stroke, .. } = &render(&doc).nodes[0].content else {
            panic!("expected shape");
        };
        assert!(stroke.is_none());
    }
}
