//! SVG markup backend for public portfolio pages.
//!
//! The output scales with its container: the `viewBox` is the document size
//! and the element fills the host width, so the page section always keeps the
//! aspect ratio the designer saw.

use crate::renderer::{Renderer, TreeRenderer};
use crate::tree::{NodeContent, VisualNode, VisualTree};
use kurbo::Affine;
use std::fmt::Write;
use vitrine_core::canvas::CanvasDocument;
use vitrine_core::shapes::{Animation, SerializableColor};

/// Options for SVG output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix for generated ids and class names, so several canvases can
    /// share one page.
    pub id_prefix: String,
    /// Emit animation classes and keyframes.
    pub animations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            id_prefix: "vitrine-".to_string(),
            animations: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_animations(mut self, animations: bool) -> Self {
        self.animations = animations;
        self
    }
}

/// Renders documents as standalone SVG elements.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    options: RenderOptions,
}

impl SvgRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Write markup for an already built tree.
    pub fn render_tree(&self, tree: &VisualTree) -> String {
        let frame = &tree.frame;
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"100%\" \
             preserveAspectRatio=\"xMidYMid meet\" style=\"aspect-ratio: {w} / {h}\">",
            w = frame.width,
            h = frame.height,
        );

        if self.options.animations && tree.nodes.iter().any(|n| n.animation != Animation::None) {
            self.write_keyframes(&mut svg);
        }

        let _ = writeln!(
            svg,
            "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            frame.width,
            frame.height,
            color(frame.background)
        );

        for (index, node) in tree.nodes.iter().enumerate() {
            self.write_node(&mut svg, index, node);
        }

        svg.push_str("</svg>");
        svg
    }

    fn write_keyframes(&self, out: &mut String) {
        let p = &self.options.id_prefix;
        let _ = write!(
            out,
            "<style>\n\
             .{p}anim {{ transform-box: fill-box; transform-origin: center; }}\n\
             .{p}anim-pulse {{ animation: {p}pulse 2s ease-in-out infinite; }}\n\
             .{p}anim-rotate {{ animation: {p}rotate 6s linear infinite; }}\n\
             .{p}anim-bounce {{ animation: {p}bounce 1.2s ease-in-out infinite; }}\n\
             @keyframes {p}pulse {{ 0%, 100% {{ transform: scale(1); }} 50% {{ transform: scale(1.08); }} }}\n\
             @keyframes {p}rotate {{ from {{ transform: rotate(0deg); }} to {{ transform: rotate(360deg); }} }}\n\
             @keyframes {p}bounce {{ 0%, 100% {{ transform: translateY(0); }} 50% {{ transform: translateY(-12%); }} }}\n\
             </style>\n"
        );
    }

    fn write_node(&self, out: &mut String, index: usize, node: &VisualNode) {
        let _ = write!(out, "<g transform=\"{}\"", matrix(node.transform));
        if node.opacity < 1.0 {
            let _ = write!(out, " opacity=\"{}\"", node.opacity);
        }
        out.push_str(">\n");

        // The animation runs on an inner group so it composes with the
        // placement transform instead of replacing it.
        let animated = self.options.animations && node.animation != Animation::None;
        if animated {
            let p = &self.options.id_prefix;
            let _ = writeln!(
                out,
                "<g class=\"{p}anim {p}anim-{}\">",
                node.animation.name()
            );
        }

        match &node.content {
            NodeContent::Text {
                lines,
                font_family,
                font_size,
                line_height,
                fill,
            } => {
                let _ = write!(
                    out,
                    "<text font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
                    escape(font_family),
                    font_size,
                    color(*fill)
                );
                for (i, line) in lines.iter().enumerate() {
                    let baseline = font_size + line_height * i as f64;
                    let _ = write!(
                        out,
                        "<tspan x=\"0\" y=\"{}\" xml:space=\"preserve\">{}</tspan>",
                        baseline,
                        escape(line)
                    );
                }
                out.push_str("</text>\n");
            }
            NodeContent::Shape {
                path,
                fill,
                stroke,
                stroke_width,
            } => {
                let _ = writeln!(
                    out,
                    "<path d=\"{}\" fill=\"{}\"{}/>",
                    path.to_svg(),
                    optional_color(*fill),
                    stroke_attrs(*stroke, *stroke_width)
                );
            }
            NodeContent::Image {
                src,
                width,
                height,
                corner_radius,
                stroke,
                stroke_width,
            } => {
                let clip = self.write_clip(out, index, *width, *height, *corner_radius);
                let _ = writeln!(
                    out,
                    "<image href=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\"{}/>",
                    escape(src),
                    width,
                    height,
                    clip
                );
                write_border(out, *width, *height, *corner_radius, *stroke, *stroke_width);
            }
            NodeContent::Video {
                src,
                width,
                height,
                corner_radius,
                stroke,
                stroke_width,
            } => {
                let _ = writeln!(
                    out,
                    "<foreignObject width=\"{}\" height=\"{}\">\
                     <video xmlns=\"http://www.w3.org/1999/xhtml\" src=\"{}\" autoplay=\"\" muted=\"\" \
                     loop=\"\" playsinline=\"\" style=\"width:100%;height:100%;object-fit:cover;\
                     border-radius:{}px\"></video></foreignObject>",
                    width,
                    height,
                    escape(src),
                    corner_radius
                );
                write_border(out, *width, *height, *corner_radius, *stroke, *stroke_width);
            }
        }

        if animated {
            out.push_str("</g>\n");
        }
        out.push_str("</g>\n");
    }

    /// Emit a rounded clip path if needed and return the attribute using it.
    fn write_clip(
        &self,
        out: &mut String,
        index: usize,
        width: f64,
        height: f64,
        radius: f64,
    ) -> String {
        if radius <= 0.0 {
            return String::new();
        }
        let id = format!("{}clip-{}", self.options.id_prefix, index);
        let _ = writeln!(
            out,
            "<clipPath id=\"{}\"><rect width=\"{}\" height=\"{}\" rx=\"{}\"/></clipPath>",
            id, width, height, radius
        );
        format!(" clip-path=\"url(#{})\"", id)
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, document: &CanvasDocument) -> String {
        self.render_tree(&TreeRenderer.render(document))
    }
}

fn write_border(
    out: &mut String,
    width: f64,
    height: f64,
    radius: f64,
    stroke: Option<SerializableColor>,
    stroke_width: f64,
) {
    if stroke.is_none() || stroke_width <= 0.0 {
        return;
    }
    let _ = writeln!(
        out,
        "<rect width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"none\"{}/>",
        width,
        height,
        radius,
        stroke_attrs(stroke, stroke_width)
    );
}

fn stroke_attrs(stroke: Option<SerializableColor>, width: f64) -> String {
    match stroke {
        Some(c) if width > 0.0 => format!(
            " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
            color(c),
            width
        ),
        _ => String::new(),
    }
}

fn matrix(t: Affine) -> String {
    // -0 prints as "-0"
    let [a, b, c, d, e, f] = t.as_coeffs().map(|v| if v == 0.0 { 0.0 } else { v });
    format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
}

fn color(c: SerializableColor) -> String {
    if c.is_opaque() {
        c.to_hex()
    } else {
        format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.alpha())
    }
}

fn optional_color(c: Option<SerializableColor>) -> String {
    c.map(color).unwrap_or_else(|| "none".to_string())
}

/// Escape text for XML content and attribute values.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use vitrine_core::shapes::{CanvasObject, Image, ObjectKind, Rectangle, Text};

    fn svg(doc: &CanvasDocument) -> String {
        SvgRenderer::default().render(doc)
    }

    #[test]
    fn test_empty_document() {
        let out = svg(&CanvasDocument::new(900.0, 500.0));
        assert!(out.starts_with("<svg"));
        assert!(out.contains("viewBox=\"0 0 900 500\""));
        assert!(out.contains("width=\"100%\""));
        assert!(out.contains("<rect width=\"900\" height=\"500\" fill=\"#ffffff\"/>"));
        assert!(!out.contains("<style>"));
        assert!(out.ends_with("</svg>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        doc.add_object(CanvasObject::new(ObjectKind::Text(Text::new("A & <B>\nline 2"))));
        let out = svg(&doc);
        assert!(out.contains("A &amp; &lt;B&gt;"));
        assert!(out.contains("font-family=\"Times New Roman\""));
        assert_eq!(out.matches("<tspan").count(), 2);
    }

    #[test]
    fn test_translation_matrix() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        doc.add_object(
            CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)))
                .at(Point::new(25.0, 30.0)),
        );
        assert!(svg(&doc).contains("transform=\"matrix(1 0 0 1 25 30)\""));
    }

    #[test]
    fn test_video_uses_foreign_object() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        doc.add_object(CanvasObject::new(ObjectKind::Rectangle(Rectangle::video(
            64.0,
            36.0,
            "https://cdn.example/a.mp4?x=1&y=2",
        ))));
        let out = svg(&doc);
        assert!(out.contains("<foreignObject width=\"64\" height=\"36\">"));
        assert!(out.contains("src=\"https://cdn.example/a.mp4?x=1&amp;y=2\""));
        assert!(out.contains("muted=\"\""));
    }

    #[test]
    fn test_rounded_image_is_clipped() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        let mut image = Image::new("data:image/png;base64,AAAA", 40.0, 20.0);
        image.corner_radius = 6.0;
        doc.add_object(CanvasObject::new(ObjectKind::Image(image)));
        let out = SvgRenderer::new(RenderOptions::new().with_id_prefix("hero-")).render(&doc);
        assert!(out.contains("<clipPath id=\"hero-clip-0\">"));
        assert!(out.contains("clip-path=\"url(#hero-clip-0)\""));
    }

    #[test]
    fn test_animation_classes() {
        let mut doc = CanvasDocument::new(100.0, 100.0);
        let mut object = CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        object.animation = Animation::Pulse;
        doc.add_object(object);

        let out = svg(&doc);
        assert!(out.contains("@keyframes vitrine-pulse"));
        assert!(out.contains("class=\"vitrine-anim vitrine-anim-pulse\""));

        let still = SvgRenderer::new(RenderOptions::new().with_animations(false)).render(&doc);
        assert!(!still.contains("anim-pulse"));
        assert!(!still.contains("<style>"));
    }

    #[test]
    fn test_translucent_colors() {
        assert_eq!(color(SerializableColor::new(255, 0, 0, 255)), "#ff0000");
        assert!(color(SerializableColor::new(255, 0, 0, 128)).starts_with("rgba(255, 0, 0, 0.50"));
        assert_eq!(optional_color(None), "none");
    }

    #[test]
    fn test_bad_content_renders_nothing() {
        let renderer = SvgRenderer::default();
        assert!(renderer.render_content("").is_none());
        assert!(renderer.render_content("{\"version\":1}").is_none());
    }
}
