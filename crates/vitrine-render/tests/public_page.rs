//! Rendering persisted canvases the way the public site does.

use kurbo::{Point, Vec2};
use vitrine_core::config::EditorConfig;
use vitrine_core::editor::EditorSession;
use vitrine_core::shapes::{Animation, CanvasObject, ObjectKind, Rectangle};
use vitrine_core::tools::ToolKind;
use vitrine_core::{decode, encode};
use vitrine_render::{NodeContent, Renderer, SvgRenderer, render, render_content};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn empty_document_renders_empty_frame() {
    init_logger();
    let tree = render_content(r#"{"version":1,"width":900,"height":500,"objects":[]}"#).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.frame.width, 900.0);
    assert_eq!(tree.frame.height, 500.0);
    assert!((tree.frame.aspect_ratio() - 1.8).abs() < 1e-12);
}

#[test]
fn text_node_sits_at_its_origin() {
    let content = r#"{"version":1,"width":900,"height":500,"objects":[
        {"type":"text","left":100,"top":100,"text":"Hello","fontSize":24}
    ]}"#;
    let tree = render_content(content).unwrap();
    assert_eq!(tree.len(), 1);

    let node = &tree.nodes[0];
    let origin = node.transform * Point::ZERO;
    assert!((origin - Point::new(100.0, 100.0)).hypot() < 1e-9);
    let NodeContent::Text {
        lines, font_size, ..
    } = &node.content
    else {
        panic!("expected a text node");
    };
    assert_eq!(lines, &vec!["Hello".to_string()]);
    assert_eq!(*font_size, 24.0);
}

#[test]
fn unreadable_content_renders_nothing() {
    init_logger();
    assert!(render_content("").is_none());
    assert!(render_content("not json").is_none());
    assert!(SvgRenderer::default().render_content("not json").is_none());
}

#[test]
fn unknown_objects_are_skipped_not_fatal() {
    let content = r#"{"version":1,"width":300,"height":200,"objects":[
        {"type":"sparkle","left":1},
        {"type":"circle","left":10,"top":10,"radius":5}
    ]}"#;
    let tree = render_content(content).unwrap();
    assert_eq!(tree.len(), 1);
}

#[test]
fn rendering_is_idempotent() {
    let mut session = EditorSession::new(EditorConfig::default());
    session.set_tool(ToolKind::Curve).unwrap();
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_down(Point::new(200.0, 10.0));
    session.pointer_down(Point::new(100.0, 90.0));
    session.set_animation(Animation::Rotate).unwrap();

    let content = encode(session.document()).unwrap();
    assert_eq!(render_content(&content), render_content(&content));
    let svg = SvgRenderer::default();
    assert_eq!(svg.render_content(&content), svg.render_content(&content));
}

#[test]
fn editor_and_renderer_agree_on_placement() {
    let mut session = EditorSession::new(EditorConfig::default());
    let id = session.insert(
        CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(120.0, 60.0)))
            .at(Point::new(200.0, 150.0)),
    );
    session.select(id).unwrap();
    session.rotate_to(30.0).unwrap();
    session.set_width(240.0).unwrap();
    session.flip_vertical().unwrap();
    session.move_by(Vec2::new(-20.0, 5.0)).unwrap();

    // The public page only ever sees the persisted string.
    let content = encode(session.document()).unwrap();
    let tree = render_content(&content).unwrap();
    let edited = session.selected().unwrap();

    let node = &tree.nodes[0];
    assert_eq!(node.transform, edited.transform());
    for corner in [Point::new(0.0, 0.0), Point::new(120.0, 60.0)] {
        let world = node.transform * corner;
        assert!(edited.hit_test(world, 0.5));
    }
    assert_eq!(node.frame_bounds(), edited.world_bounds());
}

#[test]
fn frame_comes_from_document_not_content() {
    let mut doc = decode(r#"{"version":1,"width":1200,"height":300}"#).unwrap();
    doc.add_object(CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(5000.0, 5000.0))));
    let tree = render(&doc);
    assert_eq!(tree.frame.size(), kurbo::Size::new(1200.0, 300.0));

    let (scale, height) = tree.fit_to_width(600.0);
    assert!((scale - 0.5).abs() < 1e-12);
    assert!((height - 150.0).abs() < 1e-12);
}
