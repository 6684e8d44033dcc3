//! Vitrine Render Library
//!
//! Stateless rendering of persisted canvases for the public site. The
//! renderer never reads editor state; it only sees a decoded document.

mod renderer;
pub mod svg;
pub mod tree;

pub use renderer::{Renderer, TreeRenderer, render, render_content};
pub use svg::{RenderOptions, SvgRenderer};
pub use tree::{Frame, NodeContent, VisualNode, VisualTree};
