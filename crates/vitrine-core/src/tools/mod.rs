//! Placement tools: interactive creation of new objects from pointer input.
//!
//! Each creating tool runs the same machine:
//!
//! ```text
//! Idle -> Armed -> Tracking -> [AnchorSet(1) -> AnchorSet(2)] -> Committed
//!            \________\______________\_______________________-> Cancelled
//! ```
//!
//! The ghost object lives only inside the machine; nothing reaches the
//! document until [`PlacementMachine::pointer_down`] returns the committed
//! object.

use crate::config::StyleDefaults;
use crate::media::PlacedMedia;
use crate::shapes::{
    CanvasObject, Circle, Image, Line, ObjectKind, Path, Rectangle, Text, Triangle,
};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Text,
    Rectangle,
    Circle,
    Triangle,
    Image,
    Video,
    Line,
    Curve,
    Arrow,
}

impl ToolKind {
    /// Clicks that fix control points before the committing click.
    pub fn anchors_required(self) -> usize {
        match self {
            ToolKind::Line | ToolKind::Arrow => 1,
            ToolKind::Curve => 2,
            _ => 0,
        }
    }

    /// Check if this tool places new objects.
    pub fn creates_objects(self) -> bool {
        self != ToolKind::Select
    }

    /// Image and video tools can only be armed by attaching media.
    pub fn requires_media(self) -> bool {
        matches!(self, ToolKind::Image | ToolKind::Video)
    }
}

/// State of a placement interaction.
#[derive(Debug, Clone, Default)]
pub enum PlacementState {
    /// No creating tool chosen.
    #[default]
    Idle,
    /// Tool chosen, waiting for the pointer to enter the canvas.
    Armed {
        tool: ToolKind,
        media: Option<PlacedMedia>,
    },
    /// Ghost follows the pointer.
    Tracking { tool: ToolKind, ghost: CanvasObject },
    /// Some control points are fixed; the ghost stretches to the pointer.
    AnchorSet {
        tool: ToolKind,
        anchors: Vec<Point>,
        ghost: CanvasObject,
    },
}

/// Drives placement for the current tool.
#[derive(Debug, Clone)]
pub struct PlacementMachine {
    state: PlacementState,
    /// Current style to apply to new objects.
    pub style: StyleDefaults,
    ghost_opacity: f64,
    max_image_size: Size,
}

impl PlacementMachine {
    pub fn new(style: StyleDefaults, ghost_opacity: f64, max_image_size: Size) -> Self {
        Self {
            state: PlacementState::Idle,
            style,
            ghost_opacity: ghost_opacity.clamp(0.0, 1.0),
            max_image_size,
        }
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    /// Tool currently driving the machine (`Select` when idle).
    pub fn tool(&self) -> ToolKind {
        match &self.state {
            PlacementState::Idle => ToolKind::Select,
            PlacementState::Armed { tool, .. }
            | PlacementState::Tracking { tool, .. }
            | PlacementState::AnchorSet { tool, .. } => *tool,
        }
    }

    /// Check if a placement is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, PlacementState::Idle)
    }

    /// Number of fixed anchors, 0 unless in `AnchorSet`.
    pub fn anchor_count(&self) -> usize {
        match &self.state {
            PlacementState::AnchorSet { anchors, .. } => anchors.len(),
            _ => 0,
        }
    }

    /// Preview object, if one is following the pointer.
    pub fn ghost(&self) -> Option<&CanvasObject> {
        match &self.state {
            PlacementState::Tracking { ghost, .. } | PlacementState::AnchorSet { ghost, .. } => {
                Some(ghost)
            }
            _ => None,
        }
    }

    /// Choose a tool. `Select` returns to idle.
    ///
    /// Returns false for media tools, which are armed through
    /// [`PlacementMachine::arm_with_media`].
    pub fn arm(&mut self, tool: ToolKind) -> bool {
        if tool.requires_media() {
            return false;
        }
        self.state = if tool.creates_objects() {
            PlacementState::Armed { tool, media: None }
        } else {
            PlacementState::Idle
        };
        log::debug!("Placement armed: {:?}", tool);
        true
    }

    /// Arm an image or video tool with already ingested media and start
    /// tracking at `pointer`.
    pub fn arm_with_media(&mut self, media: PlacedMedia, pointer: Point) {
        let tool = if media.kind.is_video() {
            ToolKind::Video
        } else {
            ToolKind::Image
        };
        self.state = PlacementState::Armed {
            tool,
            media: Some(media),
        };
        self.pointer_move(pointer);
    }

    /// Move the preview. Never commits anything.
    pub fn pointer_move(&mut self, point: Point) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            PlacementState::Idle => PlacementState::Idle,
            PlacementState::Armed { tool, media } => {
                match self.build_ghost(tool, media.as_ref()) {
                    Some(mut ghost) => {
                        place(&mut ghost, point);
                        log::debug!("Placement tracking: {:?}", tool);
                        PlacementState::Tracking { tool, ghost }
                    }
                    None => PlacementState::Armed { tool, media },
                }
            }
            PlacementState::Tracking { tool, mut ghost } => {
                place(&mut ghost, point);
                PlacementState::Tracking { tool, ghost }
            }
            PlacementState::AnchorSet {
                tool,
                anchors,
                mut ghost,
            } => {
                stretch(&mut ghost, &anchors, point);
                PlacementState::AnchorSet {
                    tool,
                    anchors,
                    ghost,
                }
            }
        };
    }

    /// Handle a click. Returns the committed object on the final click.
    pub fn pointer_down(&mut self, point: Point) -> Option<CanvasObject> {
        self.pointer_move(point);
        let state = std::mem::take(&mut self.state);
        match state {
            PlacementState::Tracking { tool, mut ghost } => {
                if tool.anchors_required() == 0 {
                    return Some(self.finish(ghost));
                }
                let anchors = vec![point];
                stretch(&mut ghost, &anchors, point);
                log::debug!("Placement anchor 1 of {} for {:?}", tool.anchors_required(), tool);
                self.state = PlacementState::AnchorSet {
                    tool,
                    anchors,
                    ghost,
                };
                None
            }
            PlacementState::AnchorSet {
                tool,
                mut anchors,
                mut ghost,
            } => {
                if anchors.len() >= tool.anchors_required() {
                    return Some(self.finish(ghost));
                }
                anchors.push(point);
                stretch(&mut ghost, &anchors, point);
                log::debug!(
                    "Placement anchor {} of {} for {:?}",
                    anchors.len(),
                    tool.anchors_required(),
                    tool
                );
                self.state = PlacementState::AnchorSet {
                    tool,
                    anchors,
                    ghost,
                };
                None
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Abandon the interaction. Returns true if anything was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            log::debug!("Placement cancelled: {:?}", self.tool());
        }
        self.state = PlacementState::Idle;
        was_active
    }

    fn finish(&mut self, mut ghost: CanvasObject) -> CanvasObject {
        ghost.opacity = 1.0;
        self.state = PlacementState::Idle;
        log::debug!("Placement committed: {}", ghost.kind.tag());
        ghost
    }

    /// Create the preview object for a tool with the current style.
    fn build_ghost(&self, tool: ToolKind, media: Option<&PlacedMedia>) -> Option<CanvasObject> {
        let style = &self.style;
        let kind = match tool {
            ToolKind::Select => return None,
            ToolKind::Text => ObjectKind::Text(Text {
                text: style.placeholder_text.clone(),
                font_family: style.font_family.clone(),
                font_size: style.font_size,
                fill: style.text_fill,
            }),
            ToolKind::Rectangle => ObjectKind::Rectangle(Rectangle {
                fill: style.fill,
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                ..Rectangle::new(100.0, 100.0)
            }),
            ToolKind::Circle => ObjectKind::Circle(Circle {
                fill: style.fill,
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                ..Circle::new(50.0)
            }),
            ToolKind::Triangle => ObjectKind::Triangle(Triangle {
                fill: style.fill,
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                ..Triangle::new(100.0, 100.0)
            }),
            ToolKind::Image => {
                let media = media?;
                ObjectKind::Image(
                    Image::new(media.source_ref.clone(), media.width, media.height)
                        .fit_within(self.max_image_size.width, self.max_image_size.height),
                )
            }
            ToolKind::Video => {
                let media = media?;
                ObjectKind::Rectangle(Rectangle::video(
                    media.width,
                    media.height,
                    media.source_ref.clone(),
                ))
            }
            ToolKind::Line => ObjectKind::Line(Line {
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                ..Line::to(Point::ZERO)
            }),
            ToolKind::Arrow => ObjectKind::Path(Path {
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                ..Path::arrow(Point::ZERO, Point::ZERO)
            }),
            ToolKind::Curve => ObjectKind::Path(Path {
                stroke: style.stroke,
                stroke_width: style.stroke_width,
                ..Path::curve(Point::ZERO, Point::ZERO, Point::ZERO)
            }),
        };
        let mut ghost = CanvasObject::new(kind);
        ghost.opacity = self.ghost_opacity;
        Some(ghost)
    }
}

/// Put a free-floating ghost at the pointer.
fn place(ghost: &mut CanvasObject, point: Point) {
    ghost.left = point.x;
    ghost.top = point.y;
}

/// Reshape a multi-point ghost from its anchors and the live pointer.
///
/// The first anchor is the object origin; other points are relative to it.
fn stretch(ghost: &mut CanvasObject, anchors: &[Point], pointer: Point) {
    let Some(start) = anchors.first().copied() else {
        return;
    };
    place(ghost, start);
    let to_pointer: Vec2 = pointer - start;
    match &mut ghost.kind {
        ObjectKind::Line(line) => {
            line.x2 = to_pointer.x;
            line.y2 = to_pointer.y;
        }
        ObjectKind::Path(path) => {
            if path.arrow_head {
                path.points = vec![Point::ZERO, to_pointer.to_point()];
            } else if let Some(end) = anchors.get(1) {
                // Start and end fixed: the pointer bends the curve.
                path.points = vec![Point::ZERO, to_pointer.to_point(), (*end - start).to_point()];
            } else {
                let end = to_pointer.to_point();
                path.points = vec![Point::ZERO, end.midpoint(Point::ZERO), end];
            }
        }
        _ => {}
    }
}
