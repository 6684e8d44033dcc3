//! Single-slot object clipboard.

use crate::shapes::CanvasObject;
use kurbo::Vec2;

/// Default displacement applied to each paste.
pub const DEFAULT_PASTE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Holds at most one copied object; the last copy wins.
#[derive(Debug, Clone)]
pub struct Clipboard {
    entry: Option<CanvasObject>,
    offset: Vec2,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new(DEFAULT_PASTE_OFFSET)
    }
}

impl Clipboard {
    pub fn new(offset: Vec2) -> Self {
        Self {
            entry: None,
            offset,
        }
    }

    /// Store a clone of `object`.
    pub fn copy(&mut self, object: &CanvasObject) {
        self.entry = Some(object.clone());
    }

    /// Produce a fresh clone, offset from the previous paste.
    ///
    /// The stored entry advances with each paste so repeated pastes cascade.
    pub fn paste(&mut self) -> Option<CanvasObject> {
        let entry = self.entry.as_mut()?;
        entry.translate(self.offset);
        let mut pasted = entry.clone();
        pasted.regenerate_id();
        Some(pasted)
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
