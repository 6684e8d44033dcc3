//! Canvas document: dimensions, background and the ordered object list.

use crate::shapes::{CanvasObject, ObjectId, SerializableColor};
use kurbo::{Point, Size};
use serde::Serialize;

/// Current persisted format version.
pub const FORMAT_VERSION: u32 = 1;

/// Default page section size for new documents.
pub const DEFAULT_WIDTH: f64 = 900.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// A canvas document containing all objects.
///
/// `objects` is back to front: index 0 is drawn first, the last entry on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasDocument {
    pub version: u32,
    pub width: f64,
    pub height: f64,
    pub background: SerializableColor,
    pub objects: Vec<CanvasObject>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl CanvasDocument {
    /// Create a blank document.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            version: FORMAT_VERSION,
            width,
            height,
            background: SerializableColor::white(),
            objects: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width over height, as stored (never derived from content).
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Append an object on top of the stack.
    pub fn add_object(&mut self, object: CanvasObject) -> ObjectId {
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Insert an object at a z-index, clamped to the list length.
    pub fn insert_object(&mut self, index: usize, object: CanvasObject) -> ObjectId {
        let id = object.id;
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        id
    }

    /// Remove an object, returning it with its former z-index.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<(usize, CanvasObject)> {
        let index = self.index_of(id)?;
        Some((index, self.objects.remove(index)))
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Move an object one layer forward (towards front).
    /// Returns true if the object was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos + 1 < self.objects.len() {
                self.objects.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move an object one layer backward (towards back).
    /// Returns true if the object was moved, false if already at back.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos > 0 {
                self.objects.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Topmost object under a point.
    pub fn object_at(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.hit_test(point, tolerance))
            .map(|o| o.id)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
