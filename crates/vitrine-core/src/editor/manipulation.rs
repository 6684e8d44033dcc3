//! Property, transform and layering operations on the selected object.

use super::{EditorError, EditorSession};
use crate::shapes::{Animation, ObjectId, SerializableColor};

fn finite_positive(value: f64, what: &'static str) -> Result<f64, EditorError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EditorError::InvalidValue(what))
    }
}

impl EditorSession {
    /// Select an object by id.
    pub fn select(&mut self, id: ObjectId) -> Result<(), EditorError> {
        if !self.document.contains(id) {
            return Err(EditorError::ObjectNotFound(id));
        }
        self.selection = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Set the fill; `None` removes it.
    pub fn set_fill(&mut self, fill: Option<SerializableColor>) -> Result<(), EditorError> {
        self.edit(|object| {
            if object.kind.set_fill(fill) {
                Ok(())
            } else {
                Err(EditorError::Unsupported("fill"))
            }
        })
    }

    /// Set the fill from a CSS color string (`"none"` removes it).
    pub fn set_fill_css(&mut self, css: &str) -> Result<(), EditorError> {
        let fill = SerializableColor::parse_optional(css)?;
        self.set_fill(fill)
    }

    pub fn set_stroke(&mut self, stroke: Option<SerializableColor>) -> Result<(), EditorError> {
        self.edit(|object| {
            if object.kind.set_stroke(stroke) {
                Ok(())
            } else {
                Err(EditorError::Unsupported("stroke"))
            }
        })
    }

    pub fn set_stroke_css(&mut self, css: &str) -> Result<(), EditorError> {
        let stroke = SerializableColor::parse_optional(css)?;
        self.set_stroke(stroke)
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<(), EditorError> {
        if !width.is_finite() || width < 0.0 {
            return Err(EditorError::InvalidValue("stroke width"));
        }
        self.edit(|object| {
            if object.kind.set_stroke_width(width) {
                Ok(())
            } else {
                Err(EditorError::Unsupported("stroke width"))
            }
        })
    }

    /// Set opacity, clamped to `0..=1`.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<(), EditorError> {
        if !opacity.is_finite() {
            return Err(EditorError::InvalidValue("opacity"));
        }
        self.edit(|object| {
            object.opacity = opacity.clamp(0.0, 1.0);
            Ok(())
        })
    }

    pub fn set_font_family(&mut self, family: &str) -> Result<(), EditorError> {
        let family = family.trim();
        if family.is_empty() {
            return Err(EditorError::InvalidValue("font family"));
        }
        self.edit(|object| {
            let text = object
                .kind
                .as_text_mut()
                .ok_or(EditorError::Unsupported("font family"))?;
            text.font_family = family.to_string();
            Ok(())
        })
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<(), EditorError> {
        let size = finite_positive(size, "font size")?;
        self.edit(|object| {
            let text = object
                .kind
                .as_text_mut()
                .ok_or(EditorError::Unsupported("font size"))?;
            text.font_size = size;
            Ok(())
        })
    }

    pub fn set_text(&mut self, content: &str) -> Result<(), EditorError> {
        self.edit(|object| {
            let text = object
                .kind
                .as_text_mut()
                .ok_or(EditorError::Unsupported("text"))?;
            text.text = content.to_string();
            Ok(())
        })
    }

    /// Resize to an on-screen width by changing `scaleX`.
    pub fn set_width(&mut self, width: f64) -> Result<(), EditorError> {
        let width = finite_positive(width, "width")?;
        self.edit_unlocked(|object| {
            let base = object.base_size().width;
            if base <= 0.0 {
                return Err(EditorError::InvalidValue("width of a zero-width object"));
            }
            object.scale_x = width / base;
            Ok(())
        })
    }

    /// Resize to an on-screen height by changing `scaleY`.
    pub fn set_height(&mut self, height: f64) -> Result<(), EditorError> {
        let height = finite_positive(height, "height")?;
        self.edit_unlocked(|object| {
            let base = object.base_size().height;
            if base <= 0.0 {
                return Err(EditorError::InvalidValue("height of a zero-height object"));
            }
            object.scale_y = height / base;
            Ok(())
        })
    }

    pub fn set_animation(&mut self, animation: Animation) -> Result<(), EditorError> {
        self.edit(|object| {
            object.animation = animation;
            Ok(())
        })
    }

    /// Multiply both scale factors.
    pub fn scale_by(&mut self, factor: f64) -> Result<(), EditorError> {
        let factor = finite_positive(factor, "scale factor")?;
        self.edit_unlocked(|object| {
            object.scale_x *= factor;
            object.scale_y *= factor;
            Ok(())
        })
    }

    /// Set the rotation in degrees, normalized to `0..360`.
    pub fn rotate_to(&mut self, degrees: f64) -> Result<(), EditorError> {
        if !degrees.is_finite() {
            return Err(EditorError::InvalidValue("angle"));
        }
        self.edit_unlocked(|object| {
            object.angle = degrees.rem_euclid(360.0);
            Ok(())
        })
    }

    pub fn flip_horizontal(&mut self) -> Result<(), EditorError> {
        self.edit_unlocked(|object| {
            object.flip_x = !object.flip_x;
            Ok(())
        })
    }

    pub fn flip_vertical(&mut self) -> Result<(), EditorError> {
        self.edit_unlocked(|object| {
            object.flip_y = !object.flip_y;
            Ok(())
        })
    }

    /// Swap with the object above. Returns false if already on top.
    pub fn bring_forward(&mut self) -> Result<bool, EditorError> {
        let id = self.selected_id()?;
        let moved = self.document.bring_forward(id);
        if moved {
            self.commit();
        }
        Ok(moved)
    }

    /// Swap with the object below. Returns false if already at the bottom.
    pub fn send_backward(&mut self) -> Result<bool, EditorError> {
        let id = self.selected_id()?;
        let moved = self.document.send_backward(id);
        if moved {
            self.commit();
        }
        Ok(moved)
    }

    pub fn lock(&mut self) -> Result<(), EditorError> {
        self.edit(|object| {
            object.locked = true;
            Ok(())
        })
    }

    pub fn unlock(&mut self) -> Result<(), EditorError> {
        self.edit(|object| {
            object.locked = false;
            Ok(())
        })
    }

    /// Remove the selected object.
    pub fn delete(&mut self) -> Result<(), EditorError> {
        let id = self.selected_id()?;
        self.document.remove_object(id);
        self.selection = None;
        self.commit();
        log::debug!("Deleted {}", id);
        Ok(())
    }

    /// Clone the selected object with a fresh id and the duplicate offset,
    /// put it on top and select it.
    pub fn duplicate(&mut self) -> Result<ObjectId, EditorError> {
        let id = self.selected_id()?;
        let mut clone = self
            .document
            .get(id)
            .cloned()
            .ok_or(EditorError::ObjectNotFound(id))?;
        clone.regenerate_id();
        clone.translate(self.config.duplicate_offset);
        let new_id = self.document.add_object(clone);
        self.selection = Some(new_id);
        self.commit();
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::shapes::{CanvasObject, Image, Line, ObjectKind, Rectangle, Text};
    use kurbo::{Point, Vec2};

    fn session() -> EditorSession {
        EditorSession::new(EditorConfig::default())
    }

    fn add(session: &mut EditorSession, kind: ObjectKind) -> ObjectId {
        let id = session.insert(CanvasObject::new(kind));
        session.select(id).unwrap();
        id
    }

    #[test]
    fn test_requires_selection() {
        let mut s = session();
        assert_eq!(s.set_opacity(0.5), Err(EditorError::NoSelection));
        assert_eq!(s.delete(), Err(EditorError::NoSelection));
    }

    #[test]
    fn test_each_setter_pushes_once() {
        let mut s = session();
        add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        let before = s.history().len();
        s.set_fill_css("tomato").unwrap();
        s.set_opacity(0.4).unwrap();
        assert_eq!(s.history().len(), before + 2);

        // Same value again: nothing changes, nothing recorded.
        s.set_opacity(0.4).unwrap();
        assert_eq!(s.history().len(), before + 2);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut s = session();
        add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        s.set_opacity(3.0).unwrap();
        assert_eq!(s.selected().unwrap().opacity, 1.0);
        s.set_opacity(-1.0).unwrap();
        assert_eq!(s.selected().unwrap().opacity, 0.0);
        assert!(s.set_opacity(f64::NAN).is_err());
    }

    #[test]
    fn test_set_width_and_height_change_scale() {
        let mut s = session();
        add(&mut s, ObjectKind::Rectangle(Rectangle::new(200.0, 50.0)));
        s.set_width(100.0).unwrap();
        s.set_height(150.0).unwrap();
        let object = s.selected().unwrap();
        assert!((object.scale_x - 0.5).abs() < 1e-12);
        assert!((object.scale_y - 3.0).abs() < 1e-12);
        assert!((object.effective_size().width - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_base_dimension_rejected() {
        let mut s = session();
        add(&mut s, ObjectKind::Line(Line::to(Point::new(100.0, 0.0))));
        let before = s.history().len();
        assert!(matches!(s.set_height(20.0), Err(EditorError::InvalidValue(_))));
        assert_eq!(s.history().len(), before);
        assert_eq!(s.selected().unwrap().scale_y, 1.0);
    }

    #[test]
    fn test_overflowing_scale_is_rejected() {
        let mut s = session();
        let id = add(&mut s, ObjectKind::Rectangle(Rectangle::new(100.0, 100.0)));
        s.scale_by(1e200).unwrap();
        let before = s.history().len();

        assert_eq!(s.scale_by(1e200), Err(EditorError::InvalidValue("result out of range")));
        assert_eq!(s.history().len(), before);
        let object = s.selected().unwrap();
        assert!(object.is_finite());
        assert_eq!(object.scale_x, 1e200);

        assert!(s.move_by(Vec2::new(f64::MAX, 0.0)).is_ok());
        assert!(s.move_by(Vec2::new(f64::MAX, 0.0)).is_err());

        let encoded = crate::codec::encode(s.document()).unwrap();
        assert!(crate::codec::decode(&encoded).unwrap().contains(id));
    }

    #[test]
    fn test_unsupported_properties() {
        let mut s = session();
        add(&mut s, ObjectKind::Image(Image::new("a.png", 10.0, 10.0)));
        assert_eq!(s.set_fill(None), Err(EditorError::Unsupported("fill")));
        assert_eq!(
            s.set_font_size(12.0),
            Err(EditorError::Unsupported("font size"))
        );
        add(&mut s, ObjectKind::Text(Text::new("hi")));
        assert_eq!(
            s.set_stroke_width(3.0),
            Err(EditorError::Unsupported("stroke width"))
        );
    }

    #[test]
    fn test_text_properties() {
        let mut s = session();
        add(&mut s, ObjectKind::Text(Text::new("hi")));
        s.set_font_family("Inter").unwrap();
        s.set_font_size(24.0).unwrap();
        s.set_text("Hello\nWorld").unwrap();
        let text = s.selected().unwrap().kind.as_text().unwrap().clone();
        assert_eq!(text.font_family, "Inter");
        assert_eq!(text.font_size, 24.0);
        assert_eq!(text.lines(), vec!["Hello", "World"]);
        assert!(s.set_font_size(0.0).is_err());
        assert!(s.set_font_family("  ").is_err());
    }

    #[test]
    fn test_lock_blocks_transforms_only() {
        let mut s = session();
        add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        s.lock().unwrap();
        assert_eq!(s.move_by(Vec2::new(5.0, 0.0)), Err(EditorError::Locked));
        assert_eq!(s.scale_by(2.0), Err(EditorError::Locked));
        assert_eq!(s.rotate_to(45.0), Err(EditorError::Locked));
        assert_eq!(s.set_width(50.0), Err(EditorError::Locked));
        assert_eq!(s.flip_horizontal(), Err(EditorError::Locked));

        s.set_fill_css("#ff0000").unwrap();
        s.set_animation(Animation::Bounce).unwrap();
        let copy = s.duplicate().unwrap();
        assert!(s.document().get(copy).unwrap().locked);
        s.delete().unwrap();

        let mut s2 = session();
        add(&mut s2, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        s2.lock().unwrap();
        s2.unlock().unwrap();
        s2.move_by(Vec2::new(5.0, 0.0)).unwrap();
    }

    #[test]
    fn test_rotation_is_normalized() {
        let mut s = session();
        add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        s.rotate_to(-90.0).unwrap();
        assert_eq!(s.selected().unwrap().angle, 270.0);
    }

    #[test]
    fn test_layering_boundaries() {
        let mut s = session();
        let a = add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        let b = add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        let before = s.history().len();

        assert_eq!(s.bring_forward(), Ok(false));
        assert_eq!(s.history().len(), before);

        assert_eq!(s.send_backward(), Ok(true));
        assert_eq!(s.document().index_of(b), Some(0));
        assert_eq!(s.send_backward(), Ok(false));
        assert_eq!(s.history().len(), before + 1);
        assert_eq!(s.document().index_of(a), Some(1));
    }

    #[test]
    fn test_duplicate_offsets_and_selects() {
        let mut s = session();
        let original = s.insert(
            CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)))
                .at(Point::new(20.0, 20.0)),
        );
        s.select(original).unwrap();
        let copy = s.duplicate().unwrap();
        assert_ne!(copy, original);
        assert_eq!(s.selection(), Some(copy));
        assert_eq!(s.document().objects.last().unwrap().id, copy);
        assert_eq!(s.selected().unwrap().origin(), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_slider_gesture_is_one_entry() {
        let mut s = session();
        add(&mut s, ObjectKind::Rectangle(Rectangle::new(10.0, 10.0)));
        let before = s.history().len();

        assert!(s.begin_gesture());
        for step in 1..=10 {
            s.set_opacity(1.0 - f64::from(step) * 0.05).unwrap();
        }
        assert!(s.end_gesture());
        assert_eq!(s.history().len(), before + 1);

        s.begin_gesture();
        s.set_opacity(0.1).unwrap();
        assert!(s.cancel_gesture());
        assert!((s.selected().unwrap().opacity - 0.5).abs() < 1e-12);
        assert_eq!(s.history().len(), before + 1);
    }
}
