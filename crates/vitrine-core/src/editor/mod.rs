//! Editing session: one open canvas with its history, selection, clipboard
//! and placement tool.
//!
//! Every discrete change ends in [`EditorSession::commit`], which pushes one
//! history snapshot when the document actually changed. Continuous input is
//! wrapped in a gesture so the whole drag or slider sweep becomes a single
//! snapshot.

mod manipulation;

use crate::canvas::CanvasDocument;
use crate::clipboard::Clipboard;
use crate::codec::{self, EncodeError};
use crate::config::EditorConfig;
use crate::history::History;
use crate::input::{Command, Modifiers, PointerEvent, shortcut};
use crate::media::{self, MediaFile, MediaUploader, UploadError};
use crate::shapes::{CanvasObject, ObjectId};
use crate::storage::{Project, ProjectStore, StorageError};
use crate::tools::{PlacementMachine, ToolKind};
use kurbo::{Point, Vec2};
use std::sync::Arc;
use thiserror::Error;

/// Rejected editing operation. The document is unchanged when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("No object selected")]
    NoSelection,
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("Object is locked")]
    Locked,
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),
    #[error("Invalid {0}")]
    InvalidValue(&'static str),
    #[error(transparent)]
    Color(#[from] crate::shapes::ColorParseError),
}

/// Failure to write the canvas back to its project.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Session has no project to save to")]
    NoProject,
}

/// Select-tool drag in progress.
#[derive(Debug, Clone)]
struct DragState {
    object_id: ObjectId,
    start_point: Point,
    start_origin: Point,
}

/// An open canvas being edited.
pub struct EditorSession {
    document: CanvasDocument,
    history: History,
    clipboard: Clipboard,
    selection: Option<ObjectId>,
    placement: PlacementMachine,
    config: EditorConfig,
    /// Snapshot the current gesture started from.
    gesture_base: Option<Arc<CanvasDocument>>,
    drag: Option<DragState>,
    project: Option<Project>,
    /// History sequence number last written to the store.
    saved_seq: u64,
    pointer: Point,
}

impl EditorSession {
    /// Start a session on a blank document sized by `config`.
    pub fn new(config: EditorConfig) -> Self {
        let document = CanvasDocument::new(config.default_width, config.default_height);
        Self::with_document(document, config)
    }

    /// Start a session on an existing document. It becomes the history base.
    pub fn with_document(document: CanvasDocument, config: EditorConfig) -> Self {
        let history = History::new(document.clone(), config.history_limit);
        let saved_seq = history.current().seq;
        Self {
            document,
            history,
            clipboard: Clipboard::new(config.paste_offset),
            selection: None,
            placement: PlacementMachine::new(
                config.style.clone(),
                config.ghost_opacity,
                config.max_image_size,
            ),
            config,
            gesture_base: None,
            drag: None,
            project: None,
            saved_seq,
            pointer: Point::ZERO,
        }
    }

    /// Load a project and open its canvas.
    ///
    /// Missing or unreadable canvas content opens a blank document; only a
    /// failure to fetch the project itself is an error.
    pub async fn open(
        store: &dyn ProjectStore,
        project_id: &str,
        config: EditorConfig,
    ) -> Result<Self, StorageError> {
        let project = store.load_project(project_id).await?;
        let document = project
            .canvas_content
            .as_deref()
            .and_then(codec::decode_or_none);
        let mut session = match document {
            Some(document) => {
                log::info!(
                    "Opened project {} ({} objects)",
                    project.id,
                    document.len()
                );
                Self::with_document(document, config)
            }
            None => {
                log::info!("Opened project {} with a blank canvas", project.id);
                Self::new(config)
            }
        };
        session.project = Some(project);
        Ok(session)
    }

    /// Encode the document and write it back to the project, leaving every
    /// other project field as loaded.
    ///
    /// On failure the session is untouched and the save can be retried.
    pub async fn save(&mut self, store: &dyn ProjectStore) -> Result<(), SaveError> {
        let Some(project) = &self.project else {
            return Err(SaveError::NoProject);
        };
        let content = codec::encode(&self.document).inspect_err(|e| {
            log::error!("Failed to encode canvas: {}", e);
        })?;
        let mut updated = project.clone();
        updated.canvas_content = Some(content);
        store.update_project(&updated).await.inspect_err(|e| {
            log::error!("Failed to save project {}: {}", updated.id, e);
        })?;

        log::info!("Saved project {}", updated.id);
        self.project = Some(updated);
        self.saved_seq = self.history.current().seq;
        Ok(())
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn placement(&self) -> &PlacementMachine {
        &self.placement
    }

    /// Placement preview, drawn on top of the document but never part of it.
    pub fn ghost(&self) -> Option<&CanvasObject> {
        self.placement.ghost()
    }

    pub fn tool(&self) -> ToolKind {
        self.placement.tool()
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn selected(&self) -> Option<&CanvasObject> {
        self.selection.and_then(|id| self.document.get(id))
    }

    /// Check if there are changes since the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.history.current().seq != self.saved_seq
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Record the document in history if it changed.
    ///
    /// Inside a gesture nothing is recorded until the gesture ends.
    fn commit(&mut self) -> bool {
        if self.gesture_base.is_some() {
            return false;
        }
        if *self.history.current().document == self.document {
            return false;
        }
        self.history.push(self.document.clone());
        true
    }

    /// Start batching changes into one history entry.
    ///
    /// Returns false if a gesture is already running.
    pub fn begin_gesture(&mut self) -> bool {
        if self.gesture_base.is_some() {
            return false;
        }
        self.gesture_base = Some(Arc::clone(&self.history.current().document));
        log::debug!("Gesture started");
        true
    }

    /// Finish the gesture. Returns true if a history entry was pushed.
    pub fn end_gesture(&mut self) -> bool {
        if self.gesture_base.take().is_none() {
            return false;
        }
        self.drag = None;
        let pushed = self.commit();
        log::debug!("Gesture ended (pushed: {})", pushed);
        pushed
    }

    /// Abandon the gesture, restoring the document it started from.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(base) = self.gesture_base.take() else {
            return false;
        };
        self.drag = None;
        self.document = (*base).clone();
        self.retain_selection();
        log::debug!("Gesture cancelled");
        true
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture_base.is_some()
    }

    /// Choose a tool. Image and video tools are chosen by
    /// [`EditorSession::attach_media`] instead.
    pub fn set_tool(&mut self, tool: ToolKind) -> Result<(), EditorError> {
        if tool.requires_media() {
            return Err(EditorError::Unsupported("choosing a media tool without media"));
        }
        self.end_gesture();
        self.placement.arm(tool);
        Ok(())
    }

    /// Read and upload a media file, then start placing it.
    ///
    /// Nothing is inserted and the tool returns to idle if any step fails.
    pub async fn attach_media(
        &mut self,
        tool: ToolKind,
        file: &MediaFile,
        uploader: &dyn MediaUploader,
    ) -> Result<(), UploadError> {
        let want_video = match tool {
            ToolKind::Image => false,
            ToolKind::Video => true,
            other => return Err(UploadError::NotMediaTool(other)),
        };
        self.end_gesture();
        self.placement.cancel();

        match media::ingest(file, want_video, self.config.video_size, uploader).await {
            Ok(placed) => {
                self.placement.arm_with_media(placed, self.pointer);
                Ok(())
            }
            Err(e) => {
                log::error!("Media attachment failed: {}", e);
                Err(e)
            }
        }
    }

    /// Abandon any placement in progress. Never touches the document.
    pub fn cancel_placement(&mut self) -> bool {
        self.placement.cancel()
    }

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.pointer = point;
        if self.placement.is_active() {
            if let Some(object) = self.placement.pointer_down(point) {
                let tag = object.kind.tag();
                let id = self.document.add_object(object);
                self.selection = Some(id);
                self.commit();
                log::info!("Placed {} {}", tag, id);
            }
            return;
        }

        self.selection = self.document.object_at(point, self.config.hit_tolerance);
        let Some(object) = self.selected() else {
            return;
        };
        if object.locked {
            return;
        }
        let drag = DragState {
            object_id: object.id,
            start_point: point,
            start_origin: object.origin(),
        };
        self.begin_gesture();
        self.drag = Some(drag);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.pointer = point;
        if self.placement.is_active() {
            self.placement.pointer_move(point);
            return;
        }
        let Some(drag) = &self.drag else {
            return;
        };
        let target = drag.start_origin + (point - drag.start_point);
        if let Some(object) = self.document.get_mut(drag.object_id) {
            object.left = target.x;
            object.top = target.y;
        }
    }

    pub fn pointer_up(&mut self, point: Point) {
        self.pointer_move(point);
        if self.drag.is_some() {
            self.end_gesture();
        }
    }

    /// Handle a key press by name.
    ///
    /// Returns the command that ran, if the key was bound to one.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
    ) -> Result<Option<Command>, EditorError> {
        let Some(command) = shortcut(key, modifiers) else {
            return Ok(None);
        };
        match command {
            Command::Cancel => self.escape(),
            Command::Delete => {
                if self.selection.is_some() {
                    self.delete()?;
                }
            }
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Copy => {
                self.copy();
            }
            Command::Paste => {
                self.paste();
            }
            Command::Duplicate => {
                self.duplicate()?;
            }
            Command::BringForward => {
                self.bring_forward()?;
            }
            Command::SendBackward => {
                self.send_backward()?;
            }
        }
        Ok(Some(command))
    }

    /// Escape: cancel a placement, else a gesture, else drop the selection.
    fn escape(&mut self) {
        if self.placement.cancel() {
            return;
        }
        if self.cancel_gesture() {
            return;
        }
        self.clear_selection();
    }

    /// Step back one history entry. Returns false at the base.
    pub fn undo(&mut self) -> bool {
        self.placement.cancel();
        self.cancel_gesture();
        let Some(document) = self.history.undo() else {
            return false;
        };
        self.document = document.clone();
        self.retain_selection();
        true
    }

    /// Step forward one history entry. Returns false at the tip.
    pub fn redo(&mut self) -> bool {
        self.placement.cancel();
        self.cancel_gesture();
        let Some(document) = self.history.redo() else {
            return false;
        };
        self.document = document.clone();
        self.retain_selection();
        true
    }

    /// Drop the selection if its object no longer exists.
    fn retain_selection(&mut self) {
        if let Some(id) = self.selection {
            if !self.document.contains(id) {
                self.selection = None;
            }
        }
    }

    /// Copy the selected object. Returns false without a selection.
    pub fn copy(&mut self) -> bool {
        match self.selected() {
            Some(object) => {
                let object = object.clone();
                self.clipboard.copy(&object);
                true
            }
            None => false,
        }
    }

    /// Paste the clipboard on top of the stack and select it.
    pub fn paste(&mut self) -> Option<ObjectId> {
        let object = self.clipboard.paste()?;
        let id = self.document.add_object(object);
        self.selection = Some(id);
        self.commit();
        Some(id)
    }

    /// Place an object directly, bypassing the placement tools.
    pub fn insert(&mut self, object: CanvasObject) -> ObjectId {
        let id = self.document.add_object(object);
        self.commit();
        id
    }

    fn selected_id(&self) -> Result<ObjectId, EditorError> {
        let id = self.selection.ok_or(EditorError::NoSelection)?;
        if !self.document.contains(id) {
            return Err(EditorError::ObjectNotFound(id));
        }
        Ok(id)
    }

    /// Apply `f` to a copy of the selected object and commit it.
    ///
    /// The object is left as it was if `f` fails or leaves a number that
    /// cannot be persisted.
    fn edit<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut CanvasObject) -> Result<(), EditorError>,
    {
        let id = self.selected_id()?;
        let object = self
            .document
            .get_mut(id)
            .ok_or(EditorError::ObjectNotFound(id))?;
        let mut edited = object.clone();
        f(&mut edited)?;
        if !edited.is_finite() {
            return Err(EditorError::InvalidValue("result out of range"));
        }
        *object = edited;
        self.commit();
        Ok(())
    }

    /// Like [`Self::edit`] but refused for locked objects.
    fn edit_unlocked<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut CanvasObject) -> Result<(), EditorError>,
    {
        self.edit(|object| {
            if object.locked {
                return Err(EditorError::Locked);
            }
            f(object)
        })
    }

    /// Move the selected object by `delta`.
    pub fn move_by(&mut self, delta: Vec2) -> Result<(), EditorError> {
        if !delta.is_finite() {
            return Err(EditorError::InvalidValue("offset"));
        }
        self.edit_unlocked(|object| {
            object.translate(delta);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ObjectKind, Rectangle};

    fn session_with_rect() -> (EditorSession, ObjectId) {
        let mut session = EditorSession::new(EditorConfig::default());
        let rect = CanvasObject::new(ObjectKind::Rectangle(Rectangle::new(100.0, 100.0)))
            .at(Point::new(50.0, 50.0));
        let id = session.insert(rect);
        (session, id)
    }

    #[test]
    fn test_blank_session() {
        let session = EditorSession::new(EditorConfig::default());
        assert!(session.document().is_empty());
        assert_eq!(session.document().width, 900.0);
        assert!(!session.can_undo());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_drag_is_one_history_entry() {
        let (mut session, id) = session_with_rect();
        let before = session.history().len();

        session.pointer_down(Point::new(60.0, 60.0));
        assert_eq!(session.selection(), Some(id));
        session.pointer_move(Point::new(70.0, 60.0));
        session.pointer_move(Point::new(80.0, 65.0));
        session.pointer_up(Point::new(90.0, 70.0));

        assert_eq!(session.history().len(), before + 1);
        assert_eq!(session.selected().unwrap().origin(), Point::new(80.0, 60.0));
    }

    #[test]
    fn test_click_without_move_pushes_nothing() {
        let (mut session, _) = session_with_rect();
        let before = session.history().len();
        session.pointer_down(Point::new(60.0, 60.0));
        session.pointer_up(Point::new(60.0, 60.0));
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let (mut session, _) = session_with_rect();
        session.pointer_down(Point::new(60.0, 60.0));
        session.pointer_up(Point::new(60.0, 60.0));
        session.pointer_down(Point::new(600.0, 400.0));
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_escape_cancels_drag() {
        let (mut session, _) = session_with_rect();
        session.pointer_down(Point::new(60.0, 60.0));
        session.pointer_move(Point::new(160.0, 60.0));
        session.handle_key("Escape", Modifiers::NONE).unwrap();
        assert_eq!(session.selected().unwrap().origin(), Point::new(50.0, 50.0));
        assert!(!session.is_gesture_active());
    }

    #[test]
    fn test_media_tools_cannot_be_chosen_directly() {
        let mut session = EditorSession::new(EditorConfig::default());
        assert!(matches!(
            session.set_tool(ToolKind::Video),
            Err(EditorError::Unsupported(_))
        ));
    }

    #[test]
    fn test_save_without_project() {
        let mut session = EditorSession::new(EditorConfig::default());
        let store = crate::storage::MemoryProjectStore::new();
        let result = pollster::block_on(session.save(&store));
        assert!(matches!(result, Err(SaveError::NoProject)));
    }
}
