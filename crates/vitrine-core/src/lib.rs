//! Vitrine Core Library
//!
//! Canvas documents for portfolio pages: the object model, the persisted
//! format, and the editing session that builds documents from pointer input.

pub mod canvas;
pub mod clipboard;
pub mod codec;
pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod media;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use canvas::CanvasDocument;
pub use clipboard::Clipboard;
pub use codec::{DecodeError, EncodeError, decode, decode_or_none, encode};
pub use config::{ConfigError, EditorConfig, StyleDefaults};
pub use editor::{EditorError, EditorSession, SaveError};
pub use history::{History, HistorySnapshot};
pub use input::{Command, Modifiers, PointerEvent};
pub use media::{InlineEmbedder, MediaFile, MediaKind, MediaUploader, PlacedMedia, UploadError};
pub use shapes::{Animation, CanvasObject, ObjectId, ObjectKind, SerializableColor};
pub use storage::{MemoryProjectStore, Project, ProjectStore, StorageError};
pub use tools::{PlacementMachine, PlacementState, ToolKind};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileProjectStore;
