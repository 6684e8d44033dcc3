//! Project storage: where canvas content is loaded from and saved to.
//!
//! The editor only touches a project's `canvas_content` field; every other
//! field is carried through untouched.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryProjectStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileProjectStore;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A portfolio project as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Encoded canvas document, absent for a project never edited.
    #[serde(default)]
    pub canvas_content: Option<String>,
    /// Everything else the backend keeps on a project.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Project {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            canvas_content: None,
            fields: Map::new(),
        }
    }

    /// Builder: set the stored canvas content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.canvas_content = Some(content.into());
        self
    }
}

/// Trait for project storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait ProjectStore: Send + Sync {
    /// Fetch a project by id.
    fn load_project(&self, id: &str) -> BoxFuture<'_, StorageResult<Project>>;

    /// Write a project back, replacing the stored record.
    fn update_project(&self, project: &Project) -> BoxFuture<'_, StorageResult<()>>;
}

/// Trait for project storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait ProjectStore {
    /// Fetch a project by id.
    fn load_project(&self, id: &str) -> BoxFuture<'_, StorageResult<Project>>;

    /// Write a project back, replacing the stored record.
    fn update_project(&self, project: &Project) -> BoxFuture<'_, StorageResult<()>>;
}
