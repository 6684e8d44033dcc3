//! File-based project store for native platforms.

use super::{BoxFuture, Project, ProjectStore, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as a JSON file in a directory.
pub struct FileProjectStore {
    base_path: PathBuf,
}

impl FileProjectStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/vitrine/projects/`
    /// On Windows: `%LOCALAPPDATA%\vitrine\projects\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("vitrine").join("projects"))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_stem(id)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Filename-safe form of a project id.
///
/// ASCII letters, digits and `-` pass through; every other byte becomes `_`
/// followed by two hex digits, so distinct ids never share a file.
fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02X}", byte));
        }
    }
    stem
}

impl ProjectStore for FileProjectStore {
    fn load_project(&self, id: &str) -> BoxFuture<'_, StorageResult<Project>> {
        let path = self.project_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn update_project(&self, project: &Project) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(&project.id);
        let json = match serde_json::to_string_pretty(project) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };
        Box::pin(async move {
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }
}
