//! In-memory project store.

use super::{BoxFuture, Project, ProjectStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<String, Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a project.
    pub fn insert(&self, project: Project) -> StorageResult<()> {
        let mut projects = self
            .projects
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    /// Current stored copy of a project.
    pub fn get(&self, id: &str) -> Option<Project> {
        self.projects.read().ok()?.get(id).cloned()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn load_project(&self, id: &str) -> BoxFuture<'_, StorageResult<Project>> {
        let id = id.to_string();
        Box::pin(async move {
            let projects = self
                .projects
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            projects
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn update_project(&self, project: &Project) -> BoxFuture<'_, StorageResult<()>> {
        let project = project.clone();
        Box::pin(async move { self.insert(project) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_update_and_load() {
        let store = MemoryProjectStore::new();
        let project = Project::new("p1", "Showreel").with_content("{}");

        block_on(store.update_project(&project)).unwrap();
        let loaded = block_on(store.load_project("p1")).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryProjectStore::new();
        let result = block_on(store.load_project("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_update_replaces() {
        let store = MemoryProjectStore::new();
        store.insert(Project::new("p1", "Old")).unwrap();
        block_on(store.update_project(&Project::new("p1", "New"))).unwrap();
        assert_eq!(store.get("p1").unwrap().title, "New");
    }
}
