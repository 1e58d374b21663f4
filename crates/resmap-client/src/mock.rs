//! In-memory tag store for deterministic testing.
//!
//! Behaves like the remote store: assigns ids, derives `path`, refuses
//! cycles and cross-type parents, and applies the `cascade` delete policy
//! (cascade removes the subtree, otherwise a tag with children is refused).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use resmap_client::mock::MockTagBackend;
//! use resmap_client::{Tag, TagStore, TagType};
//!
//! # async fn demo() -> resmap_client::Result<()> {
//! let backend = MockTagBackend::new()
//!     .with_tags("ws", vec![Tag::new("r", "Austin", TagType::Location)]);
//! let mut store = TagStore::new(Arc::new(backend.clone()), "ws".into(), TagType::Location);
//! store.refresh().await?;
//! assert_eq!(store.list().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use resmap_core::{
    CreateTagRequest, DeleteTagResponse, Error, Result, Tag, TagBackend, TagId, TagIndex,
    TagType, UpdateTagRequest, WorkspaceId,
};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub operation: String,
    /// Tag id for mutations, `workspace/TYPE` for lists.
    pub subject: String,
}

#[derive(Debug, Default)]
struct MockState {
    tags: HashMap<WorkspaceId, Vec<Tag>>,
    failures: HashMap<String, String>,
    calls: Vec<MockCall>,
}

/// Mock remote tag store.
#[derive(Clone, Default)]
pub struct MockTagBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockTagBackend {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a workspace. Paths are derived from the parent chain.
    pub fn with_tags(self, workspace_id: &str, tags: Vec<Tag>) -> Self {
        {
            let mut state = self.lock();
            let list = state.tags.entry(WorkspaceId::new(workspace_id)).or_default();
            list.extend(tags);
            derive_paths(list);
        }
        self
    }

    /// Make every call of `operation` fail with a remote error until cleared.
    /// Operations: "list_tags", "create_tag", "update_tag", "delete_tag".
    pub fn fail_on(&self, operation: &str, message: impl Into<String>) {
        self.lock()
            .failures
            .insert(operation.to_string(), message.into());
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Replace a workspace's tags without going through the API, as another
    /// session editing concurrently would.
    pub fn replace_tags(&self, workspace_id: &str, tags: Vec<Tag>) {
        let mut state = self.lock();
        let list = state.tags.entry(WorkspaceId::new(workspace_id)).or_default();
        *list = tags;
        derive_paths(list);
    }

    /// Snapshot of a workspace's tags of one type.
    pub fn tags(&self, workspace_id: &str, tag_type: TagType) -> Vec<Tag> {
        self.lock()
            .tags
            .get(&WorkspaceId::new(workspace_id))
            .map(|list| {
                list.iter()
                    .filter(|t| t.tag_type == tag_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.lock().calls.clear()
    }

    /// Number of calls of one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Number of mutating calls (everything but lists).
    pub fn mutation_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation != "list_tags")
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Recover from poisoning left by a panicking test.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log the call and return the injected failure, if any.
    fn begin(&self, state: &mut MockState, operation: &str, subject: String) -> Result<()> {
        state.calls.push(MockCall {
            operation: operation.to_string(),
            subject,
        });
        match state.failures.get(operation) {
            Some(message) => Err(Error::Remote(message.clone())),
            None => Ok(()),
        }
    }
}

/// Recompute every tag's path from its parent chain.
fn derive_paths(tags: &mut [Tag]) {
    let paths: Vec<Vec<String>> = {
        let index = TagIndex::new(tags);
        tags.iter()
            .map(|t| {
                let mut path: Vec<String> = index
                    .ancestors(&t.id)
                    .iter()
                    .rev()
                    .map(|a| a.value.clone())
                    .collect();
                path.push(t.value.clone());
                path
            })
            .collect()
    };
    for (tag, path) in tags.iter_mut().zip(paths) {
        tag.path = path;
    }
}

/// Locate a tag across workspaces.
fn find_tag<'a>(state: &'a mut MockState, id: &TagId) -> Option<(&'a mut Vec<Tag>, usize)> {
    state.tags.values_mut().find_map(|list| {
        let pos = list.iter().position(|t| &t.id == id)?;
        Some((list, pos))
    })
}

/// Parent must exist in the same workspace with the same type.
fn check_parent(list: &[Tag], parent_id: &TagId, tag_type: TagType) -> Result<()> {
    match list.iter().find(|t| &t.id == parent_id) {
        Some(parent) if parent.tag_type == tag_type => Ok(()),
        Some(parent) => Err(Error::Remote(format!(
            "Rejected input: parent {} is a {} tag",
            parent_id, parent.tag_type
        ))),
        None => Err(Error::NotFound(format!("parent {}", parent_id))),
    }
}

#[async_trait]
impl TagBackend for MockTagBackend {
    async fn list_tags(&self, workspace_id: &WorkspaceId, tag_type: TagType) -> Result<Vec<Tag>> {
        let mut state = self.lock();
        self.begin(
            &mut state,
            "list_tags",
            format!("{}/{}", workspace_id, tag_type),
        )?;
        Ok(state
            .tags
            .get(workspace_id)
            .map(|list| {
                list.iter()
                    .filter(|t| t.tag_type == tag_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag> {
        let mut state = self.lock();
        self.begin(&mut state, "create_tag", req.value.clone())?;
        req.validate()
            .map_err(|e| Error::Remote(format!("Rejected input: {}", e)))?;

        let list = state.tags.entry(req.workspace_id.clone()).or_default();
        if let Some(parent_id) = &req.parent_id {
            check_parent(list, parent_id, req.tag_type)?;
        }

        let mut tag = Tag::new(Uuid::now_v7().to_string(), req.value, req.tag_type);
        tag.parent_id = req.parent_id;
        tag.location_metadata = req.location;
        let id = tag.id.clone();
        list.push(tag);
        derive_paths(list);

        list.iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::Remote("created tag vanished".to_string()))
    }

    async fn update_tag(&self, id: &TagId, req: UpdateTagRequest) -> Result<Tag> {
        let mut state = self.lock();
        self.begin(&mut state, "update_tag", id.to_string())?;

        let (list, pos) =
            find_tag(&mut state, id).ok_or_else(|| Error::NotFound(format!("tag {}", id)))?;
        let tag_type = list[pos].tag_type;
        req.validate(tag_type)
            .map_err(|e| Error::Remote(format!("Rejected input: {}", e)))?;

        if let Some(Some(parent_id)) = &req.parent_id {
            check_parent(list, parent_id, tag_type)?;
            let index = TagIndex::new(list);
            if parent_id == id || index.has_ancestor(parent_id, id) {
                return Err(Error::Remote(format!(
                    "Rejected input: moving {} under {} would create a cycle",
                    id, parent_id
                )));
            }
        }

        let tag = &mut list[pos];
        if let Some(value) = req.value {
            tag.value = value;
        }
        if let Some(parent_id) = req.parent_id {
            tag.parent_id = parent_id;
        }
        if let Some(location) = req.location {
            tag.location_metadata = location;
        }
        derive_paths(list);
        Ok(list[pos].clone())
    }

    async fn delete_tag(&self, id: &TagId, cascade: bool) -> Result<DeleteTagResponse> {
        let mut state = self.lock();
        self.begin(&mut state, "delete_tag", id.to_string())?;

        let (list, _) =
            find_tag(&mut state, id).ok_or_else(|| Error::NotFound(format!("tag {}", id)))?;

        let doomed: HashSet<TagId> = {
            let index = TagIndex::new(list);
            let below = index.descendants(id);
            if !below.is_empty() && !cascade {
                return Err(Error::Remote(format!(
                    "Rejected input: tag {} has {} descendant(s)",
                    id,
                    below.len()
                )));
            }
            below
                .iter()
                .map(|t| t.id.clone())
                .chain(std::iter::once(id.clone()))
                .collect()
        };
        list.retain(|t| !doomed.contains(&t.id));
        derive_paths(list);

        Ok(DeleteTagResponse { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MockTagBackend {
        MockTagBackend::new().with_tags(
            "ws",
            vec![
                Tag::new("r", "Austin", TagType::Location),
                Tag::new("a", "Warehouse", TagType::Location).with_parent("r"),
                Tag::new("b", "Dock", TagType::Location).with_parent("a"),
                Tag::new("role", "Driver", TagType::Role),
            ],
        )
    }

    #[tokio::test]
    async fn test_list_filters_by_type_and_workspace() {
        let backend = seeded();
        let ws = WorkspaceId::new("ws");
        assert_eq!(backend.list_tags(&ws, TagType::Location).await.unwrap().len(), 3);
        assert_eq!(backend.list_tags(&ws, TagType::Role).await.unwrap().len(), 1);
        assert!(backend
            .list_tags(&WorkspaceId::new("other"), TagType::Role)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(backend.call_count("list_tags"), 3);
    }

    #[tokio::test]
    async fn test_paths_are_derived() {
        let backend = seeded();
        let tags = backend.tags("ws", TagType::Location);
        assert_eq!(tags[2].path, vec!["Austin", "Warehouse", "Dock"]);
    }

    #[tokio::test]
    async fn test_update_parent_rederives_paths() {
        let backend = seeded();
        let moved = backend
            .update_tag(&"b".into(), UpdateTagRequest::parent(Some("r".into())))
            .await
            .unwrap();
        assert_eq!(moved.path, vec!["Austin", "Dock"]);
    }

    #[tokio::test]
    async fn test_update_refuses_cycle_and_cross_type_parent() {
        let backend = seeded();
        let err = backend
            .update_tag(&"r".into(), UpdateTagRequest::parent(Some("b".into())))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cycle"));

        let err = backend
            .update_tag(&"a".into(), UpdateTagRequest::parent(Some("role".into())))
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_delete_without_cascade_refuses_parent() {
        let backend = seeded();
        assert!(backend.delete_tag(&"a".into(), false).await.is_err());
        assert_eq!(backend.tags("ws", TagType::Location).len(), 3);
    }

    #[tokio::test]
    async fn test_delete_with_cascade_removes_subtree() {
        let backend = seeded();
        let resp = backend.delete_tag(&"a".into(), true).await.unwrap();
        assert_eq!(resp.id, TagId::from("a"));
        let ids: Vec<String> = backend
            .tags("ws", TagType::Location)
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["r"]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let backend = seeded();
        backend.fail_on("create_tag", "database unavailable");
        let err = backend
            .create_tag(CreateTagRequest {
                workspace_id: "ws".into(),
                value: "New".into(),
                tag_type: TagType::Role,
                parent_id: None,
                location: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Remote store error: database unavailable");
        assert_eq!(backend.call_count("create_tag"), 1);

        backend.clear_failures();
        assert!(backend.list_tags(&"ws".into(), TagType::Role).await.is_ok());
    }
}
