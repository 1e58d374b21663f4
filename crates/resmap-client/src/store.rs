//! Per-workspace, per-type cache of the tag list.
//!
//! The store never patches its list locally. Every successful mutation is
//! followed by a full re-list from the backend, and a failed mutation leaves
//! the list exactly as it was last fetched.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use resmap_core::defaults::MAX_DEPTH;
use resmap_core::{
    CreateTagRequest, Error, LocationMetadata, MoveRejection, Result, Tag, TagBackend, TagId,
    TagIndex, TagType, UpdateTagRequest, WorkspaceId,
};

/// Flat, hydrated tag list for one `(workspace, tag type)` pair.
pub struct TagStore {
    backend: Arc<dyn TagBackend>,
    workspace_id: WorkspaceId,
    tag_type: TagType,
    max_depth: usize,
    tags: Vec<Tag>,
}

impl TagStore {
    /// Create an empty store. Call [`TagStore::refresh`] to populate it.
    pub fn new(backend: Arc<dyn TagBackend>, workspace_id: WorkspaceId, tag_type: TagType) -> Self {
        Self {
            backend,
            workspace_id,
            tag_type,
            max_depth: MAX_DEPTH,
            tags: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Create a store and fetch its list.
    pub async fn load(
        backend: Arc<dyn TagBackend>,
        workspace_id: WorkspaceId,
        tag_type: TagType,
        max_depth: usize,
    ) -> Result<Self> {
        let mut store = Self::new(backend, workspace_id, tag_type).with_max_depth(max_depth);
        store.refresh().await?;
        Ok(store)
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The list as last fetched.
    pub fn list(&self) -> &[Tag] {
        &self.tags
    }

    pub fn get(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| &t.id == id)
    }

    /// Hierarchy view over the current list.
    pub fn index(&self) -> TagIndex<'_> {
        TagIndex::new(&self.tags)
    }

    /// Replace the list with a fresh fetch. Returns the number of tags.
    #[instrument(
        skip(self),
        fields(
            subsystem = "client",
            component = "tag_store",
            op = "refresh",
            workspace_id = %self.workspace_id,
            tag_type = %self.tag_type
        )
    )]
    pub async fn refresh(&mut self) -> Result<usize> {
        let start = Instant::now();
        let tags = self
            .backend
            .list_tags(&self.workspace_id, self.tag_type)
            .await?;
        self.tags = tags;

        debug!(
            result_count = self.tags.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag list refreshed"
        );
        Ok(self.tags.len())
    }

    /// Create a tag, optionally under `parent_id`.
    #[instrument(
        skip(self, location),
        fields(
            subsystem = "client",
            component = "tag_store",
            op = "create",
            workspace_id = %self.workspace_id,
            tag_type = %self.tag_type
        )
    )]
    pub async fn create(
        &mut self,
        value: &str,
        parent_id: Option<&TagId>,
        location: Option<LocationMetadata>,
    ) -> Result<Tag> {
        if let Some(parent_id) = parent_id {
            let index = self.index();
            self.require_parent(&index, parent_id)?;
            if index.depth_of(parent_id) + 1 >= self.max_depth {
                debug!(
                    target_id = %parent_id,
                    max_depth = self.max_depth,
                    rejection = MoveRejection::DepthExceeded.code(),
                    "Create rejected"
                );
                return Err(Error::MoveRejected(MoveRejection::DepthExceeded));
            }
        }

        let req = CreateTagRequest {
            workspace_id: self.workspace_id.clone(),
            value: value.to_string(),
            tag_type: self.tag_type,
            parent_id: parent_id.cloned(),
            location,
        };
        req.validate()?;

        let tag = self.backend.create_tag(req).await?;
        info!(tag_id = %tag.id, "Tag created");
        self.refresh_after("create").await;
        Ok(tag)
    }

    /// Apply a partial update. A parent change runs the move rules first.
    #[instrument(
        skip(self, req),
        fields(
            subsystem = "client",
            component = "tag_store",
            op = "update",
            workspace_id = %self.workspace_id,
            tag_type = %self.tag_type
        )
    )]
    pub async fn update(&mut self, id: &TagId, req: UpdateTagRequest) -> Result<Tag> {
        {
            let index = self.index();
            let tag = index
                .get(id)
                .ok_or_else(|| Error::TagNotFound(id.clone()))?;
            if req.is_empty() {
                debug!(tag_id = %id, "Empty update, nothing sent");
                return Ok(tag.clone());
            }
            req.validate(tag.tag_type)?;
            if let Some(parent_id) = &req.parent_id {
                if let Some(parent_id) = parent_id {
                    self.require_parent(&index, parent_id)?;
                }
                index.validate_reparent(id, parent_id.as_ref(), self.max_depth)?;
            }
        }

        let tag = self.backend.update_tag(id, req).await?;
        info!(tag_id = %id, "Tag updated");
        self.refresh_after("update").await;
        Ok(tag)
    }

    /// Delete a tag. `cascade` is passed through; the backend decides what
    /// happens to children. Returns whether the backend confirmed this id.
    #[instrument(
        skip(self),
        fields(
            subsystem = "client",
            component = "tag_store",
            op = "delete",
            workspace_id = %self.workspace_id,
            tag_type = %self.tag_type
        )
    )]
    pub async fn delete(&mut self, id: &TagId, cascade: bool) -> Result<bool> {
        if self.get(id).is_none() {
            return Err(Error::TagNotFound(id.clone()));
        }

        let resp = self.backend.delete_tag(id, cascade).await?;
        info!(tag_id = %id, cascade, "Tag deleted");
        self.refresh_after("delete").await;
        Ok(&resp.id == id)
    }

    /// Move a tag under `new_parent`, or to root when `None`. Returns whether
    /// the backend reports the requested parent afterwards.
    #[instrument(
        skip(self),
        fields(
            subsystem = "client",
            component = "tag_store",
            op = "reparent",
            workspace_id = %self.workspace_id,
            tag_type = %self.tag_type
        )
    )]
    pub async fn reparent(&mut self, id: &TagId, new_parent: Option<&TagId>) -> Result<bool> {
        {
            let index = self.index();
            if !index.contains(id) {
                return Err(Error::TagNotFound(id.clone()));
            }
            if let Some(parent_id) = new_parent {
                self.require_parent(&index, parent_id)?;
            }
            if let Err(reason) = index.validate_reparent(id, new_parent, self.max_depth) {
                debug!(
                    tag_id = %id,
                    rejection = reason.code(),
                    "Reparent rejected"
                );
                return Err(reason.into());
            }
        }

        let tag = self
            .backend
            .update_tag(id, UpdateTagRequest::parent(new_parent.cloned()))
            .await?;
        let applied = tag.parent_id.as_ref() == new_parent;
        if !applied {
            warn!(
                tag_id = %id,
                returned_parent = ?tag.parent_id,
                "Backend returned a different parent than requested"
            );
        }
        self.refresh_after("reparent").await;
        Ok(applied)
    }

    fn require_parent(&self, index: &TagIndex<'_>, parent_id: &TagId) -> Result<()> {
        if index.contains(parent_id) {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "Parent {} is not a {} tag in workspace {}",
                parent_id, self.tag_type, self.workspace_id
            )))
        }
    }

    /// Re-list after a mutation that already succeeded remotely. A failure
    /// here does not fail the mutation; the stale list stays until the next
    /// refresh.
    async fn refresh_after(&mut self, op: &str) {
        if let Err(e) = self.refresh().await {
            warn!(
                op,
                error = %e,
                "Re-list after mutation failed, keeping previous list"
            );
        }
    }
}
