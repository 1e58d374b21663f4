//! Remote store contract.
//!
//! The engine never persists anything itself. Every create, update, delete
//! and list goes through a [`TagBackend`], which the client crate implements
//! over GraphQL and as an in-memory mock.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CreateTagRequest, DeleteTagResponse, Tag, TagId, TagType, UpdateTagRequest, WorkspaceId,
};

/// Remote tag store.
#[async_trait]
pub trait TagBackend: Send + Sync {
    /// All tags of one type in a workspace, fully hydrated.
    async fn list_tags(&self, workspace_id: &WorkspaceId, tag_type: TagType) -> Result<Vec<Tag>>;

    /// Create a tag; the store assigns the id and derives the path.
    async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag>;

    /// Apply a partial update.
    async fn update_tag(&self, id: &TagId, req: UpdateTagRequest) -> Result<Tag>;

    /// Delete a tag. Whether children are removed or the call is refused is
    /// the store's decision, steered by `cascade`.
    async fn delete_tag(&self, id: &TagId, cascade: bool) -> Result<DeleteTagResponse>;
}
