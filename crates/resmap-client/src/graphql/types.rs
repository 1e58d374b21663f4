//! GraphQL request and response types, and the operation documents.

use serde::{Deserialize, Serialize};

use resmap_core::{
    CreateTagRequest, DeleteTagResponse, Tag, TagId, TagType, UpdateTagRequest, WorkspaceId,
};

// =============================================================================
// OPERATION DOCUMENTS
// =============================================================================

pub const LIST_TAGS_QUERY: &str = "query ListTags($workspaceId: ID!, $tagType: TagType!) {
  listTags(workspaceId: $workspaceId, tagType: $tagType) { id value tagType parentId path location }
}";

pub const CREATE_TAG_MUTATION: &str = "mutation CreateTag($input: CreateTagInput!) {
  createTag(input: $input) { id value tagType parentId path location }
}";

pub const UPDATE_TAG_MUTATION: &str = "mutation UpdateTag($id: ID!, $input: UpdateTagInput!) {
  updateTag(id: $id, input: $input) { id value tagType parentId path location }
}";

pub const DELETE_TAG_MUTATION: &str = "mutation DeleteTag($id: ID!, $cascade: Boolean!) {
  deleteTag(id: $id, cascade: $cascade) { id }
}";

// =============================================================================
// ENVELOPES
// =============================================================================

/// Body POSTed to the GraphQL endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: V,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

impl GraphQlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

// =============================================================================
// VARIABLES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsVariables<'a> {
    pub workspace_id: &'a WorkspaceId,
    pub tag_type: TagType,
}

#[derive(Debug, Serialize)]
pub struct CreateTagVariables<'a> {
    pub input: &'a CreateTagRequest,
}

#[derive(Debug, Serialize)]
pub struct UpdateTagVariables<'a> {
    pub id: &'a TagId,
    pub input: &'a UpdateTagRequest,
}

#[derive(Debug, Serialize)]
pub struct DeleteTagVariables<'a> {
    pub id: &'a TagId,
    pub cascade: bool,
}

// =============================================================================
// DATA PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsData {
    pub list_tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagData {
    pub create_tag: Tag,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagData {
    pub update_tag: Tag,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTagData {
    pub delete_tag: DeleteTagResponse,
}
