//! GraphQL implementation of the remote tag store.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace, warn};

use resmap_core::defaults::{GRAPHQL_URL, REQUEST_TIMEOUT_SECS};
use resmap_core::{
    CreateTagRequest, DeleteTagResponse, Error, Result, Tag, TagBackend, TagId, TagType,
    UpdateTagRequest, WorkspaceId,
};

use super::error::{to_resmap_error, RemoteErrorCode};
use super::types::*;

/// Configuration for the GraphQL backend.
#[derive(Debug, Clone)]
pub struct GraphQlConfig {
    /// Full URL of the GraphQL endpoint.
    pub endpoint: String,
    /// Bearer token (optional for local endpoints).
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            endpoint: GRAPHQL_URL.to_string(),
            api_token: None,
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

impl GraphQlConfig {
    /// Read configuration from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | RESMAP_GRAPHQL_URL | http://localhost:4000/graphql |
    /// | RESMAP_API_TOKEN | (none) |
    /// | RESMAP_TIMEOUT | 30 |
    /// | RESMAP_SKIP_TLS_VERIFY | false |
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("RESMAP_GRAPHQL_URL")
                .unwrap_or_else(|_| GRAPHQL_URL.to_string()),
            api_token: std::env::var("RESMAP_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout_seconds: std::env::var("RESMAP_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            skip_tls_verify: std::env::var("RESMAP_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }
}

/// Remote tag store reached over GraphQL.
pub struct GraphQlBackend {
    client: Client,
    config: GraphQlConfig,
}

impl GraphQlBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: GraphQlConfig) -> Result<Self> {
        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(endpoint = %config.endpoint, "Initializing GraphQL tag backend");

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GraphQlConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GraphQlConfig {
        &self.config
    }

    /// POST one operation and unwrap its `data`.
    async fn execute<V, T>(&self, operation_name: &str, query: &str, variables: V) -> Result<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        let start = Instant::now();
        let body = GraphQlRequest {
            query,
            operation_name,
            variables,
        };

        let mut req = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json");
        if let Some(ref token) = self.config.api_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Request(format!("{} request failed: {}", operation_name, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Request(format!("{} response unreadable: {}", operation_name, e)))?;
        trace!(op = operation_name, status = status.as_u16(), body = %text, "GraphQL response");

        // Servers may answer a failed operation with a non-2xx status and a
        // GraphQL error body, so look at the envelope before the status.
        let parsed = serde_json::from_str::<GraphQlResponse<T>>(&text);

        if let Some(first) = parsed.as_ref().ok().and_then(|e| e.errors.first()) {
            let mut code = RemoteErrorCode::from_extension(first.code());
            if code == RemoteErrorCode::Unknown && !status.is_success() {
                code = RemoteErrorCode::from_status(status.as_u16());
            }
            warn!(
                op = operation_name,
                error = %first.message,
                retryable = code.is_retryable(),
                "GraphQL operation failed"
            );
            return Err(to_resmap_error(code, &first.message));
        }

        if !status.is_success() {
            let code = RemoteErrorCode::from_status(status.as_u16());
            warn!(
                op = operation_name,
                status = status.as_u16(),
                retryable = code.is_retryable(),
                "GraphQL endpoint returned error status"
            );
            return Err(to_resmap_error(
                code,
                &format!("{} returned {}", operation_name, status),
            ));
        }

        let data = match parsed {
            Ok(GraphQlResponse {
                data: Some(data), ..
            }) => data,
            Ok(_) => {
                return Err(Error::Remote(format!(
                    "{} returned no data",
                    operation_name
                )))
            }
            Err(e) => {
                return Err(Error::Serialization(format!(
                    "Failed to parse {} response: {}",
                    operation_name, e
                )))
            }
        };

        debug!(
            op = operation_name,
            duration_ms = start.elapsed().as_millis() as u64,
            "GraphQL operation completed"
        );
        Ok(data)
    }
}

#[async_trait]
impl TagBackend for GraphQlBackend {
    #[instrument(skip(self), fields(subsystem = "client", component = "graphql", op = "list_tags"))]
    async fn list_tags(&self, workspace_id: &WorkspaceId, tag_type: TagType) -> Result<Vec<Tag>> {
        let data: ListTagsData = self
            .execute(
                "ListTags",
                LIST_TAGS_QUERY,
                ListTagsVariables {
                    workspace_id,
                    tag_type,
                },
            )
            .await?;

        debug!(result_count = data.list_tags.len(), "Listed tags");
        Ok(data.list_tags)
    }

    #[instrument(
        skip(self, req),
        fields(subsystem = "client", component = "graphql", op = "create_tag")
    )]
    async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag> {
        let data: CreateTagData = self
            .execute(
                "CreateTag",
                CREATE_TAG_MUTATION,
                CreateTagVariables { input: &req },
            )
            .await?;
        Ok(data.create_tag)
    }

    #[instrument(
        skip(self, req),
        fields(subsystem = "client", component = "graphql", op = "update_tag")
    )]
    async fn update_tag(&self, id: &TagId, req: UpdateTagRequest) -> Result<Tag> {
        let data: UpdateTagData = self
            .execute(
                "UpdateTag",
                UPDATE_TAG_MUTATION,
                UpdateTagVariables { id, input: &req },
            )
            .await?;
        Ok(data.update_tag)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "graphql", op = "delete_tag"))]
    async fn delete_tag(&self, id: &TagId, cascade: bool) -> Result<DeleteTagResponse> {
        let data: DeleteTagData = self
            .execute(
                "DeleteTag",
                DELETE_TAG_MUTATION,
                DeleteTagVariables { id, cascade },
            )
            .await?;
        Ok(data.delete_tag)
    }
}
