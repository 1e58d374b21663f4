//! GraphQL remote tag store.
//!
//! Speaks the four operations the resource map API exposes for tags:
//!
//! - `ListTags(workspaceId, tagType)`
//! - `CreateTag(input)`
//! - `UpdateTag(id, input)`
//! - `DeleteTag(id, cascade)`
//!
//! # Example
//!
//! ```rust,no_run
//! use resmap_client::graphql::{GraphQlBackend, GraphQlConfig};
//! use resmap_core::{TagBackend, TagType, WorkspaceId};
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = GraphQlBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = GraphQlConfig {
//!         endpoint: "https://api.example.com/graphql".to_string(),
//!         api_token: Some("secret".to_string()),
//!         timeout_seconds: 10,
//!         skip_tls_verify: false,
//!     };
//!     let backend = GraphQlBackend::new(config).unwrap();
//!
//!     let tags = backend
//!         .list_tags(&WorkspaceId::new("ws-1"), TagType::Location)
//!         .await
//!         .unwrap();
//!     println!("{} locations", tags.len());
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{GraphQlBackend, GraphQlConfig};
pub use error::{to_resmap_error, RemoteErrorCode};
pub use types::*;
