//! # resmap-client
//!
//! Remote side of the resource map tag engine: the [`TagStore`] cache that
//! re-lists after every mutation, the move applier that turns a drop into a
//! committed reparent, and two [`TagBackend`] implementations (GraphQL over
//! HTTP, and an in-memory mock for tests).
//!
//! Re-exports everything from `resmap-core` so callers need one import.

pub mod applier;
pub mod graphql;
pub mod mock;
pub mod store;

pub use resmap_core::*;

pub use applier::{commit_move, finish_drag, MoveOutcome};
pub use graphql::{GraphQlBackend, GraphQlConfig};
pub use mock::MockTagBackend;
pub use store::TagStore;
