//! # resmap-core
//!
//! Core types, hierarchy rules, and the remote store contract for the
//! resource map: three independent forests of tags (locations, business
//! units, roles).
//!
//! Everything here is synchronous and side-effect free except the
//! [`TagBackend`] trait, which concrete clients implement.

pub mod defaults;
pub mod drag;
pub mod error;
pub mod forest;
pub mod hierarchy;
pub mod logging;
pub mod models;
pub mod traits;
pub mod tree;
pub mod validate;

// Re-export commonly used types at crate root
pub use drag::{nearest_row, resolve_drop_target, DragGesture, DragState, DropIntent, Point};
pub use error::{Error, Result};
pub use forest::{check_forest, find_orphans, ForestViolation};
pub use hierarchy::TagIndex;
pub use models::*;
pub use traits::*;
pub use tree::{build_tree, flatten, ExpandState, TreeNode};
pub use validate::{parent_candidates, validate_move, MoveRejection};
