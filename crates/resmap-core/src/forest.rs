//! Forest invariant audit.
//!
//! The remote store is expected to hand back one forest per tag type. This
//! module reports where a fetched list deviates from that.

use std::collections::HashSet;

use serde::Serialize;

use crate::hierarchy::TagIndex;
use crate::models::{Tag, TagId, TagType};

/// A single deviation from the forest invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForestViolation {
    /// The same id appears more than once.
    DuplicateId { id: TagId },
    /// The tag names itself as parent.
    SelfParent { id: TagId },
    /// The tag sits on a parent cycle.
    Cycle { id: TagId },
    /// The tag hangs below a cycle or a self-parented tag, so its parent
    /// walk never reaches a root.
    Unreachable { id: TagId },
    /// The parent belongs to a different forest.
    #[serde(rename_all = "camelCase")]
    TypeMismatch {
        id: TagId,
        parent_id: TagId,
        tag_type: TagType,
        parent_type: TagType,
    },
    /// The tag is at or beyond the maximum depth.
    TooDeep { id: TagId, depth: usize },
    /// The parent id does not resolve; the tag is shown at root.
    #[serde(rename_all = "camelCase")]
    Orphan { id: TagId, parent_id: TagId },
}

impl ForestViolation {
    pub fn id(&self) -> &TagId {
        match self {
            Self::DuplicateId { id }
            | Self::SelfParent { id }
            | Self::Cycle { id }
            | Self::Unreachable { id }
            | Self::TypeMismatch { id, .. }
            | Self::TooDeep { id, .. }
            | Self::Orphan { id, .. } => id,
        }
    }

    /// Orphans are tolerated; everything else breaks the forest.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Orphan { .. })
    }
}

impl std::fmt::Display for ForestViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "{}: duplicate id", id),
            Self::SelfParent { id } => write!(f, "{}: parent of itself", id),
            Self::Cycle { id } => write!(f, "{}: on a parent cycle", id),
            Self::Unreachable { id } => write!(f, "{}: below a parent cycle", id),
            Self::TypeMismatch {
                id,
                parent_id,
                tag_type,
                parent_type,
            } => write!(
                f,
                "{}: {} tag under {} parent {}",
                id, tag_type, parent_type, parent_id
            ),
            Self::TooDeep { id, depth } => write!(f, "{}: depth {} too deep", id, depth),
            Self::Orphan { id, parent_id } => {
                write!(f, "{}: parent {} not found (shown at root)", id, parent_id)
            }
        }
    }
}

/// Ids whose parent reference does not resolve within `tags`.
pub fn find_orphans(tags: &[Tag]) -> Vec<&TagId> {
    let index = TagIndex::new(tags);
    tags.iter()
        .filter(|t| index.is_orphan(t))
        .map(|t| &t.id)
        .collect()
}

/// Audit `tags` against the forest invariants.
///
/// Violations are reported in list order, one or more per offending tag.
pub fn check_forest(tags: &[Tag], max_depth: usize) -> Vec<ForestViolation> {
    let index = TagIndex::new(tags);
    let mut violations = Vec::new();
    let mut seen: HashSet<&TagId> = HashSet::new();

    for tag in tags {
        if !seen.insert(&tag.id) {
            violations.push(ForestViolation::DuplicateId { id: tag.id.clone() });
            continue;
        }

        let Some(parent_id) = &tag.parent_id else {
            continue;
        };

        if parent_id == &tag.id {
            violations.push(ForestViolation::SelfParent { id: tag.id.clone() });
            continue;
        }

        let Some(parent) = index.get(parent_id) else {
            violations.push(ForestViolation::Orphan {
                id: tag.id.clone(),
                parent_id: parent_id.clone(),
            });
            continue;
        };

        if parent.tag_type != tag.tag_type {
            violations.push(ForestViolation::TypeMismatch {
                id: tag.id.clone(),
                parent_id: parent_id.clone(),
                tag_type: tag.tag_type,
                parent_type: parent.tag_type,
            });
        }

        if on_cycle(&index, tag, max_depth.max(tags.len())) {
            violations.push(ForestViolation::Cycle { id: tag.id.clone() });
            continue;
        }

        if !index.reaches_root(&tag.id) {
            violations.push(ForestViolation::Unreachable { id: tag.id.clone() });
            continue;
        }

        let depth = index.depth_of(&tag.id);
        if depth >= max_depth {
            violations.push(ForestViolation::TooDeep {
                id: tag.id.clone(),
                depth,
            });
        }
    }

    violations
}

/// Follow parents from `tag`; true if the walk comes back to `tag`.
fn on_cycle(index: &TagIndex<'_>, tag: &Tag, limit: usize) -> bool {
    let mut current = tag;
    for _ in 0..=limit {
        match index.parent_of(current) {
            Some(parent) if parent.id == tag.id => return true,
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}
