//! Move validation for parent reassignment.
//!
//! A move places `dragged` under `target`. It is admissible when it does
//! not self-parent, does not create a cycle, and keeps the dragged tag
//! below the configured maximum depth. Validation is pure: it reads the
//! flat list and never mutates anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::{Error as CoreError, Result};
use crate::hierarchy::TagIndex;
use crate::models::{Tag, TagId};

/// Why a move was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveRejection {
    /// The tag would become its own parent.
    #[error("self_parent")]
    SelfParent,

    /// The target is a descendant of the dragged tag.
    #[error("cycle")]
    Cycle,

    /// The dragged tag would land at or beyond the maximum depth.
    #[error("depth_exceeded")]
    DepthExceeded,
}

impl MoveRejection {
    /// Wire/log code, e.g. `"SELF_PARENT"`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SelfParent => "SELF_PARENT",
            Self::Cycle => "CYCLE",
            Self::DepthExceeded => "DEPTH_EXCEEDED",
        }
    }
}

impl std::str::FromStr for MoveRejection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self_parent" => Ok(Self::SelfParent),
            "cycle" => Ok(Self::Cycle),
            "depth_exceeded" => Ok(Self::DepthExceeded),
            _ => Err(format!("Invalid move rejection: {}", s)),
        }
    }
}

impl<'a> TagIndex<'a> {
    /// Decide whether `dragged` may be placed under `target`.
    pub fn validate_move(
        &self,
        dragged: &TagId,
        target: &TagId,
        max_depth: usize,
    ) -> std::result::Result<(), MoveRejection> {
        if dragged == target {
            return Err(MoveRejection::SelfParent);
        }

        // One upward walk from the proposed parent; the same walk yields its depth.
        let chain = self.ancestors(target);
        if chain.iter().any(|t| &t.id == dragged) {
            return Err(MoveRejection::Cycle);
        }

        if chain.len() + 1 >= max_depth {
            return Err(MoveRejection::DepthExceeded);
        }

        Ok(())
    }

    /// Like [`TagIndex::validate_move`], with `None` meaning "move to root".
    pub fn validate_reparent(
        &self,
        dragged: &TagId,
        target: Option<&TagId>,
        max_depth: usize,
    ) -> std::result::Result<(), MoveRejection> {
        match target {
            Some(target) => self.validate_move(dragged, target, max_depth),
            None => Ok(()),
        }
    }

    /// Tags that `tag_id` could be moved under, in list order.
    ///
    /// Candidates share the tag's type and pass [`TagIndex::validate_move`].
    /// The tag's current parent is included.
    pub fn parent_candidates(&self, tag_id: &TagId, max_depth: usize) -> Result<Vec<&'a Tag>> {
        let tag = self
            .get(tag_id)
            .ok_or_else(|| CoreError::TagNotFound(tag_id.clone()))?;

        let candidates = self
            .tags()
            .iter()
            .enumerate()
            .filter(|(i, t)| self.position(&t.id) == Some(*i))
            .map(|(_, t)| t)
            .filter(|t| t.tag_type == tag.tag_type)
            .filter(|t| self.validate_move(tag_id, &t.id, max_depth).is_ok())
            .collect();
        Ok(candidates)
    }
}

/// Decide whether `dragged` may be placed under `target` in `tags`.
pub fn validate_move(
    tags: &[Tag],
    dragged: &TagId,
    target: &TagId,
    max_depth: usize,
) -> std::result::Result<(), MoveRejection> {
    let verdict = TagIndex::new(tags).validate_move(dragged, target, max_depth);
    if let Err(reason) = verdict {
        debug!(
            tag_id = %dragged,
            target_id = %target,
            max_depth,
            rejection = reason.code(),
            "Move rejected"
        );
    }
    verdict
}

/// Admissible parents for `tag_id` in `tags`.
pub fn parent_candidates<'a>(
    tags: &'a [Tag],
    tag_id: &TagId,
    max_depth: usize,
) -> Result<Vec<&'a Tag>> {
    TagIndex::new(tags).parent_candidates(tag_id, max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagType;

    fn chain_of(n: usize) -> Vec<Tag> {
        (0..n)
            .map(|i| {
                let tag = Tag::new(format!("t{}", i), format!("T{}", i), TagType::Location);
                if i == 0 {
                    tag
                } else {
                    tag.with_parent(format!("t{}", i - 1))
                }
            })
            .collect()
    }

    #[test]
    fn test_rejects_self_parent() {
        let tags = chain_of(2);
        for depth in [0, 1, 10, 100] {
            assert_eq!(
                validate_move(&tags, &"t1".into(), &"t1".into(), depth),
                Err(MoveRejection::SelfParent)
            );
        }
    }

    #[test]
    fn test_self_parent_checked_for_unknown_ids() {
        assert_eq!(
            validate_move(&[], &"x".into(), &"x".into(), 10),
            Err(MoveRejection::SelfParent)
        );
    }

    #[test]
    fn test_rejects_cycle() {
        let tags = vec![
            Tag::new("A", "A", TagType::Role),
            Tag::new("B", "B", TagType::Role).with_parent("A"),
            Tag::new("C", "C", TagType::Role).with_parent("B"),
        ];
        assert_eq!(
            validate_move(&tags, &"A".into(), &"C".into(), 10),
            Err(MoveRejection::Cycle)
        );
        assert_eq!(
            validate_move(&tags, &"A".into(), &"B".into(), 10),
            Err(MoveRejection::Cycle)
        );
    }

    #[test]
    fn test_depth_bound() {
        let tags = chain_of(11);
        let index = TagIndex::new(&tags);
        assert_eq!(index.depth_of(&"t9".into()), 9);

        let extra = Tag::new("x", "X", TagType::Location);
        let mut with_x = tags.clone();
        with_x.push(extra);

        assert_eq!(
            validate_move(&with_x, &"x".into(), &"t9".into(), 10),
            Err(MoveRejection::DepthExceeded)
        );
        assert_eq!(
            validate_move(&with_x, &"x".into(), &"t9".into(), 11),
            Ok(())
        );
    }

    #[test]
    fn test_scenario_three_levels() {
        let tags = vec![
            Tag::new("r", "R", TagType::Role),
            Tag::new("a", "A", TagType::Role).with_parent("r"),
            Tag::new("b", "B", TagType::Role).with_parent("a"),
        ];
        assert_eq!(
            validate_move(&tags, &"r".into(), &"b".into(), 3),
            Err(MoveRejection::Cycle)
        );
        assert_eq!(validate_move(&tags, &"b".into(), &"r".into(), 3), Ok(()));
    }

    #[test]
    fn test_validator_is_repeatable() {
        let tags = chain_of(3);
        let first = validate_move(&tags, &"t0".into(), &"t2".into(), 10);
        let second = validate_move(&tags, &"t0".into(), &"t2".into(), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reparent_to_root_is_admissible() {
        let tags = chain_of(3);
        let index = TagIndex::new(&tags);
        assert_eq!(index.validate_reparent(&"t2".into(), None, 1), Ok(()));
    }

    #[test]
    fn test_parent_candidates_excludes_self_and_descendants() {
        let tags = vec![
            Tag::new("r", "R", TagType::Role),
            Tag::new("a", "A", TagType::Role).with_parent("r"),
            Tag::new("b", "B", TagType::Role).with_parent("a"),
            Tag::new("s", "S", TagType::Role),
            Tag::new("loc", "Loc", TagType::Location),
        ];
        let ids: Vec<&str> = parent_candidates(&tags, &"a".into(), 10)
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r", "s"]);
    }

    #[test]
    fn test_parent_candidates_are_id_based_not_value_based() {
        // Two tags share a display value; only the real descendant is excluded.
        let tags = vec![
            Tag::new("a", "Storage", TagType::Location),
            Tag::new("b", "Storage", TagType::Location).with_path(vec!["Storage".into()]),
            Tag::new("c", "Bay", TagType::Location)
                .with_parent("b")
                .with_path(vec!["Storage".into(), "Bay".into()]),
        ];
        let ids: Vec<&str> = parent_candidates(&tags, &"a".into(), 10)
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_parent_candidates_unknown_tag() {
        let err = parent_candidates(&[], &"nope".into(), 10).unwrap_err();
        assert!(matches!(err, CoreError::TagNotFound(_)));
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(MoveRejection::SelfParent.code(), "SELF_PARENT");
        assert_eq!(
            serde_json::to_value(MoveRejection::DepthExceeded).unwrap(),
            serde_json::json!("DEPTH_EXCEEDED")
        );
        assert_eq!("cycle".parse::<MoveRejection>().unwrap(), MoveRejection::Cycle);
    }
}
