//! Id-indexed, read-only view over a flat tag list.
//!
//! All hierarchy questions (parent, ancestors, depth, descendants) are
//! answered by `parentId` lookups against the flat list. A `parentId` that
//! does not resolve is an orphan reference and the tag counts as a root.

use std::collections::{HashMap, HashSet};

use crate::models::{Tag, TagId};

/// Lookup index over a borrowed tag list.
///
/// If an id occurs more than once, the first occurrence wins.
#[derive(Debug, Clone)]
pub struct TagIndex<'a> {
    tags: &'a [Tag],
    by_id: HashMap<&'a TagId, usize>,
}

impl<'a> TagIndex<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        let mut by_id = HashMap::with_capacity(tags.len());
        for (i, tag) in tags.iter().enumerate() {
            by_id.entry(&tag.id).or_insert(i);
        }
        Self { tags, by_id }
    }

    /// The underlying flat list.
    pub fn tags(&self) -> &'a [Tag] {
        self.tags
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &TagId) -> Option<&'a Tag> {
        self.by_id.get(id).map(|&i| &self.tags[i])
    }

    pub fn contains(&self, id: &TagId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Position of the first occurrence of `id` in the flat list.
    pub fn position(&self, id: &TagId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// The resolved parent, or `None` for roots and orphans.
    pub fn parent_of(&self, tag: &Tag) -> Option<&'a Tag> {
        tag.parent_id.as_ref().and_then(|pid| self.get(pid))
    }

    /// True when the tag names a parent that is not in the list.
    pub fn is_orphan(&self, tag: &Tag) -> bool {
        matches!(&tag.parent_id, Some(pid) if !self.contains(pid))
    }

    /// Ancestors of `id`, nearest first.
    ///
    /// The walk ends at a root or an orphan reference. It also ends if it
    /// would revisit a tag, so corrupt data with a parent cycle terminates.
    pub fn ancestors(&self, id: &TagId) -> Vec<&'a Tag> {
        let mut chain = Vec::new();
        let Some(start) = self.get(id) else {
            return chain;
        };

        let mut seen: HashSet<&TagId> = HashSet::new();
        seen.insert(&start.id);
        let mut current = start;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(&parent.id) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// True if the parent walk from `id` ends at a root or an orphan
    /// reference. False when it runs into a revisit (a cycle or self-parent
    /// at or above `id`), and for unknown ids.
    pub fn reaches_root(&self, id: &TagId) -> bool {
        let Some(start) = self.get(id) else {
            return false;
        };

        let mut seen: HashSet<&TagId> = HashSet::new();
        seen.insert(&start.id);
        let mut current = start;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(&parent.id) {
                return false;
            }
            current = parent;
        }
        true
    }

    /// True if `ancestor` lies on the parent chain of `id`.
    pub fn has_ancestor(&self, id: &TagId, ancestor: &TagId) -> bool {
        self.ancestors(id).iter().any(|t| &t.id == ancestor)
    }

    /// Depth of `id` (root = 0). Unknown ids report 0.
    pub fn depth_of(&self, id: &TagId) -> usize {
        self.ancestors(id).len()
    }

    /// Direct children of `id`, in list order.
    pub fn children(&self, id: &TagId) -> Vec<&'a Tag> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(i, t)| t.parent_id.as_ref() == Some(id) && self.position(&t.id) == Some(*i))
            .map(|(_, t)| t)
            .collect()
    }

    /// Every tag below `id`, pre-order.
    pub fn descendants(&self, id: &TagId) -> Vec<&'a Tag> {
        let mut out = Vec::new();
        let mut seen: HashSet<&TagId> = HashSet::new();
        if let Some(root) = self.get(id) {
            seen.insert(&root.id);
        }
        self.collect_descendants(id, &mut seen, &mut out);
        out
    }

    fn collect_descendants(
        &self,
        id: &TagId,
        seen: &mut HashSet<&'a TagId>,
        out: &mut Vec<&'a Tag>,
    ) {
        for child in self.children(id) {
            if seen.insert(&child.id) {
                out.push(child);
                self.collect_descendants(&child.id, seen, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagType;

    fn chain() -> Vec<Tag> {
        vec![
            Tag::new("a", "A", TagType::Role),
            Tag::new("b", "B", TagType::Role).with_parent("a"),
            Tag::new("c", "C", TagType::Role).with_parent("b"),
            Tag::new("d", "D", TagType::Role).with_parent("a"),
        ]
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tags = chain();
        let index = TagIndex::new(&tags);
        let ids: Vec<&str> = index
            .ancestors(&"c".into())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_depth_of() {
        let tags = chain();
        let index = TagIndex::new(&tags);
        assert_eq!(index.depth_of(&"a".into()), 0);
        assert_eq!(index.depth_of(&"b".into()), 1);
        assert_eq!(index.depth_of(&"c".into()), 2);
        assert_eq!(index.depth_of(&"missing".into()), 0);
    }

    #[test]
    fn test_children_and_descendants_in_list_order() {
        let tags = chain();
        let index = TagIndex::new(&tags);
        let children: Vec<&str> = index
            .children(&"a".into())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(children, vec!["b", "d"]);

        let descendants: Vec<&str> = index
            .descendants(&"a".into())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(descendants, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_orphan_counts_as_root() {
        let tags = vec![Tag::new("x", "X", TagType::Role).with_parent("gone")];
        let index = TagIndex::new(&tags);
        assert!(index.is_orphan(&tags[0]));
        assert!(index.parent_of(&tags[0]).is_none());
        assert_eq!(index.depth_of(&"x".into()), 0);
    }

    #[test]
    fn test_ancestor_walk_terminates_on_corrupt_cycle() {
        let tags = vec![
            Tag::new("p", "P", TagType::Role).with_parent("q"),
            Tag::new("q", "Q", TagType::Role).with_parent("p"),
        ];
        let index = TagIndex::new(&tags);
        assert_eq!(index.ancestors(&"p".into()).len(), 1);
        assert!(index.has_ancestor(&"p".into(), &"q".into()));
    }

    #[test]
    fn test_reaches_root() {
        let mut tags = chain();
        tags.push(Tag::new("o", "O", TagType::Role).with_parent("gone"));
        tags.push(Tag::new("s", "S", TagType::Role).with_parent("s"));
        tags.push(Tag::new("t", "T", TagType::Role).with_parent("s"));
        let index = TagIndex::new(&tags);
        assert!(index.reaches_root(&"c".into()));
        assert!(index.reaches_root(&"o".into()));
        assert!(!index.reaches_root(&"s".into()));
        assert!(!index.reaches_root(&"t".into()));
        assert!(!index.reaches_root(&"missing".into()));
    }

    #[test]
    fn test_duplicate_id_first_occurrence_wins() {
        let tags = vec![
            Tag::new("a", "First", TagType::Role),
            Tag::new("a", "Second", TagType::Role),
        ];
        let index = TagIndex::new(&tags);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&"a".into()).unwrap().value, "First");
    }
}
