//! Tree construction and flattening over a flat tag list.
//!
//! Trees are disposable views: they borrow the tags they wrap and are
//! rebuilt from the flat list whenever it changes.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::hierarchy::TagIndex;
use crate::models::{Tag, TagId};

/// A tag placed in a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<'a> {
    pub tag: &'a Tag,
    /// Root = 0
    pub depth: usize,
    pub is_expanded: bool,
    pub children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    pub fn id(&self) -> &'a TagId {
        &self.tag.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Build the forest of `tags`.
///
/// Siblings keep the order they have in `tags`. A tag whose parent is not
/// in the list is placed at the root. Duplicate ids keep their first
/// occurrence. Tags on or below a parent cycle are unreachable and left out.
pub fn build_tree<'a>(tags: &'a [Tag], expanded: &HashSet<TagId>) -> Vec<TreeNode<'a>> {
    let index = TagIndex::new(tags);

    let mut children: HashMap<Option<&'a TagId>, Vec<&'a Tag>> = HashMap::new();
    for (i, tag) in tags.iter().enumerate() {
        if index.position(&tag.id) != Some(i) {
            continue;
        }
        let parent = match &tag.parent_id {
            Some(pid) if index.contains(pid) => Some(pid),
            Some(pid) => {
                debug!(
                    tag_id = %tag.id,
                    parent_id = %pid,
                    error_kind = "ORPHAN_REFERENCE",
                    "Parent not in list, placing tag at root"
                );
                None
            }
            None => None,
        };
        children.entry(parent).or_default().push(tag);
    }

    let mut placed = HashSet::new();
    build_level(&children, expanded, None, 0, &mut placed)
}

fn build_level<'a>(
    children: &HashMap<Option<&'a TagId>, Vec<&'a Tag>>,
    expanded: &HashSet<TagId>,
    parent: Option<&'a TagId>,
    depth: usize,
    placed: &mut HashSet<&'a TagId>,
) -> Vec<TreeNode<'a>> {
    let Some(level) = children.get(&parent) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(level.len());
    for &tag in level {
        if !placed.insert(&tag.id) {
            continue;
        }
        nodes.push(TreeNode {
            tag,
            depth,
            is_expanded: expanded.contains(&tag.id),
            children: build_level(children, expanded, Some(&tag.id), depth + 1, placed),
        });
    }
    nodes
}

/// Visible rows in display order.
///
/// Pre-order walk; a node's children follow it only when it is expanded.
pub fn flatten<'n, 'a>(nodes: &'n [TreeNode<'a>]) -> Vec<&'n TreeNode<'a>> {
    let mut rows = Vec::new();
    flatten_into(nodes, &mut rows);
    rows
}

fn flatten_into<'n, 'a>(nodes: &'n [TreeNode<'a>], rows: &mut Vec<&'n TreeNode<'a>>) {
    for node in nodes {
        rows.push(node);
        if node.is_expanded {
            flatten_into(&node.children, rows);
        }
    }
}

/// Expanded/collapsed state of tree rows, keyed by tag id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    expanded: HashSet<TagId>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tag in `tags` expanded.
    pub fn all_expanded(tags: &[Tag]) -> Self {
        let mut state = Self::new();
        state.expand_all(tags);
        state
    }

    pub fn ids(&self) -> &HashSet<TagId> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &TagId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: TagId) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: &TagId) {
        self.expanded.remove(id);
    }

    /// Flip one row; returns the new state.
    pub fn toggle(&mut self, id: &TagId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    pub fn expand_all(&mut self, tags: &[Tag]) {
        self.expanded.extend(tags.iter().map(|t| t.id.clone()));
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Expand every ancestor of `id` so its row becomes visible.
    pub fn reveal(&mut self, tags: &[Tag], id: &TagId) {
        let index = TagIndex::new(tags);
        for ancestor in index.ancestors(id) {
            self.expanded.insert(ancestor.id.clone());
        }
    }

    /// Forget ids that are no longer in the list.
    pub fn retain_known(&mut self, tags: &[Tag]) {
        let known: HashSet<&TagId> = tags.iter().map(|t| &t.id).collect();
        self.expanded.retain(|id| known.contains(id));
    }

    /// Build the tree of `tags` with this state.
    pub fn build<'a>(&self, tags: &'a [Tag]) -> Vec<TreeNode<'a>> {
        build_tree(tags, &self.expanded)
    }
}
