//! Arena-backed tree model.
//!
//! Nodes are owned by a generational arena; a node refers to its parent and
//! children by [`NodeId`] only, so the parent link never owns anything.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Stable handle to a node inside a [`TreeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

/// Opaque presentation tags, carried through layout untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeTags {
    /// Color resource id
    pub color: u32,
    /// Icon resource id, `None` when the node has no icon
    pub icon: Option<u32>,
}

impl NodeTags {
    pub fn new(color: u32, icon: Option<u32>) -> Self {
        Self { color, icon }
    }
}

/// Tree node in the arena-based hierarchy.
///
/// Everything but the weight is fixed at creation.
#[derive(Debug, Clone)]
pub struct TreeNode {
    label: String,
    depth: usize,
    weight: f64,
    tags: NodeTags,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Depth in the forest, roots are at depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn tags(&self) -> NodeTags {
        self.tags
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (depth={}, weight={})",
            self.label, self.depth, self.weight
        )
    }
}

/// Rejects weights the layout cannot allocate angle for.
pub fn validate_weight(weight: f64) -> DomainResult<f64> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(DomainError::InvalidWeight { weight })
    }
}

/// Forest of weighted nodes stored in a generational arena.
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    roots: Vec<NodeId>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a root node at depth 1 and appends it to the root list.
    #[instrument(level = "trace", skip(self, label))]
    pub fn create_root(
        &mut self,
        label: impl AsRef<str>,
        weight: f64,
        tags: NodeTags,
    ) -> DomainResult<NodeId> {
        let weight = validate_weight(weight)?;
        let id = self.insert(label.as_ref().to_string(), 1, weight, tags, None);
        self.roots.push(id);
        Ok(id)
    }

    /// Creates a root node with zero weight.
    pub fn create_root_unweighted(&mut self, label: impl AsRef<str>, tags: NodeTags) -> NodeId {
        let id = self.insert(label.as_ref().to_string(), 1, 0.0, tags, None);
        self.roots.push(id);
        id
    }

    /// Creates a node under `parent`, appended after its existing children.
    #[instrument(level = "trace", skip(self, label))]
    pub fn create_child(
        &mut self,
        parent: NodeId,
        label: impl AsRef<str>,
        weight: f64,
        tags: NodeTags,
    ) -> DomainResult<NodeId> {
        let weight = validate_weight(weight)?;
        let depth = self
            .get_node(parent)
            .map(|p| p.depth + 1)
            .ok_or(DomainError::InvalidNode(parent))?;
        let id = self.insert(label.as_ref().to_string(), depth, weight, tags, Some(parent));
        if let Some(p) = self.arena.get_mut(parent.0) {
            p.children.push(id);
        }
        Ok(id)
    }

    fn insert(
        &mut self,
        label: String,
        depth: usize,
        weight: f64,
        tags: NodeTags,
        parent: Option<NodeId>,
    ) -> NodeId {
        NodeId(self.arena.insert(TreeNode {
            label,
            depth,
            weight,
            tags,
            parent,
            children: Vec::new(),
        }))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn weight(&self, id: NodeId) -> Option<f64> {
        self.get_node(id).map(TreeNode::weight)
    }

    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.get_node(id).map(TreeNode::depth)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(TreeNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Overwrites the weight of a single node.
    pub fn set_weight(&mut self, id: NodeId, weight: f64) -> DomainResult<()> {
        let weight = validate_weight(weight)?;
        let node = self
            .arena
            .get_mut(id.0)
            .ok_or(DomainError::InvalidNode(id))?;
        node.weight = weight;
        Ok(())
    }

    /// Zeroes every node's weight.
    pub fn reset_weights(&mut self) {
        for (_, node) in self.arena.iter_mut() {
            node.weight = 0.0;
        }
    }

    /// Slash-joined label chain from the root down to `id`.
    ///
    /// Recomputed on every call, O(depth).
    pub fn path(&self, id: NodeId) -> Option<String> {
        let node = self.get_node(id)?;
        match node.parent {
            None => Some(node.label.clone()),
            Some(parent) => self
                .path(parent)
                .map(|prefix| format!("{}/{}", prefix, node.label)),
        }
    }

    /// Depth-first, pre-order walk over the whole forest.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }
}

/// Pre-order iterator over every node of a [`TreeArena`].
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_depth_follows_parent() {
        let mut tree = TreeArena::new();
        let root = tree.create_root("a", 1.0, NodeTags::default()).unwrap();
        let child = tree.create_child(root, "b", 1.0, NodeTags::default()).unwrap();
        let grandchild = tree.create_child(child, "c", 0.0, NodeTags::default()).unwrap();

        assert_eq!(tree.depth(root), Some(1));
        assert_eq!(tree.depth(child), Some(2));
        assert_eq!(tree.depth(grandchild), Some(3));
        assert_eq!(tree.parent(grandchild), Some(child));
        assert_eq!(tree.path(grandchild).as_deref(), Some("a/b/c"));
    }

    #[test]
    fn test_iter_is_preorder_across_roots() {
        let mut tree = TreeArena::new();
        let a = tree.create_root_unweighted("a", NodeTags::default());
        tree.create_child(a, "a1", 0.0, NodeTags::default()).unwrap();
        tree.create_child(a, "a2", 0.0, NodeTags::default()).unwrap();
        tree.create_root_unweighted("b", NodeTags::default());

        let labels: Vec<&str> = tree.iter().map(|(_, n)| n.label()).collect();
        assert_eq!(labels, vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_reset_weights_zeroes_every_node() {
        let mut tree = TreeArena::new();
        let a = tree.create_root("a", 2.0, NodeTags::default()).unwrap();
        tree.create_child(a, "a1", 5.0, NodeTags::default()).unwrap();
        tree.create_root("b", 1.5, NodeTags::default()).unwrap();

        tree.reset_weights();

        assert!(tree.iter().all(|(_, n)| n.weight() == 0.0));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut tree = TreeArena::new();
        let root = tree.create_root("a", 2.0, NodeTags::default()).unwrap();
        let err = tree.set_weight(root, -1.0).unwrap_err();
        assert_eq!(err, DomainError::InvalidWeight { weight: -1.0 });
        assert_eq!(tree.weight(root), Some(2.0));
        assert!(tree.set_weight(root, f64::NAN).is_err());
    }
}
