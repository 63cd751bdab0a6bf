//! Tree container: the root set, depth bookkeeping, path-addressed weight
//! mutation and change notification.

use std::fmt;
use std::sync::mpsc::Receiver;

use tracing::{debug, instrument};

use crate::domain::arena::{validate_weight, NodeId, NodeTags, TreeArena, TreeNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::events::{ListenerId, ListenerRegistry, TreeEvent};

/// Owns a forest of weighted nodes and the listeners interested in it.
///
/// Mutations never notify on their own: callers batch any number of weight
/// changes and then fire exactly one [`TreeEvent`].
#[derive(Debug, Default)]
pub struct TreeContainer {
    tree: TreeArena,
    max_depth: usize,
    listeners: ListenerRegistry,
}

impl TreeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying tree model.
    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn roots(&self) -> &[NodeId] {
        self.tree.roots()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.tree.get_node(id)
    }

    /// Maximum depth of any node ever added. Never decreases.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn add_root(
        &mut self,
        label: impl AsRef<str>,
        weight: f64,
        tags: NodeTags,
    ) -> DomainResult<NodeId> {
        let id = self.tree.create_root(label, weight, tags)?;
        self.track_depth(id);
        Ok(id)
    }

    pub fn add_root_unweighted(&mut self, label: impl AsRef<str>, tags: NodeTags) -> NodeId {
        let id = self.tree.create_root_unweighted(label, tags);
        self.track_depth(id);
        id
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: impl AsRef<str>,
        weight: f64,
        tags: NodeTags,
    ) -> DomainResult<NodeId> {
        let id = self.tree.create_child(parent, label, weight, tags)?;
        self.track_depth(id);
        Ok(id)
    }

    pub fn add_child_unweighted(
        &mut self,
        parent: NodeId,
        label: impl AsRef<str>,
        tags: NodeTags,
    ) -> DomainResult<NodeId> {
        self.add_child(parent, label, 0.0, tags)
    }

    fn track_depth(&mut self, id: NodeId) {
        if let Some(depth) = self.tree.depth(id) {
            self.max_depth = self.max_depth.max(depth);
        }
    }

    /// Resolves a label path: the first segment is matched against the
    /// roots, every following one against the children of the previous match.
    ///
    /// Labels are compared exactly and the first matching sibling wins.
    pub fn find_path<S: AsRef<str>>(&self, segments: &[S]) -> DomainResult<NodeId> {
        let not_found = || DomainError::PathNotFound {
            path: join_segments(segments),
        };
        let mut candidates = self.tree.roots();
        let mut found = None;
        for segment in segments {
            let hit = candidates.iter().copied().find(|&id| {
                self.tree
                    .get_node(id)
                    .is_some_and(|n| n.label() == segment.as_ref())
            });
            let id = hit.ok_or_else(not_found)?;
            candidates = self.tree.children(id);
            found = Some(id);
        }
        found.ok_or_else(not_found)
    }

    /// Overwrites the weight of the node at `segments`.
    #[instrument(level = "debug", skip(self, segments), fields(path = %join_segments(segments)))]
    pub fn set_weight_at_path<S: AsRef<str>>(
        &mut self,
        weight: f64,
        segments: &[S],
    ) -> DomainResult<()> {
        let id = self.find_path(segments)?;
        self.tree.set_weight(id, weight)
    }

    /// Adds `delta` to the weight of the node at `segments`.
    ///
    /// A delta that would drive the weight negative is rejected and the
    /// weight is left as it was.
    #[instrument(level = "debug", skip(self, segments), fields(path = %join_segments(segments)))]
    pub fn add_weight_at_path<S: AsRef<str>>(
        &mut self,
        delta: f64,
        segments: &[S],
    ) -> DomainResult<()> {
        let id = self.find_path(segments)?;
        let current = self.tree.weight(id).ok_or(DomainError::InvalidNode(id))?;
        let updated = validate_weight(current + delta)?;
        self.tree.set_weight(id, updated)
    }

    /// Sets every weight in the forest to zero.
    pub fn reset_all_weights(&mut self) {
        debug!("resetting {} weights", self.tree.len());
        self.tree.reset_weights();
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(TreeEvent) + 'static,
    {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Channel flavor of [`TreeContainer::add_listener`].
    pub fn subscribe(&mut self) -> Receiver<TreeEvent> {
        self.listeners.subscribe()
    }

    pub fn notify_structure_changed(&mut self) {
        self.listeners.notify(TreeEvent::StructureChanged);
    }

    pub fn notify_weights_changed(&mut self) {
        self.listeners.notify(TreeEvent::WeightsChanged);
    }
}

/// Joins path segments with `/`, the form paths are reported in.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join("/")
}

/// Splits a slash-joined path into its label segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl fmt::Display for TreeContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes in {} roots, max depth {}",
            self.tree.len(),
            self.tree.roots().len(),
            self.max_depth
        )
    }
}
