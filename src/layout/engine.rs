//! Weighted angular partition.
//!
//! Siblings share their parent's range in proportion to their weight, with a
//! fixed gap between non-zero siblings. The outermost level reserves one gap
//! per non-zero node (leading gap included) while deeper levels reserve one
//! fewer, so the first child sits flush with its parent's start.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::{NodeId, TreeArena, TreeNode};
use crate::layout::placement::{Layout, Placement, Segment, Transition};

/// Allocation axis of a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDomain {
    /// Degrees around a circle.
    #[default]
    Radial,
    /// Percent of a linear band.
    Percentage,
}

impl LayoutDomain {
    /// Hard upper bound of the allocation axis.
    pub fn ceiling(self) -> f64 {
        match self {
            LayoutDomain::Radial => 360.0,
            LayoutDomain::Percentage => 100.0,
        }
    }
}

impl fmt::Display for LayoutDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDomain::Radial => write!(f, "radial"),
            LayoutDomain::Percentage => write!(f, "percentage"),
        }
    }
}

impl FromStr for LayoutDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radial" => Ok(LayoutDomain::Radial),
            "percentage" => Ok(LayoutDomain::Percentage),
            other => Err(format!(
                "unknown layout domain {:?}, expected radial or percentage",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Gap inserted between adjacent non-zero siblings
    pub skip_length: f64,
    pub domain: LayoutDomain,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            skip_length: 1.0,
            domain: LayoutDomain::Radial,
        }
    }
}

/// Sweep left for weighted allocation once separation gaps are reserved.
///
/// Levels at depth 1 reserve `non_zero` gaps, deeper levels `non_zero - 1`.
/// Never negative.
pub fn reserve_gaps(sweep: f64, non_zero: usize, depth: usize, skip_length: f64) -> f64 {
    if non_zero <= 1 {
        return sweep;
    }
    let adjustment = if depth <= 1 { 0 } else { 1 };
    (sweep - (non_zero - adjustment) as f64 * skip_length).max(0.0)
}

/// Aggregates of one sibling list.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LevelStats {
    total_weight: f64,
    non_zero: usize,
    depth: usize,
}

impl LevelStats {
    fn measure(nodes: &[(NodeId, &TreeNode)]) -> Option<Self> {
        let (_, first) = nodes.first()?;
        let depth = first.depth();
        let mut total_weight = 0.0;
        let mut non_zero = 0;
        for (_, node) in nodes {
            total_weight += node.weight();
            if node.weight() > 0.0 {
                non_zero += 1;
            }
            if node.depth() != depth {
                warn!(
                    "sibling depths differ: {} is at depth {}, level uses {}",
                    node.label(),
                    node.depth(),
                    depth
                );
            }
        }
        Some(Self {
            total_weight,
            non_zero,
            depth,
        })
    }
}

/// Computes placements for a whole forest.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// First-time layout over the full domain.
    #[instrument(level = "debug", skip(self, tree), fields(nodes = tree.len()))]
    pub fn build(&self, tree: &TreeArena) -> Layout {
        let mut layout = Layout::new(self.config.domain);
        let ceiling = self.config.domain.ceiling();
        self.partition_siblings(
            tree,
            tree.roots(),
            0.0,
            ceiling,
            None,
            &mut |id, node, placement| {
                layout.push(Segment {
                    node: id,
                    path: node_path(tree, id, node),
                    depth: node.depth(),
                    weight: node.weight(),
                    tags: node.tags(),
                    placement,
                });
            },
        );
        debug!("built layout with {} segments", layout.len());
        layout
    }

    /// Recomputes `layout` for the tree's current weights.
    ///
    /// Every segment is moved to its new placement; the returned transitions
    /// pair old and new placement per node, in pre-order. Segments are matched
    /// by node id, so siblings sharing a label each keep their own placement.
    /// A node missing from `layout` is appended and grows from zero sweep.
    #[instrument(level = "debug", skip(self, tree, layout), fields(nodes = tree.len()))]
    pub fn update(&self, tree: &TreeArena, layout: &mut Layout) -> Vec<Transition> {
        let mut transitions = Vec::with_capacity(layout.len());
        let ceiling = self.config.domain.ceiling();
        self.partition_siblings(
            tree,
            tree.roots(),
            0.0,
            ceiling,
            None,
            &mut |id, node, placement| {
                let path = node_path(tree, id, node);
                let from = match layout.segment_of_mut(id) {
                    Some(segment) => {
                        let from = segment.placement;
                        segment.placement = placement;
                        segment.weight = node.weight();
                        from
                    }
                    None => {
                        warn!("{} was not laid out before, adding it", path);
                        layout.push(Segment {
                            node: id,
                            path: path.clone(),
                            depth: node.depth(),
                            weight: node.weight(),
                            tags: node.tags(),
                            placement,
                        });
                        Placement::new(placement.start, 0.0)
                    }
                };
                transitions.push(Transition {
                    node: id,
                    path,
                    from,
                    to: placement,
                });
            },
        );
        transitions
    }

    /// Partitions `[start, start + sweep)` among `siblings`, then recurses
    /// into each node's children with the range it was just given.
    ///
    /// `visit` sees every node before its children. `parent_weight`, when
    /// positive and not below the siblings' total weight, replaces that total
    /// so the siblings leave part of the range empty.
    pub fn partition_siblings<F>(
        &self,
        tree: &TreeArena,
        siblings: &[NodeId],
        start: f64,
        sweep: f64,
        parent_weight: Option<f64>,
        visit: &mut F,
    ) where
        F: FnMut(NodeId, &TreeNode, Placement),
    {
        let nodes: Vec<(NodeId, &TreeNode)> = siblings
            .iter()
            .filter_map(|&id| tree.get_node(id).map(|node| (id, node)))
            .collect();
        let Some(level) = LevelStats::measure(&nodes) else {
            return;
        };

        let mut total_weight = level.total_weight;
        if let Some(parent_weight) = parent_weight.filter(|w| *w > 0.0) {
            if parent_weight < total_weight {
                warn!(
                    "given weight {} is smaller than total weight {}, dismissed",
                    parent_weight, total_weight
                );
            } else {
                total_weight = parent_weight;
            }
        }

        let skip_length = self.config.skip_length;
        let ceiling = self.config.domain.ceiling();
        let usable = reserve_gaps(sweep, level.non_zero, level.depth, skip_length);

        let mut cursor = start;
        let mut placed = 0usize;
        for (id, node) in nodes {
            let mut node_sweep = 0.0;
            if node.weight() > 0.0 {
                if node.depth() <= 1 || placed > 0 {
                    cursor += skip_length;
                }
                node_sweep = node.weight() / total_weight * usable;
                placed += 1;
            }
            if cursor + node_sweep > ceiling {
                node_sweep = ceiling - cursor;
            }
            node_sweep = node_sweep.max(0.0);

            let placement = Placement::new(cursor, node_sweep);
            visit(id, node, placement);
            if !node.is_leaf() {
                self.partition_siblings(
                    tree,
                    node.children(),
                    cursor,
                    node_sweep,
                    Some(node.weight()),
                    visit,
                );
            }
            cursor += node_sweep;
        }
    }
}

fn node_path(tree: &TreeArena, id: NodeId, node: &TreeNode) -> String {
    tree.path(id).unwrap_or_else(|| node.label().to_string())
}
