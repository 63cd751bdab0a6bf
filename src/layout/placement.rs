//! Layout results: per-node placements keyed by node and path, and the transitions
//! produced when an existing layout is recomputed.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::warn;

use crate::domain::{NodeId, NodeTags};
use crate::layout::engine::LayoutDomain;

/// Below this weight a segment is not drawn.
pub const VISIBLE_WEIGHT_EPSILON: f64 = 0.00001;

/// Angular (or percentage) range assigned to one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub start: f64,
    pub sweep: f64,
}

impl Placement {
    pub fn new(start: f64, sweep: f64) -> Self {
        Self { start, sweep }
    }

    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    /// Linear interpolation towards `to`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, to: Placement, t: f64) -> Placement {
        let t = t.clamp(0.0, 1.0);
        Placement {
            start: self.start + (to.start - self.start) * t,
            sweep: self.sweep + (to.sweep - self.sweep) * t,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2} +{:.2}]", self.start, self.sweep)
    }
}

/// A laid-out node, everything a renderer needs to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub node: NodeId,
    pub path: String,
    pub depth: usize,
    pub weight: f64,
    pub tags: NodeTags,
    pub placement: Placement,
}

impl Segment {
    pub fn is_visible(&self) -> bool {
        self.weight > VISIBLE_WEIGHT_EPSILON && self.placement.sweep > 0.0
    }
}

/// Placement of a node before and after a relayout.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub node: NodeId,
    pub path: String,
    pub from: Placement,
    pub to: Placement,
}

impl Transition {
    /// Placement at animation progress `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Placement {
        self.from.lerp(self.to, t)
    }

    pub fn is_unchanged(&self) -> bool {
        self.from == self.to
    }
}

/// Depth-first, pre-order placement of every node in a tree.
///
/// Segments are indexed both by node and by path. Node lookups are exact;
/// path lookups resolve a repeated path to the later segment.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    domain: LayoutDomain,
    segments: Vec<Segment>,
    by_path: BTreeMap<String, usize>,
    by_node: HashMap<NodeId, usize>,
}

impl Layout {
    pub fn new(domain: LayoutDomain) -> Self {
        Self {
            domain,
            segments: Vec::new(),
            by_path: BTreeMap::new(),
            by_node: HashMap::new(),
        }
    }

    pub fn domain(&self) -> LayoutDomain {
        self.domain
    }

    /// Appends a segment. A repeated path shadows the earlier entry for lookups.
    pub fn push(&mut self, segment: Segment) {
        let idx = self.segments.len();
        if self.by_path.insert(segment.path.clone(), idx).is_some() {
            warn!("duplicate node path {}, later node wins path lookups", segment.path);
        }
        self.by_node.insert(segment.node, idx);
        self.segments.push(segment);
    }

    pub fn get(&self, path: &str) -> Option<&Segment> {
        self.by_path.get(path).map(|&idx| &self.segments[idx])
    }

    pub fn segment_of(&self, node: NodeId) -> Option<&Segment> {
        self.by_node.get(&node).map(|&idx| &self.segments[idx])
    }

    pub fn segment_of_mut(&mut self, node: NodeId) -> Option<&mut Segment> {
        match self.by_node.get(&node) {
            Some(&idx) => self.segments.get_mut(idx),
            None => None,
        }
    }

    pub fn placement(&self, path: &str) -> Option<Placement> {
        self.get(path).map(|s| s.placement)
    }

    /// All segments in pre-order, including zero-sweep ones.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Segments a renderer should draw.
    pub fn visible(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_visible())
    }

    /// Path-ordered view, the order a keyed map of drawables iterates in.
    pub fn by_path(&self) -> impl Iterator<Item = (&str, &Segment)> {
        self.by_path
            .iter()
            .map(|(path, &idx)| (path.as_str(), &self.segments[idx]))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.by_path.clear();
        self.by_node.clear();
    }
}
