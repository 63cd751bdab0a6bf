//! Keeps a layout in step with a [`TreeContainer`].
//!
//! A structural change rebuilds every segment. A weight-only change reuses
//! the existing segments and yields old/new placement pairs, which a
//! renderer can either animate or apply at once.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;

use kurbo::BezPath;
use tracing::{debug, info, instrument};

use crate::domain::{NodeId, TreeArena, TreeContainer, TreeEvent};
use crate::layout::{Layout, LayoutEngine, Placement, Segment, Transition};
use crate::render::geometry::SegmentGeometry;

/// What handling an event did to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Layout rebuilt from scratch
    Rebuilt { segments: usize },
    /// Placements recomputed, transitions kept for animation
    Animated { transitions: usize },
    /// Placements recomputed and applied immediately
    Jumped,
}

/// A visible segment and where to draw it at some animation progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSegment<'a> {
    pub segment: &'a Segment,
    pub placement: Placement,
}

#[derive(Debug)]
pub struct SunburstView {
    engine: LayoutEngine,
    animate: bool,
    layout: Layout,
    transitions: Vec<Transition>,
    events: Option<Receiver<TreeEvent>>,
}

impl SunburstView {
    pub fn new(engine: LayoutEngine, animate: bool) -> Self {
        let layout = Layout::new(engine.config().domain);
        Self {
            engine,
            animate,
            layout,
            transitions: Vec::new(),
            events: None,
        }
    }

    /// Subscribes to `container` and requests the initial build.
    ///
    /// Replaces any earlier subscription; the old receiver is dropped and
    /// pruned by its container.
    pub fn attach(&mut self, container: &mut TreeContainer) {
        self.events = Some(container.subscribe());
        self.layout.clear();
        self.transitions.clear();
        container.notify_structure_changed();
    }

    /// Applies every event received since the last call, coalesced into one.
    ///
    /// Returns `None` when nothing was pending.
    pub fn sync(&mut self, container: &TreeContainer) -> Option<ViewUpdate> {
        let pending = self
            .events
            .as_ref()?
            .try_iter()
            .reduce(TreeEvent::merge)?;
        Some(self.handle(pending, container.tree()))
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn handle(&mut self, event: TreeEvent, tree: &TreeArena) -> ViewUpdate {
        match event {
            TreeEvent::WeightsChanged if !self.layout.is_empty() => {
                let transitions = self.engine.update(tree, &mut self.layout);
                if self.animate {
                    let count = transitions.iter().filter(|t| !t.is_unchanged()).count();
                    debug!("{} of {} segments move", count, transitions.len());
                    self.transitions = transitions;
                    ViewUpdate::Animated { transitions: count }
                } else {
                    self.transitions.clear();
                    ViewUpdate::Jumped
                }
            }
            _ => {
                self.layout = self.engine.build(tree);
                self.transitions.clear();
                info!("layout rebuilt: {} segments", self.layout.len());
                ViewUpdate::Rebuilt {
                    segments: self.layout.len(),
                }
            }
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Transitions of the last animated update, empty otherwise.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn is_animating(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Marks the running animation as done; placements stay at their targets.
    pub fn finish_animation(&mut self) {
        self.transitions.clear();
    }

    /// Visible segments with placements sampled at progress `t`.
    pub fn frame(&self, t: f64) -> Vec<FrameSegment<'_>> {
        let moving: HashMap<NodeId, &Transition> =
            self.transitions.iter().map(|tr| (tr.node, tr)).collect();
        self.layout
            .visible()
            .map(|segment| FrameSegment {
                segment,
                placement: moving
                    .get(&segment.node)
                    .map(|tr| tr.sample(t))
                    .unwrap_or(segment.placement),
            })
            .collect()
    }

    /// Outlines of the frame at progress `t`, keyed by path.
    pub fn outlines(&self, geometry: &dyn SegmentGeometry, t: f64) -> Vec<(String, BezPath)> {
        self.frame(t)
            .into_iter()
            .map(|f| {
                (
                    f.segment.path.clone(),
                    geometry.boundary_path(f.segment.depth, f.placement),
                )
            })
            .collect()
    }
}
