//! Layout engine: turns a weighted forest into angular segments

pub mod engine;
pub mod placement;

pub use engine::{reserve_gaps, LayoutConfig, LayoutDomain, LayoutEngine};
pub use placement::{Layout, Placement, Segment, Transition, VISIBLE_WEIGHT_EPSILON};
