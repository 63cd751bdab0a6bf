//! Render adapter: geometry for laid-out segments and the view that keeps a
//! layout in step with tree events

pub mod error;
pub mod geometry;
pub mod view;

pub use error::{RenderError, RenderResult};
pub use geometry::{geometry_for, Anchor, RadialGeometry, SegmentGeometry};
pub use view::{FrameSegment, SunburstView, ViewUpdate};
