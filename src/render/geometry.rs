//! Mapping from laid-out segments to drawable geometry.
//!
//! Each layout domain gets its own implementation of [`SegmentGeometry`].
//! Only the radial one exists; the percentage domain lays out fine but has
//! no drawable mapping yet.

use kurbo::{BezPath, CircleSegment, Point, Rect, Shape, Size, Vec2};
use tracing::{debug, warn};

use crate::layout::{LayoutDomain, Placement};
use crate::render::error::{RenderError, RenderResult};

/// Accuracy used when flattening arcs into Bézier paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Fraction of a layer left open between a ring and the one inside it.
const RING_SPACING: f64 = 0.05;

/// Where to put an icon or label on a segment, and how much room there is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point,
    /// Length of the segment along its centerline
    pub extent: f64,
}

/// Capability every layout-domain renderer provides.
pub trait SegmentGeometry {
    /// Closed outline of a segment at `depth` covering `placement`.
    fn boundary_path(&self, depth: usize, placement: Placement) -> BezPath;

    /// Centerline midpoint and length of the segment.
    fn anchor_and_extent(&self, depth: usize, placement: Placement) -> Anchor;

    /// Thickness of one depth level.
    fn layer_height(&self) -> f64;

    /// Square icon rect centered on the anchor, if an icon of
    /// `icon_scale * layer_height` fits along the segment.
    fn icon_placement(&self, depth: usize, placement: Placement, icon_scale: f64) -> Option<Rect> {
        let icon_size = icon_scale * self.layer_height();
        let anchor = self.anchor_and_extent(depth, placement);
        (icon_size < anchor.extent)
            .then(|| Rect::from_center_size(anchor.point, Size::new(icon_size, icon_size)))
    }
}

/// Concentric rings around a center, one ring per depth; angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGeometry {
    pub center: Point,
    pub layer_height: f64,
    /// Radius of the empty hole, in layer heights
    pub inner_radius_weight: f64,
}

impl RadialGeometry {
    pub fn new(center: Point, layer_height: f64, inner_radius_weight: f64) -> Self {
        Self {
            center,
            layer_height,
            inner_radius_weight,
        }
    }

    /// Sizes rings so that `max_depth` of them plus the hole fit `viewport`.
    pub fn fit(
        viewport: Size,
        max_depth: usize,
        inner_radius_weight: f64,
        skip_length: f64,
    ) -> Self {
        let layers = max_depth as f64 + inner_radius_weight;
        let side = viewport.width.min(viewport.height);
        let layer_height = if layers > 0.0 {
            ((side - max_depth as f64 * skip_length) / (layers * 2.0)).max(0.0)
        } else {
            0.0
        };
        debug!(
            "fit {}x{} with {} layers: layer height {}",
            viewport.width, viewport.height, layers, layer_height
        );
        Self {
            center: Point::new(viewport.width / 2.0, viewport.height / 2.0),
            layer_height,
            inner_radius_weight,
        }
    }

    /// Side length a view wants for `max_depth` rings of `layer_height`.
    pub fn preferred_side(
        max_depth: usize,
        layer_height: f64,
        inner_radius_weight: f64,
        skip_length: f64,
    ) -> f64 {
        let layers = max_depth as f64 + inner_radius_weight;
        (layer_height * layers + max_depth as f64 * skip_length).round()
    }

    /// Inner and outer radius of the ring at `depth`.
    pub fn ring(&self, depth: usize) -> (f64, f64) {
        let h = self.layer_height;
        let hole = self.inner_radius_weight * h;
        let inner_offset = if depth <= 1 {
            0.0
        } else {
            (depth - 1) as f64 * h + h * RING_SPACING
        };
        (hole + inner_offset, hole + depth as f64 * h)
    }

    fn sector(&self, depth: usize, placement: Placement) -> CircleSegment {
        let (inner, outer) = self.ring(depth);
        CircleSegment::new(
            self.center,
            outer,
            inner,
            placement.start.to_radians(),
            placement.sweep.to_radians(),
        )
    }
}

impl SegmentGeometry for RadialGeometry {
    fn boundary_path(&self, depth: usize, placement: Placement) -> BezPath {
        self.sector(depth, placement).to_path(PATH_TOLERANCE)
    }

    fn anchor_and_extent(&self, depth: usize, placement: Placement) -> Anchor {
        let (inner, outer) = self.ring(depth);
        let middle = (inner + outer) / 2.0;
        let angle = (placement.start + placement.sweep / 2.0).to_radians();
        Anchor {
            point: self.center + Vec2::from_angle(angle) * middle,
            extent: middle * placement.sweep.abs().to_radians(),
        }
    }

    fn layer_height(&self) -> f64 {
        self.layer_height
    }
}

/// Geometry for `domain`, sized to `viewport`.
pub fn geometry_for(
    domain: LayoutDomain,
    viewport: Size,
    max_depth: usize,
    inner_radius_weight: f64,
    skip_length: f64,
) -> RenderResult<Box<dyn SegmentGeometry>> {
    match domain {
        LayoutDomain::Radial => Ok(Box::new(RadialGeometry::fit(
            viewport,
            max_depth,
            inner_radius_weight,
            skip_length,
        ))),
        LayoutDomain::Percentage => {
            warn!("{} geometry is not yet implemented", domain);
            Err(RenderError::UnsupportedDomain(domain))
        }
    }
}
