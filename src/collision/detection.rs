//! Separating axis theorem over convex polygon pairs.
//!
//! Two convex shapes are disjoint iff some axis exists along which their
//! projections do not overlap; for polygons only the edge normals need
//! checking. Axes are taken from the first shape's edges then the second's,
//! in vertex order with the closing edge included, so tie-breaking between
//! equally shallow axes is reproducible run to run.
//!
//! Exhaustive pairwise testing with no broad phase: fine for the small
//! convex shapes and body counts of an arcade scene.

use glam::Vec2;

use crate::consts::DEGENERATE_EDGE_EPSILON;
use crate::error::{PhysicsError, Result};
use crate::geometry::Polygon;

/// Result of a polygon-pair intersection test.
///
/// `axis` and `overlap` are meaningful only when `collided` is true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub collided: bool,
    /// Unit vector along the minimum-penetration axis
    pub axis: Vec2,
    /// Penetration depth along `axis`
    pub overlap: f32,
}

impl CollisionInfo {
    pub fn miss() -> Self {
        Self {
            collided: false,
            axis: Vec2::ZERO,
            overlap: 0.0,
        }
    }
}

/// Test two convex polygons for overlap.
///
/// Shapes must be simple convex polygons in CCW order. Projections that
/// merely touch do not count as overlap (strict inequality), so shapes
/// sharing an edge are reported disjoint.
///
/// # Errors
/// `DegenerateEdge` if two consecutive vertices coincide; such an edge has
/// no normal and would otherwise poison every projection with NaN.
pub fn find_collision(shape1: &Polygon, shape2: &Polygon) -> Result<CollisionInfo> {
    let mut min_overlap = f32::INFINITY;
    let mut collision_axis = Vec2::ZERO;

    let axes = shape1.edges().chain(shape2.edges());
    for (index, (start, end)) in axes.enumerate() {
        let edge = end - start;
        let length_sq = edge.length_squared();
        if length_sq < DEGENERATE_EDGE_EPSILON {
            return Err(PhysicsError::DegenerateEdge { edge: index });
        }
        // Outward normal for CCW winding
        let axis = Vec2::new(edge.y, -edge.x) / length_sq.sqrt();

        let (min1, max1) = project(shape1, axis);
        let (min2, max2) = project(shape2, axis);
        if !(min1 < max2 && min2 < max1) {
            return Ok(CollisionInfo::miss());
        }

        let overlap = (max1 - min2).min(max2 - min1);
        if overlap < min_overlap {
            min_overlap = overlap;
            collision_axis = axis;
        }
    }

    Ok(CollisionInfo {
        collided: true,
        axis: collision_axis,
        overlap: min_overlap,
    })
}

/// Project every vertex onto `axis`, returning the interval (min, max)
fn project(shape: &Polygon, axis: Vec2) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &vertex in shape.vertices() {
        let dot = axis.dot(vertex);
        min = min.min(dot);
        max = max.max(dot);
    }
    (min, max)
}
