//! Convex polygon geometry
//!
//! Shapes are vertex lists in counter-clockwise order with an implicit
//! closing edge from the last vertex back to the first. Vector algebra is
//! glam's; this module adds the polygon-level operations the bodies need:
//! area-weighted centroid, rigid translation, and rotation about a pivot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// A simple convex polygon, vertices in CCW order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Build from a CCW vertex list.
    ///
    /// Convexity and winding are the caller's responsibility (shapes come
    /// from trusted factories); the vertex count is not.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Edges as (start, end) pairs, the closing edge included
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Signed area via the shoelace formula (positive for CCW winding)
    pub fn signed_area(&self) -> f32 {
        self.edges().map(|(a, b)| a.perp_dot(b)).sum::<f32>() / 2.0
    }

    /// Area-weighted centroid
    pub fn centroid(&self) -> Vec2 {
        let area = self.signed_area();
        let weighted: Vec2 = self.edges().map(|(a, b)| (a + b) * a.perp_dot(b)).sum();
        weighted / (6.0 * area)
    }

    /// Rigidly translate every vertex
    pub fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    /// Rotate every vertex about `pivot` by `angle` radians, CCW
    pub fn rotate_about(&mut self, angle: f32, pivot: Vec2) {
        let rotation = Vec2::from_angle(angle);
        for v in &mut self.vertices {
            *v = pivot + rotation.rotate(*v - pivot);
        }
    }
}
