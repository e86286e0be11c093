//! Error types for the physics core.
//!
//! Geometry failures surface as values rather than NaN: a degenerate edge
//! cannot be normalized into a separating axis, so the detector rejects the
//! shape instead of propagating non-finite math into the scene.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// A polygon needs at least three vertices to bound an area.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// Two consecutive vertices coincide; the edge has no normal.
    #[error("zero-length edge {edge} cannot define a separating axis")]
    DegenerateEdge {
        /// Index into the combined edge sequence (first shape, then second)
        edge: usize,
    },
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
