//! Polyphys - a 2D rigid-body physics core for polygon arcade games
//!
//! Core modules:
//! - `geometry`: Convex polygon math (centroids, rigid transforms)
//! - `body`: Rigid bodies with decoupled force/impulse accumulators
//! - `collision`: Convex-polygon detection (SAT) and impulse response
//! - `forces`: Force laws the scene re-applies every tick
//! - `scene`: Body ownership, registries, and the discrete physics step
//!
//! The engine is single-threaded and frame-stepped: the host decides when a
//! tick happens and how large `dt` is; the core has no notion of wall-clock
//! time. Bodies flagged for removal mid-tick stay in place until the sweep
//! at the tick boundary, so no pass is ever invalidated by a handler.

pub mod body;
pub mod collision;
pub mod error;
pub mod forces;
pub mod geometry;
pub mod scene;

pub use body::{Body, BodyId, Color};
pub use collision::{CollisionHandler, CollisionInfo, ElasticBounce, find_collision};
pub use error::{PhysicsError, Result};
pub use forces::{Drag, ForceLaw, NewtonianGravity, Spring};
pub use geometry::Polygon;
pub use scene::Scene;

use glam::Vec2;

/// Engine tuning constants
pub mod consts {
    /// Squared edge length below which no valid separating axis exists
    pub const DEGENERATE_EDGE_EPSILON: f32 = 1e-12;

    /// Micro-step used while backing interpenetrating bodies apart
    pub const SEPARATION_DT: f32 = 1e-3;

    /// Micro-steps allowed before falling back to a positional shift
    pub const MAX_SEPARATION_STEPS: u32 = 256;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
