//! Convex-polygon collision detection and response.
//!
//! This module handles:
//! - **Detection**: separating-axis testing over both polygons' edge
//!   normals, reporting the minimum-penetration axis
//! - **Resolution**: handler plumbing plus the reference elastic-impulse
//!   response

pub mod detection;
pub mod resolution;

pub use detection::{CollisionInfo, find_collision};
pub use resolution::{
    CollisionHandler, ElasticBounce, exchange_impulses, reduced_mass, separate,
};
