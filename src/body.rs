//! Rigid bodies
//!
//! A body owns its polygon, a cached centroid, and two per-tick
//! accumulators: `force` (dt-scaled on integration) and `impulse`
//! (dt-independent). Keeping the two separate makes collision response
//! frame-rate independent while continuous forces still scale with the
//! step. The centroid cache is maintained through every translation and
//! rotation so `centroid == shape.centroid()` at all observable times.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;

/// Stable handle for a body owned by a scene.
///
/// Ids are allocated monotonically in insertion order and never reused, so
/// a handle to a swept body is a lookup miss rather than a dangling access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(u32);

impl BodyId {
    /// Placeholder for a body not yet owned by a scene
    pub(crate) const UNASSIGNED: BodyId = BodyId(0);

    pub(crate) fn new(raw: u32) -> Self {
        BodyId(raw)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pass-through display color; the core never interprets it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A rigid body with a convex polygon shape and typed payload `M`.
///
/// `M` is whatever per-body state the game needs (hull integrity, score
/// value, ...); the core stores and releases it but never looks inside.
#[derive(Debug)]
pub struct Body<M> {
    id: BodyId,
    shape: Polygon,
    mass: f32,
    centroid: Vec2,
    direction: f32,
    velocity: Vec2,
    force: Vec2,
    impulse: Vec2,
    elasticity: f32,
    angular_velocity: f32,
    color: Color,
    info: Option<M>,
    removed: bool,
}

impl<M> Body<M> {
    /// Create a body at rest.
    ///
    /// `mass` must be positive; `f32::INFINITY` marks an immovable body.
    ///
    /// # Panics
    /// Panics on a non-positive or NaN mass.
    pub fn new(shape: Polygon, mass: f32, color: Color) -> Self {
        assert!(mass > 0.0, "body mass must be positive or infinite");
        let centroid = shape.centroid();
        Self {
            id: BodyId::UNASSIGNED,
            shape,
            mass,
            centroid,
            direction: 0.0,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            impulse: Vec2::ZERO,
            elasticity: 1.0,
            angular_velocity: 0.0,
            color,
            info: None,
            removed: false,
        }
    }

    /// Create a body carrying a payload.
    pub fn with_info(shape: Polygon, mass: f32, color: Color, info: M) -> Self {
        let mut body = Self::new(shape, mass, color);
        body.info = Some(info);
        body
    }

    /// Create an immovable body (infinite mass), e.g. a world boundary.
    pub fn immovable(shape: Polygon, color: Color) -> Self {
        Self::new(shape, f32::INFINITY, color)
    }

    /// Handle assigned when the body joins a scene
    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    /// Current shape. Clone for an owned copy; body state cannot be
    /// mutated through the borrow.
    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Rigidly translate the shape so its centroid lands on `target`.
    pub fn set_centroid(&mut self, target: Vec2) {
        self.shape.translate(target - self.centroid);
        self.centroid = target;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Cumulative rotation angle in radians
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Rotate the shape about its own centroid to an absolute angle.
    ///
    /// Only the delta against the tracked direction is applied, so repeated
    /// calls with the same angle are no-ops.
    pub fn set_rotation(&mut self, angle: f32) {
        self.shape.rotate_about(angle - self.direction, self.centroid);
        self.direction = angle;
    }

    pub fn elasticity(&self) -> f32 {
        self.elasticity
    }

    pub fn set_elasticity(&mut self, elasticity: f32) {
        self.elasticity = elasticity;
    }

    /// Tracked for handlers and future extension; the integrator does not
    /// apply it to position or orientation.
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        self.angular_velocity = angular_velocity;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn info(&self) -> Option<&M> {
        self.info.as_ref()
    }

    pub fn info_mut(&mut self) -> Option<&mut M> {
        self.info.as_mut()
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Overwrite the force accumulator (rare; prefer `add_force`)
    pub fn set_force(&mut self, force: Vec2) {
        self.force = force;
    }

    /// Accumulate into the per-tick force
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn impulse(&self) -> Vec2 {
        self.impulse
    }

    pub fn set_impulse(&mut self, impulse: Vec2) {
        self.impulse = impulse;
    }

    /// Accumulate into the per-tick impulse
    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    /// Direct velocity kick, bypassing the accumulators
    pub fn accelerate(&mut self, delta_v: Vec2) {
        self.velocity += delta_v;
    }

    /// Velocity kick of `amount` along the body's current direction
    pub fn accelerate_forward(&mut self, amount: f32) {
        self.accelerate(Vec2::from_angle(self.direction) * amount);
    }

    /// Advance one integration step.
    ///
    /// Impulse response first (dt-independent), then force response scaled
    /// by `dt`; the position advances by the trapezoidal average of the
    /// pre- and post-step velocities. Both accumulators reset afterwards.
    /// An infinite mass contributes exactly zero in the velocity steps.
    pub fn tick(&mut self, dt: f32) {
        let old_velocity = self.velocity;
        if self.mass.is_finite() {
            self.velocity += self.impulse / self.mass;
            self.velocity += self.force * (dt / self.mass);
        }
        let average = (old_velocity + self.velocity) * 0.5;
        self.set_centroid(self.centroid + average * dt);
        self.impulse = Vec2::ZERO;
        self.force = Vec2::ZERO;
    }

    /// Flag for removal; the owning scene sweeps at the tick boundary.
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Euclidean distance between the two bodies' centroids
    pub fn distance_to(&self, other: &Body<M>) -> f32 {
        (self.centroid - other.centroid).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn rectangle(width: f32, height: f32) -> Polygon {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Polygon::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_body_centroid_and_defaults() {
        let body: Body<()> = Body::new(rectangle(10.0, 10.0), 1.0, Color::WHITE);
        assert!(body.centroid().length() < 1e-6);
        assert_eq!(body.velocity(), Vec2::ZERO);
        assert_eq!(body.force(), Vec2::ZERO);
        assert_eq!(body.impulse(), Vec2::ZERO);
        assert_eq!(body.direction(), 0.0);
        assert_eq!(body.elasticity(), 1.0);
        assert!(!body.is_removed());
    }

    #[test]
    fn test_set_centroid_translates_every_vertex() {
        let mut body: Body<()> = Body::new(rectangle(10.0, 10.0), 1.0, Color::WHITE);
        let before = body.shape().vertices().to_vec();
        body.set_centroid(Vec2::new(5.0, 5.0));
        assert_eq!(body.centroid(), Vec2::new(5.0, 5.0));
        for (old, new) in before.iter().zip(body.shape().vertices()) {
            assert_eq!(*new, *old + Vec2::new(5.0, 5.0));
        }
    }

    #[test]
    fn test_force_response_scales_with_dt() {
        let mut body: Body<()> = Body::new(rectangle(2.0, 2.0), 2.0, Color::WHITE);
        body.add_force(Vec2::new(4.0, 0.0));
        body.tick(0.01);
        assert!((body.velocity().x - 0.02).abs() < 1e-7);
        assert_eq!(body.velocity().y, 0.0);
        // Trapezoidal: (0 + 0.02) / 2 * 0.01
        assert!((body.centroid().x - 0.0001).abs() < 1e-7);
        assert_eq!(body.centroid().y, 0.0);
        // Accumulators reset
        assert_eq!(body.force(), Vec2::ZERO);
        assert_eq!(body.impulse(), Vec2::ZERO);
    }

    #[test]
    fn test_impulse_response_is_dt_independent() {
        let impulse = Vec2::new(3.0, -1.5);
        let mass = 4.0;

        let mut small_dt: Body<()> = Body::new(rectangle(2.0, 2.0), mass, Color::WHITE);
        small_dt.add_impulse(impulse);
        small_dt.tick(0.01);

        let mut large_dt: Body<()> = Body::new(rectangle(2.0, 2.0), mass, Color::WHITE);
        large_dt.add_impulse(impulse);
        large_dt.tick(1.0);

        let expected = impulse / mass;
        assert!((small_dt.velocity() - expected).length() < 1e-6);
        assert!((large_dt.velocity() - expected).length() < 1e-6);
    }

    #[test]
    fn test_add_force_accumulates_set_force_overwrites() {
        let mut body: Body<()> = Body::new(rectangle(2.0, 2.0), 1.0, Color::WHITE);
        body.add_force(Vec2::new(1.0, 0.0));
        body.add_force(Vec2::new(2.0, 1.0));
        assert_eq!(body.force(), Vec2::new(3.0, 1.0));
        body.set_force(Vec2::new(0.5, 0.5));
        assert_eq!(body.force(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_infinite_mass_ignores_accumulators() {
        let mut wall: Body<()> = Body::immovable(rectangle(100.0, 100.0), Color::BLACK);
        wall.set_velocity(Vec2::new(1.0, 0.0));
        wall.add_force(Vec2::new(1e30, 0.0));
        wall.add_impulse(Vec2::new(1e30, 0.0));
        wall.tick(0.01);
        // Velocity untouched, position still advances, nothing is NaN
        assert_eq!(wall.velocity(), Vec2::new(1.0, 0.0));
        assert!((wall.centroid().x - 0.01).abs() < 1e-6);
        assert!(wall.centroid().is_finite());
    }

    #[test]
    fn test_set_rotation_applies_delta_only() {
        let mut body: Body<()> = Body::new(rectangle(4.0, 2.0), 1.0, Color::WHITE);
        body.set_rotation(std::f32::consts::FRAC_PI_2);
        let after_quarter = body.shape().vertices().to_vec();
        // Re-applying the same absolute angle must not move the shape
        body.set_rotation(std::f32::consts::FRAC_PI_2);
        for (a, b) in after_quarter.iter().zip(body.shape().vertices()) {
            assert!((*a - *b).length() < 1e-6);
        }
        assert_eq!(body.direction(), std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_rotation_keeps_centroid_fixed() {
        let mut body: Body<()> = Body::new(rectangle(4.0, 2.0), 1.0, Color::WHITE);
        body.set_centroid(Vec2::new(3.0, -2.0));
        body.set_rotation(0.7);
        assert!((body.centroid() - Vec2::new(3.0, -2.0)).length() < 1e-5);
        assert!((body.shape().centroid() - body.centroid()).length() < 1e-4);
    }

    #[test]
    fn test_accelerate_forward_follows_direction() {
        let mut body: Body<()> = Body::new(rectangle(2.0, 2.0), 1.0, Color::WHITE);
        body.set_rotation(std::f32::consts::FRAC_PI_2);
        body.accelerate_forward(2.0);
        assert!(body.velocity().x.abs() < 1e-6);
        assert!((body.velocity().y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_between_bodies() {
        let mut a: Body<()> = Body::new(rectangle(2.0, 2.0), 1.0, Color::WHITE);
        let mut b: Body<()> = Body::new(rectangle(2.0, 2.0), 1.0, Color::WHITE);
        a.set_centroid(Vec2::new(0.0, 0.0));
        b.set_centroid(Vec2::new(3.0, 4.0));
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "mass must be positive")]
    fn test_zero_mass_rejected() {
        let _body: Body<()> = Body::new(rectangle(2.0, 2.0), 0.0, Color::WHITE);
    }
}
