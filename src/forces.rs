//! Force laws applied by the scene every tick, before integration.
//!
//! A law is bound to one or two bodies at registration and re-evaluated
//! against current centroids each tick, accumulating into the bodies'
//! force accumulators. Laws are policy; the scene only guarantees
//! "evaluate and apply once per tick, before integration".

use glam::Vec2;

use crate::body::Body;

/// Centroid distances below this are clamped so near-misses don't slingshot
const MIN_GRAVITY_DISTANCE: f32 = 5.0;

/// A force law bound to one or two bodies.
///
/// Implemented for any `FnMut(&mut Body<M>, Option<&mut Body<M>>)` closure;
/// captured state carries the law's constants.
pub trait ForceLaw<M> {
    /// Evaluate against current centroids and accumulate onto the bodies.
    /// `secondary` is present only for two-body laws.
    fn apply(&mut self, primary: &mut Body<M>, secondary: Option<&mut Body<M>>);
}

impl<M, F> ForceLaw<M> for F
where
    F: FnMut(&mut Body<M>, Option<&mut Body<M>>),
{
    fn apply(&mut self, primary: &mut Body<M>, secondary: Option<&mut Body<M>>) {
        self(primary, secondary)
    }
}

/// Inverse-square attraction between two bodies.
pub struct NewtonianGravity {
    pub g: f32,
    /// Minimum effective centroid distance
    pub min_distance: f32,
}

impl NewtonianGravity {
    pub fn new(g: f32) -> Self {
        Self {
            g,
            min_distance: MIN_GRAVITY_DISTANCE,
        }
    }
}

impl<M> ForceLaw<M> for NewtonianGravity {
    fn apply(&mut self, primary: &mut Body<M>, secondary: Option<&mut Body<M>>) {
        let Some(secondary) = secondary else { return };
        let diff = secondary.centroid() - primary.centroid();
        let distance = diff.length().max(self.min_distance);
        let magnitude = self.g * primary.mass() * secondary.mass() / (distance * distance);
        if !magnitude.is_finite() {
            // An immovable endpoint would poison the accumulators
            return;
        }
        let direction = diff / distance;
        primary.add_force(direction * magnitude);
        secondary.add_force(direction * -magnitude);
    }
}

/// Hooke spring with zero rest length between two centroids.
pub struct Spring {
    pub k: f32,
}

impl Spring {
    pub fn new(k: f32) -> Self {
        Self { k }
    }
}

impl<M> ForceLaw<M> for Spring {
    fn apply(&mut self, primary: &mut Body<M>, secondary: Option<&mut Body<M>>) {
        let Some(secondary) = secondary else { return };
        let displacement = secondary.centroid() - primary.centroid();
        primary.add_force(displacement * self.k);
        secondary.add_force(displacement * -self.k);
    }
}

/// Linear drag opposing a single body's velocity.
pub struct Drag {
    pub gamma: f32,
}

impl Drag {
    pub fn new(gamma: f32) -> Self {
        Self { gamma }
    }
}

impl<M> ForceLaw<M> for Drag {
    fn apply(&mut self, primary: &mut Body<M>, _secondary: Option<&mut Body<M>>) {
        primary.add_force(primary.velocity() * -self.gamma);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Color;
    use crate::geometry::Polygon;

    fn body_at(center: Vec2, mass: f32) -> Body<()> {
        let shape = Polygon::new(vec![
            center + Vec2::new(-1.0, -1.0),
            center + Vec2::new(1.0, -1.0),
            center + Vec2::new(1.0, 1.0),
            center + Vec2::new(-1.0, 1.0),
        ])
        .unwrap();
        Body::new(shape, mass, Color::WHITE)
    }

    #[test]
    fn test_gravity_is_equal_and_opposite() {
        let mut a = body_at(Vec2::ZERO, 10.0);
        let mut b = body_at(Vec2::new(20.0, 0.0), 5.0);
        NewtonianGravity::new(1.0).apply(&mut a, Some(&mut b));

        assert!((a.force() + b.force()).length() < 1e-5);
        // a is pulled toward b
        assert!(a.force().x > 0.0);
        assert!(b.force().x < 0.0);
        // |F| = g m1 m2 / d^2 = 50 / 400
        assert!((a.force().x - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_gravity_clamps_close_encounters() {
        let mut a = body_at(Vec2::ZERO, 10.0);
        let mut b = body_at(Vec2::new(0.1, 0.0), 10.0);
        NewtonianGravity::new(1.0).apply(&mut a, Some(&mut b));
        // Clamped to min_distance = 5: |F| = 100 / 25
        assert!((a.force().x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_gravity_skips_immovable_endpoint() {
        let mut anchor: Body<()> = Body::immovable(
            Polygon::new(vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(0.0, 1.0),
            ])
            .unwrap(),
            Color::BLACK,
        );
        let mut b = body_at(Vec2::new(20.0, 0.0), 5.0);
        NewtonianGravity::new(1.0).apply(&mut anchor, Some(&mut b));
        assert_eq!(anchor.force(), Vec2::ZERO);
        assert_eq!(b.force(), Vec2::ZERO);
    }

    #[test]
    fn test_gravity_without_secondary_is_inert() {
        let mut a = body_at(Vec2::ZERO, 10.0);
        NewtonianGravity::new(1.0).apply(&mut a, None);
        assert_eq!(a.force(), Vec2::ZERO);
    }

    #[test]
    fn test_spring_pulls_bodies_together() {
        let mut a = body_at(Vec2::ZERO, 1.0);
        let mut b = body_at(Vec2::new(0.0, 4.0), 1.0);
        Spring::new(2.0).apply(&mut a, Some(&mut b));
        assert!((a.force().y - 8.0).abs() < 1e-6);
        assert!((b.force().y + 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let mut a = body_at(Vec2::ZERO, 1.0);
        a.set_velocity(Vec2::new(3.0, -4.0));
        Drag::new(0.5).apply(&mut a, None);
        assert!((a.force() - Vec2::new(-1.5, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_closure_as_force_law() {
        let mut law = |primary: &mut Body<()>, _: Option<&mut Body<()>>| {
            primary.add_force(Vec2::new(0.0, -9.8));
        };
        let mut a = body_at(Vec2::ZERO, 1.0);
        law.apply(&mut a, None);
        assert!((a.force().y + 9.8).abs() < 1e-6);
    }
}
