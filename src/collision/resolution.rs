//! Collision response.
//!
//! The scene only reports contacts; what happens next is policy. A handler
//! receives both bodies and the minimum-penetration axis and decides the
//! reaction: impulse exchange, damage, scoring, despawning. `ElasticBounce`
//! is the reference handler: equal-and-opposite impulses scaled by the
//! reduced mass, followed by a bounded micro-step separation pass.

use glam::Vec2;

use crate::body::Body;
use crate::collision::detection::find_collision;
use crate::consts::{MAX_SEPARATION_STEPS, SEPARATION_DT};
use crate::error::Result;

/// Reaction policy invoked when a watched pair overlaps.
///
/// Implemented for any `FnMut(&mut Body<M>, &mut Body<M>, Vec2)` closure,
/// so ad-hoc handlers don't need a struct. Captured state plays the role of
/// auxiliary data and is released when the watcher is dropped.
pub trait CollisionHandler<M> {
    fn handle(&mut self, a: &mut Body<M>, b: &mut Body<M>, axis: Vec2) -> Result<()>;
}

impl<M, F> CollisionHandler<M> for F
where
    F: FnMut(&mut Body<M>, &mut Body<M>, Vec2),
{
    fn handle(&mut self, a: &mut Body<M>, b: &mut Body<M>, axis: Vec2) -> Result<()> {
        self(a, b, axis);
        Ok(())
    }
}

/// Effective mass governing a two-body impulse exchange: `m1·m2/(m1+m2)`,
/// special-cased to the finite mass when the other body is immovable.
pub fn reduced_mass<M>(a: &Body<M>, b: &Body<M>) -> f32 {
    if a.mass().is_infinite() {
        b.mass()
    } else if b.mass().is_infinite() {
        a.mass()
    } else {
        a.mass() * b.mass() / (a.mass() + b.mass())
    }
}

/// Apply equal-and-opposite impulses along the collision axis.
///
/// Magnitude is `reduced_mass · (1 + e_a·e_b) · |Δv_axis|`; two bodies at
/// the default elasticity of 1 bounce perfectly. The sign pushes each body
/// away from the other along the axis, judged by which centroid is ahead.
pub fn exchange_impulses<M>(a: &mut Body<M>, b: &mut Body<M>, axis: Vec2) {
    let mass = reduced_mass(a, b);
    let vel_diff = (axis.dot(a.velocity()) - axis.dot(b.velocity())).abs();
    let ahead = if axis.dot(b.centroid() - a.centroid()) >= 0.0 {
        1.0
    } else {
        -1.0
    };
    let restitution = 1.0 + a.elasticity() * b.elasticity();
    let magnitude = mass * restitution * vel_diff;
    a.add_impulse(axis * (-ahead * magnitude));
    b.add_impulse(axis * (ahead * magnitude));
}

/// Micro-integrate both bodies until the detector reports separation.
///
/// The first micro-step consumes any impulses queued by the handler, so
/// freshly bounced bodies back out along their new velocities. The loop is
/// capped at `MAX_SEPARATION_STEPS`; on exhaustion the remaining overlap is
/// resolved with a direct positional shift along the current minimum axis.
pub fn separate<M>(a: &mut Body<M>, b: &mut Body<M>) -> Result<()> {
    for _ in 0..MAX_SEPARATION_STEPS {
        if !find_collision(a.shape(), b.shape())?.collided {
            return Ok(());
        }
        a.tick(SEPARATION_DT);
        b.tick(SEPARATION_DT);
    }

    let info = find_collision(a.shape(), b.shape())?;
    if info.collided {
        log::warn!(
            "separation budget exhausted for bodies {} and {}, shifting {}",
            a.id(),
            b.id(),
            info.overlap
        );
        shift_apart(a, b, info.axis, info.overlap);
    }
    Ok(())
}

/// Direct positional correction: split the overlap between the finite-mass
/// bodies. Immovable bodies never move.
fn shift_apart<M>(a: &mut Body<M>, b: &mut Body<M>, axis: Vec2, overlap: f32) {
    let ahead = if axis.dot(b.centroid() - a.centroid()) >= 0.0 {
        1.0
    } else {
        -1.0
    };
    let (share_a, share_b) = match (a.mass().is_finite(), b.mass().is_finite()) {
        (true, true) => (0.5, 0.5),
        (true, false) => (1.0, 0.0),
        (false, true) => (0.0, 1.0),
        (false, false) => return,
    };
    a.set_centroid(a.centroid() - axis * (ahead * overlap * share_a));
    b.set_centroid(b.centroid() + axis * (ahead * overlap * share_b));
}

/// Reference handler: elastic impulse exchange, then separation.
pub struct ElasticBounce;

impl<M> CollisionHandler<M> for ElasticBounce {
    fn handle(&mut self, a: &mut Body<M>, b: &mut Body<M>, axis: Vec2) -> Result<()> {
        exchange_impulses(a, b, axis);
        separate(a, b)
    }
}
