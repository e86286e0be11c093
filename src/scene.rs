//! Scene ownership and the discrete physics step.
//!
//! The scene is the sole mutator: it owns every body, force generator, and
//! collision watcher. One tick runs four passes in order: apply force
//! generators, integrate bodies, evaluate collision watchers, sweep.
//! Removal is deferred: handlers flag bodies mid-tick, and the flagged body
//! is skipped by every remaining pass and swept only at the tick boundary,
//! so no pass is ever invalidated while it runs.

use crate::body::{Body, BodyId};
use crate::collision::{CollisionHandler, find_collision};
use crate::error::Result;
use crate::forces::ForceLaw;

/// A force law bound to its target bodies
struct ForceGenerator<M> {
    law: Box<dyn ForceLaw<M>>,
    primary: BodyId,
    secondary: Option<BodyId>,
}

/// A handler watching one body pair
struct CollisionWatcher<M> {
    handler: Box<dyn CollisionHandler<M>>,
    first: BodyId,
    second: BodyId,
}

/// Owner of all bodies and registries, advanced one `dt` at a time.
///
/// Bodies live in insertion order with monotonically increasing ids, so a
/// `BodyId` works as a stable external index: lookups binary-search the id
/// and simply miss once the body is swept.
pub struct Scene<M> {
    bodies: Vec<Body<M>>,
    generators: Vec<ForceGenerator<M>>,
    watchers: Vec<CollisionWatcher<M>>,
    next_id: u32,
}

impl<M> Default for Scene<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Scene<M> {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            generators: Vec::new(),
            watchers: Vec::new(),
            next_id: 1,
        }
    }

    /// Take ownership of a body, assigning its stable handle.
    pub fn add_body(&mut self, mut body: Body<M>) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        body.set_id(id);
        self.bodies.push(body);
        id
    }

    /// Look up a live body. Misses for swept handles and for bodies already
    /// flagged removed.
    pub fn body(&self, id: BodyId) -> Option<&Body<M>> {
        let index = lookup_index(&self.bodies, id)?;
        Some(&self.bodies[index])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body<M>> {
        let index = lookup_index(&self.bodies, id)?;
        Some(&mut self.bodies[index])
    }

    /// Live bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = &Body<M>> {
        self.bodies.iter().filter(|b| !b.is_removed())
    }

    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    /// Flag a body for removal; it is swept at the next tick boundary.
    pub fn remove_body(&mut self, id: BodyId) {
        if let Some(body) = self.body_mut(id) {
            body.mark_removed();
        }
    }

    /// Whether the handle no longer resolves to a live body (flagged or
    /// already swept).
    pub fn is_removed(&self, id: BodyId) -> bool {
        self.body(id).is_none()
    }

    /// Register a force law against one (`secondary: None`) or two bodies.
    /// Re-evaluated every tick until a target is removed.
    pub fn add_force_generator(
        &mut self,
        law: impl ForceLaw<M> + 'static,
        primary: BodyId,
        secondary: Option<BodyId>,
    ) {
        self.generators.push(ForceGenerator {
            law: Box::new(law),
            primary,
            secondary,
        });
    }

    /// Register a collision handler for a body pair. The detector runs on
    /// the pair every tick after integration; the handler fires on overlap.
    pub fn add_collision_watcher(
        &mut self,
        first: BodyId,
        second: BodyId,
        handler: impl CollisionHandler<M> + 'static,
    ) {
        self.watchers.push(CollisionWatcher {
            handler: Box::new(handler),
            first,
            second,
        });
    }

    /// Advance the scene by one discrete step:
    /// forces → integration → collisions → sweep.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        self.apply_forces();
        for body in self.bodies.iter_mut().filter(|b| !b.is_removed()) {
            body.tick(dt);
        }
        self.run_watchers()?;
        self.sweep();
        Ok(())
    }

    fn apply_forces(&mut self) {
        for generator in &mut self.generators {
            match generator.secondary {
                None => {
                    if let Some(index) = lookup_index(&self.bodies, generator.primary) {
                        generator.law.apply(&mut self.bodies[index], None);
                    }
                }
                Some(second_id) => {
                    if let Some((a, b)) =
                        lookup_pair_mut(&mut self.bodies, generator.primary, second_id)
                    {
                        generator.law.apply(a, Some(b));
                    }
                }
            }
        }
    }

    fn run_watchers(&mut self) -> Result<()> {
        for watcher in &mut self.watchers {
            let Some((a, b)) = lookup_pair_mut(&mut self.bodies, watcher.first, watcher.second)
            else {
                continue;
            };
            let info = find_collision(a.shape(), b.shape())?;
            if info.collided {
                watcher.handler.handle(a, b, info.axis)?;
            }
        }
        Ok(())
    }

    /// Drop flagged bodies and every registry entry referencing them.
    fn sweep(&mut self) {
        let before = self.bodies.len();
        self.bodies.retain(|b| !b.is_removed());
        if self.bodies.len() == before {
            return;
        }

        let bodies = &self.bodies;
        let alive = |id: BodyId| lookup_index(bodies, id).is_some();
        self.generators
            .retain(|g| alive(g.primary) && g.secondary.is_none_or(|id| alive(id)));
        self.watchers.retain(|w| alive(w.first) && alive(w.second));

        log::debug!(
            "swept {} bodies, {} generators and {} watchers remain",
            before - self.bodies.len(),
            self.generators.len(),
            self.watchers.len()
        );
    }
}

/// Binary search by id; `None` for swept handles and flagged bodies
fn lookup_index<M>(bodies: &[Body<M>], id: BodyId) -> Option<usize> {
    let index = bodies.binary_search_by_key(&id, |b| b.id()).ok()?;
    (!bodies[index].is_removed()).then_some(index)
}

/// Disjoint mutable borrows of two live bodies
fn lookup_pair_mut<M>(
    bodies: &mut [Body<M>],
    first: BodyId,
    second: BodyId,
) -> Option<(&mut Body<M>, &mut Body<M>)> {
    let i = lookup_index(bodies, first)?;
    let j = lookup_index(bodies, second)?;
    if i == j {
        return None;
    }
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        Some((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = bodies.split_at_mut(i);
        Some((&mut right[0], &mut left[j]))
    }
}
