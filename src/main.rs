//! Headless demo: a gravity arcade skirmish on the physics core.
//!
//! Spawns a player ship, planets, and drifting raiders, binds gravity
//! generators and hull-damaging collision watchers, then drives the scene
//! with a fixed-timestep accumulator and logs what happens. Shapes and
//! game rules live here, not in the library.
//!
//! Run with `RUST_LOG=info cargo run --bin polyphys-demo [scenario.json]`.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use polyphys::collision::{exchange_impulses, separate};
use polyphys::{
    Body, BodyId, Color, CollisionHandler, ElasticBounce, NewtonianGravity, Polygon, Result, Scene,
    polar_to_cartesian,
};

/// Fixed simulation timestep (100 Hz, the arcade original's cadence)
const SIM_DT: f32 = 0.01;
/// Maximum catch-up steps per frame to prevent spiral of death
const MAX_SUBSTEPS: u32 = 8;

/// Scenario parameters, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Scenario {
    seed: u64,
    /// Half-extent of the square arena
    arena_half: f32,
    planet_count: usize,
    raider_count: usize,
    planet_mass: f32,
    raider_mass: f32,
    ship_mass: f32,
    ship_health: i32,
    raider_health: i32,
    gravity_constant: f32,
    /// Simulated seconds to run
    duration: f32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: 42,
            arena_half: 500.0,
            planet_count: 10,
            raider_count: 10,
            planet_mass: 100_000.0,
            raider_mass: 1.0,
            ship_mass: 1.0,
            ship_health: 5,
            raider_health: 2,
            gravity_constant: 1.0,
            duration: 30.0,
        }
    }
}

impl Scenario {
    /// Load from a JSON file, falling back to defaults
    fn load(path: Option<&str>) -> Self {
        if let Some(path) = path {
            match std::fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(scenario) => {
                        log::info!("Loaded scenario from {path}");
                        return scenario;
                    }
                    Err(e) => log::warn!("Bad scenario file {path}: {e}"),
                },
                Err(e) => log::warn!("Cannot read {path}: {e}"),
            }
        }
        log::info!("Using default scenario");
        Self::default()
    }
}

/// Per-body game state
#[derive(Debug)]
struct Hull {
    health: i32,
}

/// Axis-aligned rectangle centered at the origin, CCW
fn make_rectangle(width: f32, height: f32) -> Result<Polygon> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    Polygon::new(vec![
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ])
}

/// Regular n-gon centered at the origin, CCW
fn make_ngon(sides: usize, radius: f32) -> Result<Polygon> {
    Polygon::new(
        (0..sides)
            .map(|i| {
                polar_to_cartesian(radius, i as f32 / sides as f32 * std::f32::consts::TAU)
            })
            .collect(),
    )
}

/// Bounce, then chip one hull point off each party; zero health despawns.
struct HullDamage;

impl CollisionHandler<Hull> for HullDamage {
    fn handle(&mut self, a: &mut Body<Hull>, b: &mut Body<Hull>, axis: Vec2) -> Result<()> {
        exchange_impulses(a, b, axis);
        for body in [&mut *a, &mut *b] {
            if let Some(hull) = body.info_mut() {
                hull.health -= 1;
                if hull.health <= 0 {
                    log::info!("body {} hull breached, despawning", body.id());
                    body.mark_removed();
                }
            }
        }
        separate(a, b)
    }
}

struct World {
    scene: Scene<Hull>,
    ship: BodyId,
    home_planet: BodyId,
    raiders: Vec<BodyId>,
}

fn random_position(rng: &mut Pcg32, half: f32) -> Vec2 {
    Vec2::new(rng.random_range(-half..half), rng.random_range(-half..half))
}

fn build_world(scenario: &Scenario, rng: &mut Pcg32) -> Result<World> {
    let mut scene: Scene<Hull> = Scene::new();

    // Immovable backdrop the size of the arena
    let backdrop = make_rectangle(scenario.arena_half * 2.0, scenario.arena_half * 2.0)?;
    scene.add_body(Body::immovable(backdrop, Color::BLACK));

    let mut ship_body = Body::with_info(
        make_rectangle(10.0, 10.0)?,
        scenario.ship_mass,
        Color::GREEN,
        Hull {
            health: scenario.ship_health,
        },
    );
    ship_body.set_centroid(Vec2::new(-scenario.arena_half / 2.0, -scenario.arena_half / 2.0));
    let ship = scene.add_body(ship_body);

    // The safe harbor the ship is trying to reach
    let mut home_body = Body::with_info(
        make_ngon(20, 10.0)?,
        scenario.planet_mass,
        Color::GREEN,
        Hull { health: i32::MAX },
    );
    home_body.set_centroid(Vec2::new(scenario.arena_half / 2.0, scenario.arena_half / 2.0));
    let home_planet = scene.add_body(home_body);

    let mut planets = vec![home_planet];
    for _ in 0..scenario.planet_count {
        let mut planet = Body::with_info(
            make_ngon(20, 10.0)?,
            scenario.planet_mass,
            Color::BLUE,
            Hull { health: i32::MAX },
        );
        planet.set_centroid(random_position(rng, scenario.arena_half));
        planets.push(scene.add_body(planet));
    }

    let mut raiders = Vec::with_capacity(scenario.raider_count);
    for _ in 0..scenario.raider_count {
        let mut raider = Body::with_info(
            make_rectangle(10.0, 10.0)?,
            scenario.raider_mass,
            Color::RED,
            Hull {
                health: scenario.raider_health,
            },
        );
        raider.set_centroid(random_position(rng, scenario.arena_half));
        raider.set_velocity(polar_to_cartesian(10.0, rng.random_range(0.0..std::f32::consts::TAU)));
        raiders.push(scene.add_body(raider));
    }

    // Every planet tugs on the ship and on every raider
    for &planet in &planets {
        scene.add_force_generator(
            NewtonianGravity::new(scenario.gravity_constant),
            planet,
            Some(ship),
        );
        for &raider in &raiders {
            scene.add_force_generator(
                NewtonianGravity::new(scenario.gravity_constant),
                planet,
                Some(raider),
            );
        }
    }

    // Raiders chip the ship's hull; planets just bounce it
    for &raider in &raiders {
        scene.add_collision_watcher(ship, raider, HullDamage);
    }
    for &planet in &planets {
        scene.add_collision_watcher(ship, planet, ElasticBounce);
    }

    Ok(World {
        scene,
        ship,
        home_planet,
        raiders,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1);
    let scenario = Scenario::load(path.as_deref());
    let mut rng = Pcg32::seed_from_u64(scenario.seed);
    log::info!(
        "Skirmish starting: seed {}, {} planets, {} raiders",
        scenario.seed,
        scenario.planet_count,
        scenario.raider_count
    );

    let mut world = build_world(&scenario, &mut rng)?;

    // Fixed-timestep accumulator: frame surplus carries over to the next
    // frame instead of being discarded, with catch-up capped per frame.
    let mut accumulator = 0.0f32;
    let mut elapsed = 0.0f32;
    let mut next_report = 0.0f32;

    'frames: while elapsed < scenario.duration {
        // Synthetic frame pacing with jitter, ~60 fps
        let frame = rng.random_range(0.014..0.020);
        accumulator += frame;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            world.scene.tick(SIM_DT)?;
            accumulator -= SIM_DT;
            elapsed += SIM_DT;
            substeps += 1;

            if world.scene.is_removed(world.ship) {
                log::info!("Ship destroyed at t={elapsed:.2}s - game over");
                break 'frames;
            }
            let ship = world.scene.body(world.ship).expect("ship is live");
            let home = world.scene.body(world.home_planet).expect("home planet is immortal");
            if ship.distance_to(home) < 30.0 {
                log::info!("Ship reached the safe harbor at t={elapsed:.2}s - victory");
                break 'frames;
            }
        }

        if elapsed >= next_report {
            if let Some(ship) = world.scene.body(world.ship) {
                let health = ship.info().map_or(0, |hull| hull.health);
                log::info!(
                    "t={elapsed:5.2}s ship at ({:7.1},{:7.1}) speed {:6.1} hull {}",
                    ship.centroid().x,
                    ship.centroid().y,
                    ship.velocity().length(),
                    health,
                );
            }
            next_report += 1.0;
        }
    }

    let raiders_left = world
        .raiders
        .iter()
        .filter(|&&id| !world.scene.is_removed(id))
        .count();
    log::info!(
        "Done after {elapsed:.2}s: {} bodies alive, {} raiders left",
        world.scene.body_count(),
        raiders_left
    );
    Ok(())
}
