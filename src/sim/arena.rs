//! Arena interaction rules
//!
//! The static arena (circular platform on a desert tower, four conveyor
//! belts) plus the per-tick rules that live on top of it: conveyor boosts,
//! fall detection and scoring, and the crown above the current leader.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rapier3d::prelude::RigidBodyHandle;

use super::state::Car;
use crate::consts::*;
use crate::physics::PhysicsWorld;
use crate::scene::CrownMarker;

/// A conveyor belt slab on the platform. `boost_dir` is precomputed at
/// construction: the unit vector the belt flings cars along (radially
/// outward in the stock layout).
#[derive(Debug, Clone)]
pub struct ConveyorBelt {
    pub position: Vec3,
    pub yaw: f32,
    pub boost_dir: Vec3,
    pub half_length: f32,
    pub half_width: f32,
}

impl ConveyorBelt {
    /// Transform a world position into the belt's local frame
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        Quat::from_rotation_y(-self.yaw) * (world - self.position)
    }

    /// Is this world position inside the belt footprint (with the vertical
    /// tolerance band)?
    pub fn contains(&self, world: Vec3) -> bool {
        let local = self.to_local(world);
        local.x.abs() <= self.half_length
            && local.z.abs() <= self.half_width
            && local.y.abs() <= BELT_VERTICAL_TOLERANCE
    }
}

/// Decorative desert prop kinds scattered around the tower base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Dune,
    Cactus,
    Rock,
    Boulder,
}

/// One placed prop instance for the renderer
#[derive(Debug, Clone)]
pub struct PropInstance {
    pub kind: PropKind,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
}

/// Static arena geometry; immutable after construction
pub struct Arena {
    pub radius: f32,
    pub fall_threshold: f32,
    pub belts: Vec<ConveyorBelt>,
    pub spawn_points: [Vec3; 2],
    pub props: Vec<PropInstance>,
}

impl Arena {
    pub fn new(seed: u64, prop_budget: usize) -> Self {
        let radius = PLATFORM_RADIUS;

        // Four belts on the cardinal directions, each flinging outward
        let mut belts = Vec::with_capacity(BELT_COUNT);
        for i in 0..BELT_COUNT {
            let angle = i as f32 * TAU / BELT_COUNT as f32;
            let r = radius * BELT_RADIUS_FRAC;
            let outward = Vec3::new(angle.cos(), 0.0, angle.sin());
            belts.push(ConveyorBelt {
                position: Vec3::new(outward.x * r, BELT_Y, outward.z * r),
                yaw: -angle,
                boost_dir: outward,
                half_length: BELT_LENGTH / 2.0,
                half_width: BELT_WIDTH / 2.0,
            });
        }

        Self {
            radius,
            fall_threshold: FALL_THRESHOLD_Y,
            belts,
            spawn_points: [Vec3::new(0.0, 1.1, 0.0), Vec3::new(10.0, 1.1, 0.0)],
            props: scatter_props(seed, prop_budget),
        }
    }

    /// Register the static collision geometry: the tower under the platform,
    /// the belt slabs, and the desert floor far below.
    pub fn register_colliders(&self, physics: &mut PhysicsWorld) {
        physics.add_static_cylinder(
            Vec3::new(0.0, PLATFORM_TOP_Y - TOWER_HEIGHT / 2.0, 0.0),
            TOWER_HEIGHT / 2.0,
            self.radius + 1.0,
            1.0,
        );

        for belt in &self.belts {
            physics.add_static_cuboid(
                belt.position,
                belt.yaw,
                Vec3::new(belt.half_length, BELT_HEIGHT / 2.0, belt.half_width),
            );
        }

        physics.add_static_cuboid(
            Vec3::new(0.0, DESERT_FLOOR_Y - 1.0, 0.0),
            0.0,
            Vec3::new(2500.0, 1.0, 2500.0),
        );
        log::info!("arena colliders registered ({} belts)", self.belts.len());
    }

    /// Every tick a car sits inside a belt footprint it picks up another
    /// impulse along the belt's boost direction - boosts accumulate.
    pub fn apply_conveyor_boosts(&self, body: RigidBodyHandle, physics: &mut PhysicsWorld) {
        let Some((pos, _)) = physics.transform(body) else {
            return;
        };
        for belt in &self.belts {
            if belt.contains(pos) {
                physics.apply_impulse(body, belt.boost_dir * BOOST_IMPULSE);
            }
        }
    }
}

/// Height-based fall detection with edge-triggered scoring.
///
/// The first tick a car drops below the fall threshold its opponent scores;
/// while it stays below, it is parked at its spawn point with velocity
/// zeroed. Rising back above the threshold re-arms the trigger.
pub fn resolve_falls(arena: &Arena, cars: &mut [Option<Car>; 2], physics: &mut PhysicsWorld) {
    for i in 0..2 {
        let (body, spawn, was_fallen) = match &cars[i] {
            Some(car) => (car.body, car.spawn, car.has_fallen),
            None => continue,
        };
        let Some((pos, _)) = physics.transform(body) else {
            continue;
        };

        if pos.y < arena.fall_threshold {
            if !was_fallen {
                if let Some(opponent) = cars[1 - i].as_mut() {
                    opponent.score += 1;
                    let score = opponent.score;
                    opponent.model.set_score_label(score);
                    log::info!("car {i} fell; opponent score now {score}");
                }
                if let Some(car) = cars[i].as_mut() {
                    car.has_fallen = true;
                }
            }
            physics.set_linvel(body, Vec3::ZERO);
            physics.set_angvel(body, Vec3::ZERO);
            physics.set_translation(body, spawn);
        } else if was_fallen {
            if let Some(car) = cars[i].as_mut() {
                car.has_fallen = false;
            }
        }
    }
}

/// Which car strictly leads on score, if any
pub fn leader(cars: &[Option<Car>; 2]) -> Option<usize> {
    let score = |slot: &Option<Car>| slot.as_ref().map_or(0, |c| c.score);
    let (a, b) = (score(&cars[0]), score(&cars[1]));
    match a.cmp(&b) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => None,
    }
}

/// Attach the crown above the leading car, or hide it on a tie
pub fn update_crown(cars: &[Option<Car>; 2], crown: &mut CrownMarker) {
    match leader(cars).and_then(|i| cars[i].as_ref()) {
        Some(car) => crown.attach_above(&car.model.transform),
        None => crown.hide(),
    }
}

/// Deterministic desert decor scatter around the tower base (dunes, cacti,
/// rocks, boulders). Placement keeps a clear ring around the tower itself.
fn scatter_props(seed: u64, budget: usize) -> Vec<PropInstance> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut props = Vec::with_capacity(budget);

    // Roughly 25% dunes, 40% cacti, 20% rocks, 15% boulders
    let kinds = [
        (PropKind::Dune, 0.25, 0.7..1.9, DESERT_FLOOR_Y + 1.0),
        (PropKind::Cactus, 0.40, 0.5..2.0, DESERT_FLOOR_Y - 2.0),
        (PropKind::Rock, 0.20, 3.0..8.0, DESERT_FLOOR_Y),
        (PropKind::Boulder, 0.15, 10.0..30.0, DESERT_FLOOR_Y),
    ];

    for (kind, share, scale_range, y) in kinds {
        let count = (budget as f32 * share) as usize;
        let mut placed = 0;
        while placed < count {
            let x = rng.random_range(-600.0..600.0f32);
            let z = rng.random_range(-600.0..600.0f32);
            // Keep the tower's immediate surroundings clear
            if (x * x + z * z).sqrt() < PLATFORM_RADIUS + 10.0 {
                continue;
            }
            props.push(PropInstance {
                kind,
                position: Vec3::new(x, y, z),
                yaw: rng.random_range(0.0..TAU),
                scale: rng.random_range(scale_range.clone()),
            });
            placed += 1;
        }
    }
    props
}
