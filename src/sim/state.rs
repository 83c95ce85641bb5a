//! Game state and core simulation types

use glam::Vec3;
use rapier3d::prelude::RigidBodyHandle;

use super::arena::Arena;
use super::trail::TrailRaster;
use crate::assets::RoverDescriptor;
use crate::consts::*;
use crate::scene::{CarModel, CrownMarker, FollowCamera};
use crate::settings::QualityPreset;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for start input
    Title,
    /// Assets and physics still coming up
    Loading,
    /// Active gameplay (terminal until the session ends)
    Playing,
}

/// Which player a car belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarId {
    One,
    Two,
}

impl CarId {
    pub fn index(self) -> usize {
        match self {
            CarId::One => 0,
            CarId::Two => 1,
        }
    }

    pub fn opponent(self) -> CarId {
        match self {
            CarId::One => CarId::Two,
            CarId::Two => CarId::One,
        }
    }

    pub fn from_index(index: usize) -> CarId {
        if index == 0 { CarId::One } else { CarId::Two }
    }
}

/// One player's rover: the visual model, its exclusively-owned physics body,
/// score, and the per-car control state the vehicle controller persists
/// across ticks.
#[derive(Debug)]
pub struct Car {
    pub id: CarId,
    pub model: CarModel,
    pub body: RigidBodyHandle,
    pub spawn: Vec3,
    pub score: u32,
    /// Edge-trigger latch: true from the tick the car drops below the fall
    /// threshold until it is back above it
    pub has_fallen: bool,
    /// Ticks a drive key has been held (decays when released)
    pub accel_timer: f32,
    /// Exponentially smoothed steering value in [-1, 1]
    pub steering_smooth: f32,
    /// Horizontal speed cache for the HUD (m/s)
    pub speed: f32,
}

impl Car {
    pub fn new(id: CarId, model: CarModel, body: RigidBodyHandle, spawn: Vec3) -> Self {
        Self {
            id,
            model,
            body,
            spawn,
            score: 0,
            has_fallen: false,
            accel_timer: 0.0,
            steering_smooth: 0.0,
            speed: 0.0,
        }
    }
}

/// Complete session state advanced by the orchestrator
pub struct GameState {
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub arena: Arena,
    /// Car slots stay empty until the matching model load resolves
    pub cars: [Option<Car>; 2],
    pub cameras: [FollowCamera; 2],
    pub crown: CrownMarker,
    pub trail: TrailRaster,
    /// Set by the host once both model loads have resolved (ready or failed)
    pub assets_resolved: bool,
}

impl GameState {
    pub fn new(seed: u64, quality: QualityPreset) -> Self {
        let arena = Arena::new(seed, quality.prop_budget());
        let cameras = [
            FollowCamera::new(arena.spawn_points[0]),
            FollowCamera::new(arena.spawn_points[1]),
        ];
        Self {
            phase: GamePhase::Title,
            time_ticks: 0,
            arena,
            cars: [None, None],
            cameras,
            crown: CrownMarker::default(),
            trail: TrailRaster::new(quality.trail_resolution()),
            assets_resolved: false,
        }
    }

    /// Create a car once its model has loaded: spawn the physics body and
    /// drop the visual model at the spawn point.
    pub fn insert_car(
        &mut self,
        id: CarId,
        descriptor: &RoverDescriptor,
        physics: &mut crate::physics::PhysicsWorld,
    ) {
        let index = id.index();
        let spawn = self.arena.spawn_points[index];
        let body = physics.add_car_body(spawn, CAR_MASS, Vec3::from(CAR_HALF_EXTENTS));
        let model = descriptor.instantiate(spawn);
        log::info!("car {:?} ready ({})", id, model.name);
        self.cars[index] = Some(Car::new(id, model, body, spawn));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{BuiltinRovers, ModelSource};
    use crate::physics::PhysicsWorld;

    #[test]
    fn test_car_id_opponent() {
        assert_eq!(CarId::One.opponent(), CarId::Two);
        assert_eq!(CarId::Two.opponent(), CarId::One);
        assert_eq!(CarId::from_index(1), CarId::Two);
    }

    #[test]
    fn test_new_state_starts_on_title() {
        let state = GameState::new(7, QualityPreset::Low);
        assert_eq!(state.phase, GamePhase::Title);
        assert!(state.cars[0].is_none() && state.cars[1].is_none());
        assert!(!state.crown.visible);
    }

    #[test]
    fn test_insert_car_spawns_body_at_spawn_point() {
        let mut state = GameState::new(7, QualityPreset::Low);
        let mut physics = PhysicsWorld::new();
        let descriptor = BuiltinRovers.load("rover_blue").unwrap();

        state.insert_car(CarId::One, &descriptor, &mut physics);

        let car = state.cars[0].as_ref().expect("car slot filled");
        let (pos, _) = physics.transform(car.body).expect("body exists");
        assert!((pos - state.arena.spawn_points[0]).length() < 1e-5);
        assert_eq!(car.score, 0);
        assert!(!car.has_fallen);
    }
}
