//! Fixed-step sequencer
//!
//! One call to [`tick`] advances the whole game by a single fixed step in a
//! strict order: controls, physics, visual sync, conveyor boosts, fall
//! resolution, trail painting, crown update. The renderer runs zero or more
//! display frames in between and never mutates any of this.

use crate::consts::*;
use crate::input::CarInput;
use crate::physics::PhysicsWorld;

use super::arena::{resolve_falls, update_crown};
use super::state::{GamePhase, GameState};
use super::vehicle::{apply_controls, sync_visuals};

/// Everything sampled from the outside world for one step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub player1: CarInput,
    pub player2: CarInput,
    /// Start control pressed this step (title screen advance)
    pub start: bool,
}

/// Advance the simulation by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput, physics: &mut PhysicsWorld, dt: f32) {
    match state.phase {
        GamePhase::Title => {
            if input.start {
                state.phase = GamePhase::Loading;
                log::info!("match starting, loading rovers");
            }
        }
        GamePhase::Loading => {
            // The host flips this once every model load has resolved,
            // successfully or not
            if state.assets_resolved {
                state.phase = GamePhase::Playing;
                log::info!("assets resolved, entering play");
            }
        }
        GamePhase::Playing => playing_tick(state, input, physics, dt),
    }
}

fn playing_tick(state: &mut GameState, input: &TickInput, physics: &mut PhysicsWorld, dt: f32) {
    state.time_ticks += 1;
    let inputs = [input.player1, input.player2];

    for (i, slot) in state.cars.iter_mut().enumerate() {
        if let Some(car) = slot {
            apply_controls(car, inputs[i], physics);
        }
    }

    for car in state.cars.iter().flatten() {
        state.arena.apply_conveyor_boosts(car.body, physics);
    }

    physics.step(dt);

    for (i, slot) in state.cars.iter_mut().enumerate() {
        if let Some(car) = slot {
            sync_visuals(car, inputs[i], physics, &mut state.cameras[i]);
        }
    }

    resolve_falls(&state.arena, &mut state.cars, physics);

    // Trail painting runs on a reduced cadence; the fade pace is tuned to it
    if state.time_ticks % TRAIL_INTERVAL == 0 {
        state.trail.fade();
        for car in state.cars.iter().flatten() {
            for wheel in &car.model.wheels {
                let pos = wheel.world_position(&car.model.transform);
                state.trail.paint_wheel(pos, state.arena.radius);
            }
        }
    }

    update_crown(&state.cars, &mut state.crown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{BuiltinRovers, ModelSource};
    use crate::settings::QualityPreset;
    use crate::sim::state::CarId;
    use glam::Vec3;

    fn setup() -> (GameState, PhysicsWorld) {
        let mut physics = PhysicsWorld::new();
        let mut state = GameState::new(7, QualityPreset::Low);
        state.arena.register_colliders(&mut physics);
        let blue = BuiltinRovers.load("rover_blue").unwrap();
        let red = BuiltinRovers.load("rover_red").unwrap();
        state.insert_car(CarId::One, &blue, &mut physics);
        state.insert_car(CarId::Two, &red, &mut physics);
        (state, physics)
    }

    fn start_playing(state: &mut GameState, physics: &mut PhysicsWorld) {
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(state, &start, physics, SIM_DT);
        state.assets_resolved = true;
        tick(state, &TickInput::default(), physics, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_phase_advances_title_loading_playing() {
        let (mut state, mut physics) = setup();
        assert_eq!(state.phase, GamePhase::Title);

        // Nothing happens without the start control
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert_eq!(state.phase, GamePhase::Title);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, &mut physics, SIM_DT);
        assert_eq!(state.phase, GamePhase::Loading);

        // Loading holds until the host reports the loads resolved
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert_eq!(state.phase, GamePhase::Loading);

        state.assets_resolved = true;
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_sim_time_only_advances_in_play() {
        let (mut state, mut physics) = setup();
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert_eq!(state.time_ticks, 0);

        start_playing(&mut state, &mut physics);
        let before = state.time_ticks;
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert_eq!(state.time_ticks, before + 1);
    }

    #[test]
    fn test_empty_car_slots_do_not_panic() {
        let mut physics = PhysicsWorld::new();
        let mut state = GameState::new(7, QualityPreset::Low);
        state.arena.register_colliders(&mut physics);
        start_playing(&mut state, &mut physics);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        }
    }

    #[test]
    fn test_fall_scores_through_full_tick() {
        let (mut state, mut physics) = setup();
        start_playing(&mut state, &mut physics);

        let body = state.cars[0].as_ref().unwrap().body;
        physics.set_translation(
            body,
            Vec3::new(state.arena.radius + 20.0, FALL_THRESHOLD_Y - 5.0, 0.0),
        );
        physics.set_linvel(body, Vec3::new(0.0, -10.0, 0.0));
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);

        assert_eq!(state.cars[1].as_ref().unwrap().score, 1);
        let (pos, _) = physics.transform(body).unwrap();
        assert!((pos - state.cars[0].as_ref().unwrap().spawn).length() < 1.0);
    }

    #[test]
    fn test_crown_follows_score_through_tick() {
        let (mut state, mut physics) = setup();
        start_playing(&mut state, &mut physics);
        assert!(!state.crown.visible);

        state.cars[1].as_mut().unwrap().score = 2;
        tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
        assert!(state.crown.visible);
        let leader_pos = state.cars[1].as_ref().unwrap().model.transform.translation;
        assert!(state.crown.transform.translation.y > leader_pos.y);
    }

    #[test]
    fn test_trail_gets_painted_while_driving() {
        let (mut state, mut physics) = setup();
        start_playing(&mut state, &mut physics);

        let forward = TickInput {
            player1: CarInput {
                forward: true,
                ..Default::default()
            },
            ..Default::default()
        };
        // Snapshot the raster, drive for two seconds, expect it changed
        let before: Vec<_> = (0..state.trail.size())
            .map(|x| state.trail.pixel(x, state.trail.size() / 2))
            .collect();
        for _ in 0..120 {
            tick(&mut state, &forward, &mut physics, SIM_DT);
        }
        let after: Vec<_> = (0..state.trail.size())
            .map(|x| state.trail.pixel(x, state.trail.size() / 2))
            .collect();
        assert_ne!(before, after);
    }
}
