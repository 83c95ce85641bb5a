//! Dune Duel entry point
//!
//! Runs a headless scripted match: loads the rover models in the background,
//! drives both cars through a short bout, and refreshes the HUD every tick.
//! The real renderer host drives the same [`tick`] loop from its frame
//! callback.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;

use dune_duel::assets::{spawn_load, BuiltinRovers, ModelSource};
use dune_duel::consts::*;
use dune_duel::hud::{PlayerHud, TextSink};
use dune_duel::input::CarInput;
use dune_duel::physics::PhysicsWorld;
use dune_duel::scene::split_viewports;
use dune_duel::sim::{tick, CarId, GamePhase, GameState, TickInput};
use dune_duel::Settings;

/// Sink that logs every HUD text change
struct LogSink(&'static str, log::Level);

impl TextSink for LogSink {
    fn set_text(&mut self, text: &str) {
        log::log!(self.1, "{}: {}", self.0, text);
    }
}

fn make_hud(player: usize) -> PlayerHud {
    let labels: [&'static str; 6] = [
        "p1 coords", "p1 speed", "p1 score", "p2 coords", "p2 speed", "p2 score",
    ];
    let base = player * 3;
    // Coords and speed change nearly every tick; only scores are loud
    PlayerHud::new(
        Box::new(LogSink(labels[base], log::Level::Debug)),
        Box::new(LogSink(labels[base + 1], log::Level::Debug)),
        Box::new(LogSink(labels[base + 2], log::Level::Info)),
    )
}

/// Scripted controls: both players drive forward, player one weaves
fn scripted_input(ticks: u64) -> TickInput {
    let weave_left = (ticks / 90) % 2 == 0;
    TickInput {
        player1: CarInput {
            forward: true,
            left: weave_left,
            right: !weave_left,
            ..Default::default()
        },
        player2: CarInput {
            forward: ticks > 60,
            ..Default::default()
        },
        start: false,
    }
}

fn main() {
    env_logger::init();
    log::info!("Dune Duel (headless) starting");

    let settings = Settings::load(Path::new("settings.json"));
    let [left, right] = split_viewports(1280, 720);
    log::info!(
        "quality {}, viewports {}x{} + {}x{}",
        settings.quality.as_str(),
        left.width,
        left.height,
        right.width,
        right.height
    );

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1);
    let mut physics = PhysicsWorld::new();
    let mut state = GameState::new(seed, settings.quality);
    state.arena.register_colliders(&mut physics);

    // Title -> Loading on the start control
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        &mut physics,
        SIM_DT,
    );

    // Background model loads; car slots fill as each resolves
    let source: Arc<dyn ModelSource> = Arc::new(BuiltinRovers);
    let mut loads = [
        Some(spawn_load(source.clone(), "rover_blue")),
        Some(spawn_load(source, "rover_red")),
    ];

    let deadline = Instant::now() + Duration::from_secs(5);
    while loads.iter().any(|l| l.is_some()) && Instant::now() < deadline {
        for (i, slot) in loads.iter_mut().enumerate() {
            let Some(handle) = slot.as_mut() else {
                continue;
            };
            if handle.poll().resolved() {
                match handle.take() {
                    Some(descriptor) => {
                        state.insert_car(CarId::from_index(i), &descriptor, &mut physics)
                    }
                    None => log::warn!("model load {i} failed, slot stays empty"),
                }
                *slot = None;
            }
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    state.assets_resolved = true;
    tick(&mut state, &TickInput::default(), &mut physics, SIM_DT);
    assert_eq!(state.phase, GamePhase::Playing);

    let mut huds = [make_hud(0), make_hud(1)];

    // Fifteen simulated seconds at the fixed step
    let wall_start = Instant::now();
    for _ in 0..(15 * 60) {
        let input = scripted_input(state.time_ticks);
        tick(&mut state, &input, &mut physics, SIM_DT);

        for (i, slot) in state.cars.iter().enumerate() {
            if let Some(car) = slot {
                huds[i].update(car.model.transform.translation, car.speed, car.score);
            }
        }
    }
    if settings.show_fps {
        let elapsed = wall_start.elapsed().as_secs_f64().max(1e-9);
        log::info!(
            "simulated {} ticks in {:.0} ms ({:.0} ticks/s)",
            state.time_ticks,
            elapsed * 1000.0,
            state.time_ticks as f64 / elapsed
        );
    }

    for slot in state.cars.iter().flatten() {
        let pos = slot.model.transform.translation;
        log::info!(
            "{:?} finished at ({:.1}, {:.1}, {:.1}) score {} dist from center {:.1}",
            slot.id,
            pos.x,
            pos.y,
            pos.z,
            slot.score,
            Vec3::new(pos.x, 0.0, pos.z).length()
        );
    }

    settings.save(Path::new("settings.json"));
    log::info!("Dune Duel done after {} ticks", state.time_ticks);
}
