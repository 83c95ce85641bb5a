//! Async rover model loading
//!
//! Models load fire-and-forget on a background thread; the game loop polls
//! the handle each tick instead of blocking. A failed load is logged once and
//! the handle stays failed forever - that car simply never appears.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

use glam::Vec3;

use crate::scene::{CarModel, Transform, WheelNode, WheelSlot};

/// Error type for model loading
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetError {
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("model {0} is missing wheel sub-object {1:?}")]
    MissingWheel(String, WheelSlot),

    #[error("loader backend error: {0}")]
    Backend(String),
}

/// Geometry-free description of a rover model as the loader reports it:
/// just the named wheel sub-objects the sim animates.
#[derive(Debug, Clone)]
pub struct RoverDescriptor {
    pub name: String,
    /// (slot, chassis-local offset) for each wheel sub-mesh
    pub wheels: Vec<(WheelSlot, Vec3)>,
}

impl RoverDescriptor {
    /// Instantiate the scene-side model at a spawn transform
    pub fn instantiate(&self, spawn: Vec3) -> CarModel {
        CarModel {
            name: self.name.clone(),
            transform: Transform {
                translation: spawn,
                ..Default::default()
            },
            wheels: self
                .wheels
                .iter()
                .map(|&(slot, offset)| WheelNode {
                    slot,
                    offset,
                    roll: 0.0,
                    pivot_yaw: 0.0,
                })
                .collect(),
            score_label: "0".into(),
        }
    }
}

/// Where a background load currently stands
#[derive(Debug)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed,
}

impl<T> LoadState<T> {
    /// Load finished, successfully or not
    pub fn resolved(&self) -> bool {
        !matches!(self, LoadState::Pending)
    }
}

/// Pollable handle to a background model load
pub struct LoadHandle<T> {
    rx: Receiver<Result<T, AssetError>>,
    state: LoadState<T>,
    name: String,
}

impl<T> LoadHandle<T> {
    /// Drain the channel if the load finished; cheap to call every tick
    pub fn poll(&mut self) -> &LoadState<T> {
        if matches!(self.state, LoadState::Pending) {
            match self.rx.try_recv() {
                Ok(Ok(value)) => {
                    log::info!("model '{}' loaded", self.name);
                    self.state = LoadState::Ready(value);
                }
                Ok(Err(err)) => {
                    log::error!("model '{}' failed to load: {err}", self.name);
                    self.state = LoadState::Failed;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::error!("model '{}' loader dropped without a result", self.name);
                    self.state = LoadState::Failed;
                }
            }
        }
        &self.state
    }

    /// Consume a ready value, leaving the handle failed-terminal
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, LoadState::Failed) {
            LoadState::Ready(value) => Some(value),
            other => {
                self.state = other;
                None
            }
        }
    }
}

/// Backend that resolves a model name to its descriptor. The real engine
/// parses GLB files here; tests and the headless build use [`BuiltinRovers`].
pub trait ModelSource: Send + Sync {
    fn load(&self, name: &str) -> Result<RoverDescriptor, AssetError>;
}

/// Kick off a background load of a named model
pub fn spawn_load(source: Arc<dyn ModelSource>, name: &str) -> LoadHandle<RoverDescriptor> {
    let (tx, rx) = channel();
    let name_owned = name.to_string();
    let thread_name = name_owned.clone();
    thread::Builder::new()
        .name(format!("load-{thread_name}"))
        .spawn(move || {
            let _ = tx.send(source.load(&thread_name));
        })
        .ok();
    LoadHandle {
        rx,
        state: LoadState::Pending,
        name: name_owned,
    }
}

/// Built-in descriptors for the two rover variants, standing in for the GLB
/// wheel-node extraction when running headless.
pub struct BuiltinRovers;

impl BuiltinRovers {
    fn wheel_layout() -> Vec<(WheelSlot, Vec3)> {
        vec![
            (WheelSlot::FrontLeft, Vec3::new(-0.9, -0.3, 1.4)),
            (WheelSlot::FrontRight, Vec3::new(0.9, -0.3, 1.4)),
            (WheelSlot::RearLeft, Vec3::new(-0.9, -0.3, -1.4)),
            (WheelSlot::RearRight, Vec3::new(0.9, -0.3, -1.4)),
        ]
    }
}

impl ModelSource for BuiltinRovers {
    fn load(&self, name: &str) -> Result<RoverDescriptor, AssetError> {
        match name {
            "rover_blue" | "rover_red" => Ok(RoverDescriptor {
                name: name.to_string(),
                wheels: Self::wheel_layout(),
            }),
            other => Err(AssetError::UnknownModel(other.to_string())),
        }
    }
}
