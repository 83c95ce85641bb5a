//! Dune Duel - a split-screen desert tower arena game
//!
//! Two rovers drive around a circular platform on top of a desert tower.
//! Conveyor belts fling you outward, the edge is unguarded, and falling off
//! scores a point for the other player.
//!
//! Core modules:
//! - `sim`: Gameplay logic (vehicle control, arena rules, fixed-step tick)
//! - `physics`: Rigid-body world wrapper (rapier3d boundary)
//! - `scene`: Black-box scene-graph data the renderer consumes
//! - `assets`: Async rover model loading
//! - `input`: Keyboard state and per-player control schemes
//! - `hud`: Text readouts (position, speed, score)

pub mod assets;
pub mod hud;
pub mod input;
pub mod physics;
pub mod scene;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::{Quat, Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Sub-iterations each fixed physics step is divided into
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena dimensions
    pub const PLATFORM_RADIUS: f32 = 35.0;
    pub const PLATFORM_TOP_Y: f32 = 0.5;
    pub const TOWER_HEIGHT: f32 = 80.0;
    /// Desert floor far below the platform edge
    pub const DESERT_FLOOR_Y: f32 = -80.0;

    /// Car body
    pub const CAR_MASS: f32 = 120.0;
    pub const CAR_HALF_EXTENTS: [f32; 3] = [1.0, 0.5, 2.0];
    pub const WHEEL_RADIUS: f32 = 0.4;

    /// Drive model
    pub const MAX_DRIVE_FORCE: f32 = 3000.0;
    /// Exponent of the throttle ramp: accel = max * (1 - e^(-RATE * held_secs))
    pub const ACCEL_RAMP_RATE: f32 = 2.5;
    /// Per-tick decay of the accel timer when no drive key is held
    pub const ACCEL_TIMER_DECAY: f32 = 0.9;
    /// Horizontal speed above which drive force is suppressed (m/s)
    pub const MAX_SPEED: f32 = 40.0;
    /// Lateral pseudo-friction gain (N per m/s of sideways velocity)
    pub const LATERAL_GRIP: f32 = 160.0;

    /// Steering
    pub const STEER_TORQUE: f32 = 420.0;
    pub const STEER_LERP: f32 = 0.15;
    pub const MAX_ANGULAR_SPEED: f32 = 3.0;
    /// Visual front-pivot deflection (radians), cosmetic only
    pub const MAX_STEER_ANGLE: f32 = 0.4;

    /// Conveyor belts
    pub const BELT_COUNT: usize = 4;
    pub const BELT_LENGTH: f32 = 10.0;
    pub const BELT_WIDTH: f32 = 5.0;
    pub const BELT_HEIGHT: f32 = 0.2;
    /// Belt centers sit at this fraction of the platform radius
    pub const BELT_RADIUS_FRAC: f32 = 0.65;
    pub const BELT_Y: f32 = 0.6;
    /// Vertical window around the belt surface that still counts as "on it"
    pub const BELT_VERTICAL_TOLERANCE: f32 = 1.5;
    /// Impulse magnitude applied every tick a car stays on a belt
    pub const BOOST_IMPULSE: f32 = 40.0;

    /// Fall detection / scoring
    pub const FALL_THRESHOLD_Y: f32 = -10.0;

    /// Trail raster
    pub const TRAIL_SIZE: usize = 512;
    pub const TRAIL_STAMP_RADIUS: i32 = 5;
    /// Per-update fade of the trail raster toward the base sand tile
    pub const TRAIL_FADE_ALPHA: f32 = 0.02;
    /// Trail update cadence (every Nth tick)
    pub const TRAIL_INTERVAL: u64 = 2;
    /// Wheels only paint while within this band of the platform surface
    pub const WHEEL_GROUND_BAND: f32 = 3.0;

    /// Chase camera
    pub const CAM_DISTANCE: f32 = 10.0;
    pub const CAM_HEIGHT: f32 = 5.0;
    pub const CAM_REVERSE_DISTANCE: f32 = 6.0;
    pub const CAM_REVERSE_HEIGHT: f32 = 7.0;
    pub const CAM_OFFSET_LERP: f32 = 0.1;
    pub const CAM_POS_LERP: f32 = 0.1;
    /// Look-target drop while reversing (tilts the view down a touch)
    pub const CAM_REVERSE_LOOK_DROP: f32 = 1.0;

    /// Crown hovers this far above the leader's roof
    pub const CROWN_HEIGHT: f32 = 2.5;
}

/// Project a world XZ position into the platform's canonical UV space.
///
/// The platform floor texture spans `[-radius, radius]` on both axes, so the
/// center maps to (0.5, 0.5) and the +X rim to (1.0, 0.5).
#[inline]
pub fn world_to_uv(x: f32, z: f32, radius: f32) -> Vec2 {
    Vec2::new(x / (radius * 2.0) + 0.5, z / (radius * 2.0) + 0.5)
}

/// Body-local forward axis (+Z rotated into world space)
#[inline]
pub fn forward_axis(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Body-local right axis (+X rotated into world space)
#[inline]
pub fn right_axis(rotation: Quat) -> Vec3 {
    rotation * Vec3::X
}

/// Horizontal (XZ-plane) component of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
