//! Scene-graph data the renderer consumes
//!
//! The actual 3D engine (meshes, materials, shadows) is a black box; the sim
//! only writes plain transforms into these structs. The renderer is expected
//! to mirror them onto its own node hierarchy each frame.

use glam::{Quat, Vec3};

use crate::consts::*;

/// A world transform written by the sim, read by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Which corner of the chassis a wheel node occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSlot {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelSlot {
    pub fn is_front(self) -> bool {
        matches!(self, WheelSlot::FrontLeft | WheelSlot::FrontRight)
    }
}

/// A wheel sub-mesh: local offset from the chassis root plus its animation
/// state. Front wheels carry an extra steering-pivot yaw.
#[derive(Debug, Clone)]
pub struct WheelNode {
    pub slot: WheelSlot,
    /// Offset from the chassis root, chassis-local space
    pub offset: Vec3,
    /// Accumulated roll around the axle (radians)
    pub roll: f32,
    /// Cosmetic steering yaw, front wheels only
    pub pivot_yaw: f32,
}

impl WheelNode {
    /// World position of the wheel given the chassis transform
    pub fn world_position(&self, chassis: &Transform) -> Vec3 {
        chassis.translation + chassis.rotation * self.offset
    }
}

/// A loaded rover model: chassis root plus named wheel sub-objects and the
/// floating score label above the roof.
#[derive(Debug, Clone)]
pub struct CarModel {
    pub name: String,
    pub transform: Transform,
    pub wheels: Vec<WheelNode>,
    pub score_label: String,
}

impl CarModel {
    /// Spin every wheel around its axle and ease the front pivots toward the
    /// target steering deflection. Purely cosmetic.
    pub fn animate_wheels(&mut self, roll_delta: f32, steer_angle: f32) {
        for wheel in &mut self.wheels {
            wheel.roll -= roll_delta;
            if wheel.slot.is_front() {
                wheel.pivot_yaw += (steer_angle - wheel.pivot_yaw) * STEER_LERP;
            }
        }
    }

    pub fn set_score_label(&mut self, score: u32) {
        let text = score.to_string();
        if self.score_label != text {
            self.score_label = text;
        }
    }
}

/// Crown marker shown above whichever car leads on score
#[derive(Debug, Clone, Default)]
pub struct CrownMarker {
    pub visible: bool,
    pub transform: Transform,
}

impl CrownMarker {
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn attach_above(&mut self, chassis: &Transform) {
        self.visible = true;
        self.transform = Transform {
            translation: chassis.translation + Vec3::Y * CROWN_HEIGHT,
            rotation: chassis.rotation,
        };
    }
}

/// Per-player chase camera with two-stage exponential smoothing: the offset
/// eases toward its target, then the camera position eases toward car+offset.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Smoothed world-space offset from the car
    pub offset: Vec3,
}

impl FollowCamera {
    pub fn new(car_pos: Vec3) -> Self {
        let offset = Vec3::new(0.0, CAM_HEIGHT, -CAM_DISTANCE);
        Self {
            position: car_pos + offset,
            look_at: car_pos,
            offset,
        }
    }
}

/// An axis-aligned sub-rectangle of the canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Split the canvas into the two side-by-side player viewports
pub fn split_viewports(width: u32, height: u32) -> [Viewport; 2] {
    let half = width / 2;
    [
        Viewport {
            x: 0,
            y: 0,
            width: half,
            height,
        },
        Viewport {
            x: half,
            y: 0,
            width: width - half,
            height,
        },
    ]
}
