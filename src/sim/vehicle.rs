//! Per-car, per-tick vehicle controller
//!
//! Maps held keys to forces and torques on the car's rigid body, then (after
//! the physics step) mirrors the authoritative body transform back onto the
//! visual model, spins the wheels, and frames the chase camera.
//!
//! Every entry point is a silent no-op when the car's body is gone - cars
//! load asynchronously and this runs unconditionally every tick.

use glam::Vec3;

use super::state::Car;
use crate::consts::*;
use crate::input::CarInput;
use crate::physics::PhysicsWorld;
use crate::scene::{FollowCamera, Transform};
use crate::{forward_axis, horizontal, right_axis};

/// Drive force at a given accel-timer value: an exponential ramp that reaches
/// ~92% of max after one second of held input.
#[inline]
pub fn drive_force_magnitude(accel_timer: f32) -> f32 {
    let held_secs = accel_timer / 60.0;
    MAX_DRIVE_FORCE * (1.0 - (-ACCEL_RAMP_RATE * held_secs).exp())
}

/// Advance the accel timer: +1 per tick while a drive key is held, otherwise
/// multiplicative decay toward zero.
#[inline]
pub fn advance_accel_timer(timer: f32, held: bool) -> f32 {
    if held { timer + 1.0 } else { timer * ACCEL_TIMER_DECAY }
}

/// One smoothing step of the steering value toward its target
#[inline]
pub fn smooth_steering(current: f32, target: f32) -> f32 {
    current + (target - current) * STEER_LERP
}

/// Apply this tick's drive force, lateral friction, and steering torque.
/// Runs before the physics step.
pub fn apply_controls(car: &mut Car, input: CarInput, physics: &mut PhysicsWorld) {
    let Some((_, rotation)) = physics.transform(car.body) else {
        return;
    };
    let Some(vel) = physics.linvel(car.body) else {
        return;
    };

    let fwd = forward_axis(rotation);
    let forward_speed = vel.dot(fwd);
    let horizontal_speed = horizontal(vel).length();

    // Throttle ramp
    let sign = input.accel_sign();
    car.accel_timer = advance_accel_timer(car.accel_timer, sign != 0.0);

    if sign != 0.0 {
        // Suppress drive force at the speed cap, except when the request
        // opposes the current motion: braking out of top speed must work.
        let at_cap = horizontal_speed >= MAX_SPEED;
        let braking = sign * forward_speed < 0.0;
        if !at_cap || braking {
            let force = fwd * (sign * drive_force_magnitude(car.accel_timer));
            physics.apply_force(car.body, force);
        }
    }

    // Damped-skid lateral friction: cancel sideways velocity proportionally,
    // every tick, so the car grips instead of ice-skating.
    let right = right_axis(rotation);
    let lateral_speed = vel.dot(right);
    physics.apply_force(car.body, right * (-lateral_speed * LATERAL_GRIP));

    // Steering: invert the target while actually moving backward so reverse
    // turns feel consistent, then smooth and convert to yaw torque.
    let mut steer_target = input.steer_target();
    if forward_speed < 0.0 {
        steer_target = -steer_target;
    }
    car.steering_smooth = smooth_steering(car.steering_smooth, steer_target);
    physics.apply_torque(car.body, Vec3::Y * (car.steering_smooth * STEER_TORQUE));

    // Yaw rate clamp
    if let Some(av) = physics.angvel(car.body) {
        if av.y.abs() > MAX_ANGULAR_SPEED {
            physics.set_angvel(
                car.body,
                Vec3::new(av.x, av.y.clamp(-MAX_ANGULAR_SPEED, MAX_ANGULAR_SPEED), av.z),
            );
        }
    }
}

/// Pull the authoritative transform from the body onto the visual model,
/// animate wheels/pivots, and ease the chase camera. Runs after the step.
pub fn sync_visuals(
    car: &mut Car,
    input: CarInput,
    physics: &PhysicsWorld,
    camera: &mut FollowCamera,
) {
    let Some((position, rotation)) = physics.transform(car.body) else {
        return;
    };
    car.model.transform = Transform {
        translation: position,
        rotation,
    };

    let vel = physics.linvel(car.body).unwrap_or(Vec3::ZERO);
    let fwd = forward_axis(rotation);
    let forward_speed = vel.dot(fwd);
    car.speed = horizontal(vel).length();

    // Wheel roll from horizontal speed - a visual proxy, not contact-derived
    let direction = if forward_speed < 0.0 { -1.0 } else { 1.0 };
    let roll_delta = direction * car.speed * SIM_DT / WHEEL_RADIUS;
    car.model
        .animate_wheels(roll_delta, car.steering_smooth * MAX_STEER_ANGLE);

    // Chase camera: behind-and-above, higher and tighter while reversing
    let reversing = input.backward && forward_speed < 0.0;
    let local_offset = if reversing {
        Vec3::new(0.0, CAM_REVERSE_HEIGHT, -CAM_REVERSE_DISTANCE)
    } else {
        Vec3::new(0.0, CAM_HEIGHT, -CAM_DISTANCE)
    };
    let target_offset = rotation * local_offset;
    camera.offset = camera.offset.lerp(target_offset, CAM_OFFSET_LERP);
    camera.position = camera.position.lerp(position + camera.offset, CAM_POS_LERP);
    camera.look_at = if reversing {
        position - Vec3::Y * CAM_REVERSE_LOOK_DROP
    } else {
        position
    };
}
