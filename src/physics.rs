//! Rigid-body world wrapper
//!
//! Thin boundary around rapier3d. The sim never touches rapier types
//! directly: everything crosses this module as glam vectors/quaternions and
//! `RigidBodyHandle`s. Accessors return `Option` so callers can skip bodies
//! that do not exist yet (cars still loading).

use glam::{Quat, Vec3};
use nalgebra::UnitQuaternion;
use rapier3d::prelude::*;

use crate::consts::MAX_SUBSTEPS;

#[inline]
fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
fn rot_to_glam(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// The physics world: one instance per session, stepped only from the main
/// loop.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        log::info!("Physics world initialized");
        Self {
            gravity: vector![0.0, -9.82, 0.0],
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Static vertical cylinder (the tower the platform sits on)
    pub fn add_static_cylinder(
        &mut self,
        center: Vec3,
        half_height: f32,
        radius: f32,
        friction: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cylinder(half_height, radius)
            .translation(to_na(center))
            .friction(friction)
            .restitution(0.0)
            .build();
        self.colliders.insert(collider)
    }

    /// Static yawed box (conveyor belt slabs)
    pub fn add_static_cuboid(&mut self, center: Vec3, yaw: f32, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_na(center))
            .rotation(vector![0.0, yaw, 0.0])
            .friction(0.8)
            .build();
        self.colliders.insert(collider)
    }

    /// Dynamic car chassis. Rotation is restricted to yaw so steering torque
    /// is the only thing that turns the body.
    pub fn add_car_body(&mut self, spawn: Vec3, mass: f32, half_extents: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_na(spawn))
            .enabled_rotations(false, true, false)
            .linear_damping(0.05)
            .angular_damping(0.5)
            .build();
        let handle = self.bodies.insert(body);

        // Contact friction stays low: grip comes from the controller's
        // lateral pseudo-friction, not the collider pair
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .friction(0.1)
            .restitution(0.0)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Continuous force for the rest of this tick; cleared after `step`
    pub fn apply_force(&mut self, handle: RigidBodyHandle, force: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.add_force(to_na(force), true);
        }
    }

    /// Continuous torque for the rest of this tick; cleared after `step`
    pub fn apply_torque(&mut self, handle: RigidBodyHandle, torque: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.add_torque(to_na(torque), true);
        }
    }

    /// Instantaneous velocity change (conveyor boost)
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.apply_impulse(to_na(impulse), true);
        }
    }

    pub fn linvel(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| to_glam(b.linvel()))
    }

    pub fn set_linvel(&mut self, handle: RigidBodyHandle, vel: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(to_na(vel), true);
        }
    }

    pub fn angvel(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| to_glam(b.angvel()))
    }

    pub fn set_angvel(&mut self, handle: RigidBodyHandle, vel: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_angvel(to_na(vel), true);
        }
    }

    /// Authoritative world transform of a body
    pub fn transform(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(handle).map(|b| {
            let iso = b.position();
            (to_glam(&iso.translation.vector), rot_to_glam(&iso.rotation))
        })
    }

    pub fn set_translation(&mut self, handle: RigidBodyHandle, pos: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(to_na(pos), true);
        }
    }

    /// Advance the simulation by one fixed step and clear per-tick forces.
    /// The step runs as `MAX_SUBSTEPS` sub-iterations so fast contacts stay
    /// stable; forces accumulated before the call act over the whole step.
    pub fn step(&mut self, dt: f32) {
        let integration_parameters = IntegrationParameters {
            dt: dt / MAX_SUBSTEPS as f32,
            ..IntegrationParameters::default()
        };

        for _ in 0..MAX_SUBSTEPS {
            self.pipeline.step(
                &self.gravity,
                &integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
        }

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_car_settles_on_platform() {
        let mut world = PhysicsWorld::new();
        world.add_static_cylinder(
            Vec3::new(0.0, PLATFORM_TOP_Y - TOWER_HEIGHT / 2.0, 0.0),
            TOWER_HEIGHT / 2.0,
            PLATFORM_RADIUS + 1.0,
            1.0,
        );
        let car = world.add_car_body(
            Vec3::new(0.0, 2.0, 0.0),
            CAR_MASS,
            Vec3::from(CAR_HALF_EXTENTS),
        );

        for _ in 0..120 {
            world.step(SIM_DT);
        }

        let (pos, _) = world.transform(car).unwrap();
        // Settled on top of the platform, not fallen through
        assert!(pos.y > PLATFORM_TOP_Y, "car fell through platform: y={}", pos.y);
        assert!(pos.y < 2.5, "car floated away: y={}", pos.y);
    }

    #[test]
    fn test_impulse_changes_velocity() {
        let mut world = PhysicsWorld::new();
        let car = world.add_car_body(
            Vec3::new(0.0, 10.0, 0.0),
            CAR_MASS,
            Vec3::from(CAR_HALF_EXTENTS),
        );

        world.apply_impulse(car, Vec3::new(CAR_MASS * 5.0, 0.0, 0.0));
        let vel = world.linvel(car).unwrap();
        assert!((vel.x - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_transform_reports_yaw_rotation() {
        let mut world = PhysicsWorld::new();
        let car = world.add_car_body(
            Vec3::new(0.0, 10.0, 0.0),
            CAR_MASS,
            Vec3::from(CAR_HALF_EXTENTS),
        );

        // Spin at 1 rad/s for half a second of sim time
        world.set_angvel(car, Vec3::Y);
        for _ in 0..30 {
            world.step(SIM_DT);
        }

        let (_, rot) = world.transform(car).unwrap();
        let fwd = rot * Vec3::Z;
        // Rotation stays pure yaw, and the accumulated angle is a bit under
        // half a radian once angular damping is taken into account
        assert!(fwd.y.abs() < 1e-3, "rotation left the yaw plane: {fwd:?}");
        let yaw = fwd.x.atan2(fwd.z);
        assert!((0.3..0.5).contains(&yaw), "unexpected yaw {yaw}");
    }

    #[test]
    fn test_step_advances_one_full_timestep() {
        // Free fall for one second must produce ~g of velocity regardless of
        // how the step is divided internally
        let mut world = PhysicsWorld::new();
        let car = world.add_car_body(
            Vec3::new(0.0, 100.0, 0.0),
            CAR_MASS,
            Vec3::from(CAR_HALF_EXTENTS),
        );

        for _ in 0..60 {
            world.step(SIM_DT);
        }

        let vel = world.linvel(car).unwrap();
        assert!(
            (vel.y - (-9.82)).abs() < 0.3,
            "one second of free fall gave vy={}",
            vel.y
        );
    }

    #[test]
    fn test_missing_body_is_silent() {
        let mut world = PhysicsWorld::new();
        let car = world.add_car_body(Vec3::ZERO, CAR_MASS, Vec3::from(CAR_HALF_EXTENTS));
        world.bodies.remove(
            car,
            &mut world.islands,
            &mut world.colliders,
            &mut world.impulse_joints,
            &mut world.multibody_joints,
            true,
        );
        assert!(world.transform(car).is_none());
        // These must not panic
        world.apply_force(car, Vec3::X);
        world.apply_impulse(car, Vec3::X);
    }
}
