//! Physics Engine
//!
//! A small fixed-step rigid-body simulation behind the
//! [`RigidBody`](crate::component::RigidBody) component.
//!
//! # Stepping
//!
//! Every call to [`PhysicsEngine::update`] advances the world by exactly one
//! `time_step` (1/60 s by default), split into `substeps` equal substeps (10 by
//! default). There is no wall-clock accumulator: N updates always simulate
//! `N * time_step` seconds.
//!
//! # Storage
//!
//! Each registered body owns three native records: the body itself, its
//! motion state (pose) and its collision shape. They are created together in
//! [`add_rigid_body`](PhysicsEngine::add_rigid_body) and released together in
//! [`remove_rigid_body`](PhysicsEngine::remove_rigid_body).

pub mod shape;

use glam::Quat;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::component::ComponentKey;
use crate::math::Vector3f;
use crate::settings::PhysicsSettings;

pub use shape::{BoxShape, CollisionShape};

new_key_type! {
    pub struct BodyHandle;
    pub struct MotionStateHandle;
    pub struct ShapeHandle;
}

/// World-space pose of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub position: Vector3f,
    pub rotation: Quat,
}

/// Parameters for creating a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyDesc {
    pub shape: CollisionShape,
    /// Zero mass makes the body static.
    pub mass: f32,
    pub restitution: f32,
    pub position: Vector3f,
    pub rotation: Quat,
    pub linear_velocity: Vector3f,
}

#[derive(Debug)]
struct NativeBody {
    motion_state: MotionStateHandle,
    shape: ShapeHandle,
    inverse_mass: f32,
    restitution: f32,
    linear_velocity: Vector3f,
}

/// A static plane in world space, gathered once per substep.
struct ContactPlane {
    normal: Vector3f,
    offset: f32,
    restitution: f32,
}

pub struct PhysicsEngine {
    gravity: Vector3f,
    time_step: f64,
    substeps: u32,

    bodies: SlotMap<BodyHandle, NativeBody>,
    motion_states: SlotMap<MotionStateHandle, MotionState>,
    shapes: SlotMap<ShapeHandle, CollisionShape>,
    by_component: FxHashMap<ComponentKey, BodyHandle>,

    updates: u64,
    substeps_performed: u64,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(&PhysicsSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: &PhysicsSettings) -> Self {
        Self {
            gravity: settings.gravity,
            time_step: settings.time_step,
            substeps: settings.substeps.max(1),
            bodies: SlotMap::with_key(),
            motion_states: SlotMap::with_key(),
            shapes: SlotMap::with_key(),
            by_component: FxHashMap::default(),
            updates: 0,
            substeps_performed: 0,
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Creates the native body, motion state and shape for a component.
    ///
    /// A component registers at most once; registering again replaces the
    /// previous body.
    pub fn add_rigid_body(&mut self, key: ComponentKey, desc: RigidBodyDesc) -> BodyHandle {
        if self.by_component.contains_key(&key) {
            log::warn!("Rigid body {key:?} registered twice, replacing it");
            self.remove_rigid_body(key);
        }

        let motion_state = self.motion_states.insert(MotionState {
            position: desc.position,
            rotation: desc.rotation,
        });
        let shape = self.shapes.insert(desc.shape);
        let inverse_mass = if desc.mass > 0.0 { 1.0 / desc.mass } else { 0.0 };

        let handle = self.bodies.insert(NativeBody {
            motion_state,
            shape,
            inverse_mass,
            restitution: desc.restitution,
            linear_velocity: desc.linear_velocity,
        });
        self.by_component.insert(key, handle);
        log::debug!("Added rigid body {key:?} (mass {})", desc.mass);
        handle
    }

    /// Releases the body, its motion state and its shape.
    pub fn remove_rigid_body(&mut self, key: ComponentKey) -> bool {
        let Some(handle) = self.by_component.remove(&key) else {
            log::warn!("Tried to remove unregistered rigid body {key:?}");
            return false;
        };
        if let Some(body) = self.bodies.remove(handle) {
            self.motion_states.remove(body.motion_state);
            self.shapes.remove(body.shape);
        }
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn body_pose(&self, key: ComponentKey) -> Option<MotionState> {
        let body = self.bodies.get(*self.by_component.get(&key)?)?;
        self.motion_states.get(body.motion_state).copied()
    }

    #[must_use]
    pub fn linear_velocity(&self, key: ComponentKey) -> Option<Vector3f> {
        let body = self.bodies.get(*self.by_component.get(&key)?)?;
        Some(body.linear_velocity)
    }

    pub fn set_linear_velocity(&mut self, key: ComponentKey, velocity: Vector3f) -> bool {
        let Some(body) = self.by_component.get(&key).and_then(|&h| self.bodies.get_mut(h)) else {
            return false;
        };
        body.linear_velocity = velocity;
        true
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn motion_state_count(&self) -> usize {
        self.motion_states.len()
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn set_gravity(&mut self, gravity: Vector3f) {
        self.gravity = gravity;
    }

    #[must_use]
    pub fn gravity(&self) -> Vector3f {
        self.gravity
    }

    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    #[must_use]
    pub fn substeps(&self) -> u32 {
        self.substeps
    }

    /// Total simulated seconds, `updates * time_step`.
    #[must_use]
    pub fn simulated_time(&self) -> f64 {
        self.updates as f64 * self.time_step
    }

    /// Number of completed [`update`](Self::update) calls.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates
    }

    #[must_use]
    pub fn substeps_performed(&self) -> u64 {
        self.substeps_performed
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Advances the world by one fixed time step.
    pub fn update(&mut self) {
        let dt = (self.time_step / f64::from(self.substeps)) as f32;
        for _ in 0..self.substeps {
            self.substep(dt);
            self.substeps_performed += 1;
        }
        self.updates += 1;
    }

    fn substep(&mut self, dt: f32) {
        let planes = self.contact_planes();

        for body in self.bodies.values_mut() {
            if body.inverse_mass == 0.0 {
                continue;
            }
            let (Some(state), Some(shape)) =
                (self.motion_states.get_mut(body.motion_state), self.shapes.get(body.shape))
            else {
                continue;
            };

            body.linear_velocity += self.gravity * dt;
            state.position += body.linear_velocity * dt;

            for plane in &planes {
                let local_normal: Vector3f = (state.rotation.inverse() * glam::Vec3::from(plane.normal)).into();
                let extent = shape.support_extent(local_normal);
                let penetration = plane.normal.dot(state.position) - plane.offset - extent;
                if penetration >= 0.0 {
                    continue;
                }

                state.position -= plane.normal * penetration;
                let normal_speed = body.linear_velocity.dot(plane.normal);
                if normal_speed < 0.0 {
                    let restitution = body.restitution * plane.restitution;
                    body.linear_velocity -= plane.normal * ((1.0 + restitution) * normal_speed);
                }
            }
        }
    }

    fn contact_planes(&self) -> Vec<ContactPlane> {
        self.bodies
            .values()
            .filter(|body| body.inverse_mass == 0.0)
            .filter_map(|body| {
                let state = self.motion_states.get(body.motion_state)?;
                let CollisionShape::Plane { normal, offset } = *self.shapes.get(body.shape)? else {
                    return None;
                };
                let normal: Vector3f = (state.rotation * glam::Vec3::from(normal.normalize())).into();
                Some(ContactPlane {
                    normal,
                    offset: offset + normal.dot(state.position),
                    restitution: body.restitution,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<ComponentKey> {
        let mut map: SlotMap<ComponentKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn falling_body_gains_downward_speed() {
        let key = keys(1)[0];
        let mut engine = PhysicsEngine::new();
        engine.add_rigid_body(
            key,
            RigidBodyDesc {
                shape: CollisionShape::sphere(0.5),
                mass: 1.0,
                restitution: 0.0,
                position: Vector3f::new(0.0, 10.0, 0.0),
                rotation: Quat::IDENTITY,
                linear_velocity: Vector3f::zero(),
            },
        );

        engine.update();

        let velocity = engine.linear_velocity(key).unwrap_or_else(Vector3f::zero);
        assert!((velocity.y - (-9.81 / 60.0)).abs() < 1e-4);
    }

    #[test]
    fn static_bodies_do_not_move() {
        let key = keys(1)[0];
        let mut engine = PhysicsEngine::new();
        engine.add_rigid_body(
            key,
            RigidBodyDesc {
                shape: CollisionShape::ground(),
                mass: 0.0,
                restitution: 1.0,
                position: Vector3f::zero(),
                rotation: Quat::IDENTITY,
                linear_velocity: Vector3f::zero(),
            },
        );

        for _ in 0..10 {
            engine.update();
        }
        assert_eq!(engine.body_pose(key).map(|s| s.position), Some(Vector3f::zero()));
    }
}
