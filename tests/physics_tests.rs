//! Physics Tests
//!
//! Tests for:
//! - Fixed stepping: N updates simulate N * time_step in N * substeps substeps
//! - Native storage: body, motion state and shape are released together
//! - RigidBody component: registration from the world pose, pose write-back
//! - Ground contact and restitution

use std::rc::Rc;

use glam::Quat;

use enco::component::{ComponentState, RigidBody};
use enco::math::Vector3f;
use enco::physics::{CollisionShape, PhysicsEngine};
use enco::scene::{Scene, Shared, shared};
use enco::settings::PhysicsSettings;

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn physics_scene() -> (Scene, Shared<PhysicsEngine>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut scene = Scene::new();
    let physics = shared(PhysicsEngine::new());
    scene.set_physics_engine(physics.clone());
    (scene, physics)
}

// ============================================================================
// Stepping
// ============================================================================

#[test]
fn updates_advance_fixed_time_regardless_of_wall_clock() {
    let mut engine = PhysicsEngine::new();
    for _ in 0..120 {
        engine.update();
    }

    assert!((engine.simulated_time() - 2.0).abs() < 1e-4);
    assert_eq!(engine.substeps_performed(), 1200);
}

#[test]
fn simulated_time_does_not_drift() {
    let mut engine = PhysicsEngine::new();
    for _ in 0..3600 {
        engine.update();
    }

    assert_eq!(engine.updates(), 3600);
    // One minute of frames, with no per-step rounding accumulated
    assert!((engine.simulated_time() - 60.0).abs() < 1e-9);
}

#[test]
fn default_step_is_one_sixtieth_in_ten_substeps() {
    let engine = PhysicsEngine::new();
    assert_eq!(engine.time_step(), 1.0 / 60.0);
    assert_eq!(engine.substeps(), 10);
    assert_eq!(engine.gravity(), Vector3f::new(0.0, -9.81, 0.0));
}

#[test]
fn settings_override_stepping() {
    let settings = PhysicsSettings {
        time_step: 0.5,
        substeps: 4,
        ..PhysicsSettings::default()
    };
    let mut engine = PhysicsEngine::with_settings(&settings);
    engine.update();
    engine.update();

    assert!((engine.simulated_time() - 1.0).abs() < 1e-9);
    assert_eq!(engine.substeps_performed(), 8);
}

// ============================================================================
// RigidBody component
// ============================================================================

#[test]
fn rigid_body_registers_on_init_and_releases_on_deinit() {
    let (mut scene, physics) = physics_scene();
    let node = scene.spawn(scene.root(), "crate").unwrap();
    scene
        .add_component(node, RigidBody::new(CollisionShape::cuboid(Vector3f::one()), 1.0))
        .unwrap();

    scene.init().unwrap();
    {
        let engine = physics.borrow();
        assert_eq!(engine.body_count(), 1);
        assert_eq!(engine.motion_state_count(), 1);
        assert_eq!(engine.shape_count(), 1);
    }

    scene.deinit().unwrap();
    let engine = physics.borrow();
    assert_eq!(engine.body_count(), 0);
    assert_eq!(engine.motion_state_count(), 0);
    assert_eq!(engine.shape_count(), 0);
}

#[test]
fn rigid_body_starts_at_world_pose() {
    let (mut scene, physics) = physics_scene();
    let parent = scene.spawn(scene.root(), "parent").unwrap();
    let child = scene.spawn(parent, "ball").unwrap();
    scene.transform_mut(parent).unwrap().position = Vector3f::new(0.0, 5.0, 0.0);
    scene.transform_mut(child).unwrap().position = Vector3f::new(1.0, 0.0, 0.0);
    let key = scene
        .add_component(child, RigidBody::new(CollisionShape::sphere(0.5), 1.0))
        .unwrap();

    scene.init().unwrap();

    let pose = physics.borrow().body_pose(key).unwrap();
    assert!(approx(pose.position.x, 1.0));
    assert!(approx(pose.position.y, 5.0));
    assert!(pose.rotation.angle_between(Quat::IDENTITY) < 1e-4);
}

#[test]
fn falling_body_moves_its_node() {
    let (mut scene, physics) = physics_scene();
    let parent = scene.spawn(scene.root(), "parent").unwrap();
    let ball = scene.spawn(parent, "ball").unwrap();
    scene.transform_mut(parent).unwrap().position = Vector3f::new(0.0, 100.0, 0.0);
    let key = scene
        .add_component(ball, RigidBody::new(CollisionShape::sphere(0.5), 1.0))
        .unwrap();

    scene.init().unwrap();
    for _ in 0..30 {
        physics.borrow_mut().update();
        scene.update().unwrap();
    }

    let pose = physics.borrow().body_pose(key).unwrap();
    let world_y = scene.world_matrix(ball).unwrap().translation_part().y;
    let local_y = scene.node(ball).unwrap().transform.position.y;

    assert!(pose.position.y < 100.0);
    assert!(approx(world_y, pose.position.y));
    // Local pose is expressed relative to the parent
    assert!(approx(local_y, pose.position.y - 100.0));
}

#[test]
fn static_body_keeps_node_in_place() {
    let (mut scene, physics) = physics_scene();
    let floor = scene.spawn(scene.root(), "floor").unwrap();
    let key = scene
        .add_component(floor, RigidBody::new(CollisionShape::ground(), 0.0))
        .unwrap();

    scene.init().unwrap();
    for _ in 0..10 {
        physics.borrow_mut().update();
        scene.update().unwrap();
    }

    assert_eq!(scene.node(floor).unwrap().transform.position, Vector3f::zero());
    assert_eq!(scene.component_state(key), Some(ComponentState::Initialized));
}

#[test]
fn ball_rests_on_ground_plane() {
    let (mut scene, physics) = physics_scene();
    let floor = scene.spawn(scene.root(), "floor").unwrap();
    let ball = scene.spawn(scene.root(), "ball").unwrap();
    scene.transform_mut(ball).unwrap().position = Vector3f::new(0.0, 2.0, 0.0);

    scene
        .add_component(floor, RigidBody::new(CollisionShape::ground(), 0.0))
        .unwrap();
    scene
        .add_component(ball, RigidBody::new(CollisionShape::sphere(0.5), 1.0))
        .unwrap();

    scene.init().unwrap();
    for _ in 0..600 {
        physics.borrow_mut().update();
        scene.update().unwrap();
    }

    let y = scene.node(ball).unwrap().transform.position.y;
    assert!((y - 0.5).abs() < 0.05, "ball should rest on the plane, y = {y}");
}

#[test]
fn bouncy_ball_reverses_velocity() {
    let (mut scene, physics) = physics_scene();
    let floor = scene.spawn(scene.root(), "floor").unwrap();
    let ball = scene.spawn(scene.root(), "ball").unwrap();
    scene.transform_mut(ball).unwrap().position = Vector3f::new(0.0, 0.52, 0.0);

    scene
        .add_component(
            floor,
            RigidBody::new(CollisionShape::ground(), 0.0).with_restitution(1.0),
        )
        .unwrap();
    let key = scene
        .add_component(
            ball,
            RigidBody::new(CollisionShape::sphere(0.5), 1.0)
                .with_restitution(1.0)
                .with_velocity(Vector3f::new(0.0, -5.0, 0.0)),
        )
        .unwrap();

    scene.init().unwrap();
    physics.borrow_mut().update();

    let velocity = physics.borrow().linear_velocity(key).unwrap();
    assert!(velocity.y > 0.0);
}

#[test]
fn removing_the_node_releases_native_storage() {
    let (mut scene, physics) = physics_scene();
    let node = scene.spawn(scene.root(), "crate").unwrap();
    scene
        .add_component(node, RigidBody::new(CollisionShape::cuboid(Vector3f::one()), 2.0))
        .unwrap();
    scene.init().unwrap();

    scene.remove_node(node).unwrap();

    assert_eq!(physics.borrow().body_count(), 0);
    assert_eq!(Rc::strong_count(&physics), 2);
}
