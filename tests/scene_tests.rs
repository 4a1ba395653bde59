//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: eager root, create/spawn/remove nodes, attach/detach hierarchy
//! - Hierarchy validation: cycles, root re-parenting, stale handles
//! - Component storage: attach/detach, typed access, state queries
//! - Engine context propagation to existing and later-attached subtrees

use std::rc::Rc;

use enco::app::{HeadlessWindow, Window};
use enco::component::{Component, ComponentContext, ComponentState};
use enco::errors::{EncoError, Result};
use enco::physics::PhysicsEngine;
use enco::render::RenderingEngine;
use enco::scene::{EngineContext, Scene, shared};

#[derive(Default)]
struct Tag {
    value: u32,
}

impl Component for Tag {}

/// Remembers which rendering engine it saw during `init`.
#[derive(Default)]
struct EngineSpy {
    seen: Option<*const ()>,
}

impl Component for EngineSpy {
    fn init(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        self.seen = cx.engines.rendering.as_ref().map(|rc| Rc::as_ptr(rc).cast::<()>());
        Ok(())
    }
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_has_root_from_the_start() {
    let scene = Scene::new();
    let root = scene.root();
    assert_eq!(scene.node_count(), 1);
    assert_eq!(scene.parent(root), None);
    assert_eq!(scene.node(root).unwrap().name, "Root");
}

#[test]
fn scene_spawn_appends_children_in_order() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = scene.spawn(root, "a").unwrap();
    let b = scene.spawn(root, "b").unwrap();

    assert_eq!(scene.children(root), &[a, b]);
    assert_eq!(scene.parent(a), Some(root));
    assert_eq!(scene.find_by_name("b"), Some(b));
}

#[test]
fn scene_created_node_is_detached() {
    let mut scene = Scene::new();
    let node = scene.create_node("loose");
    assert_eq!(scene.parent(node), None);
    assert!(scene.children(scene.root()).is_empty());
    // Not reachable from the root
    assert_eq!(scene.find_by_name("loose"), None);
}

#[test]
fn scene_remove_node_removes_subtree_and_components() {
    let mut scene = Scene::new();
    let root = scene.root();
    let parent = scene.spawn(root, "parent").unwrap();
    let child = scene.spawn(parent, "child").unwrap();
    let key = scene.add_component(child, Tag::default()).unwrap();

    scene.remove_node(parent).unwrap();

    assert!(scene.node(parent).is_none());
    assert!(scene.node(child).is_none());
    assert!(scene.component_state(key).is_none());
    assert_eq!(scene.component_count(), 0);
    assert!(scene.children(root).is_empty());
}

#[test]
fn scene_root_cannot_be_removed() {
    let mut scene = Scene::new();
    let root = scene.root();
    assert!(matches!(scene.remove_node(root), Err(EncoError::RootNodeImmutable)));
}

#[test]
fn scene_stale_handle_is_not_found() {
    let mut scene = Scene::new();
    let node = scene.spawn(scene.root(), "gone").unwrap();
    scene.remove_node(node).unwrap();

    assert!(matches!(scene.remove_node(node), Err(EncoError::NodeNotFound)));
    assert!(matches!(scene.spawn(node, "orphan"), Err(EncoError::NodeNotFound)));
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = scene.spawn(root, "a").unwrap();
    let b = scene.spawn(root, "b").unwrap();
    let child = scene.spawn(a, "child").unwrap();

    scene.add_child(b, child).unwrap();

    assert!(scene.children(a).is_empty());
    assert_eq!(scene.children(b), &[child]);
    assert_eq!(scene.parent(child), Some(b));
}

#[test]
fn scene_attach_to_descendant_is_rejected() {
    let mut scene = Scene::new();
    let a = scene.spawn(scene.root(), "a").unwrap();
    let b = scene.spawn(a, "b").unwrap();

    assert!(matches!(scene.add_child(b, a), Err(EncoError::HierarchyCycle)));
    assert!(matches!(scene.add_child(a, a), Err(EncoError::HierarchyCycle)));
    // Unchanged
    assert_eq!(scene.parent(b), Some(a));
}

#[test]
fn scene_root_cannot_be_reparented_or_detached() {
    let mut scene = Scene::new();
    let root = scene.root();
    let other = scene.create_node("other");
    assert!(matches!(scene.add_child(other, root), Err(EncoError::RootNodeImmutable)));
    assert!(matches!(scene.detach_node(root), Err(EncoError::RootNodeImmutable)));
    assert_eq!(scene.parent(root), None);
}

#[test]
fn scene_detach_node_keeps_it_alive() {
    let mut scene = Scene::new();
    let node = scene.spawn(scene.root(), "n").unwrap();
    scene.detach_node(node).unwrap();

    assert!(scene.node(node).is_some());
    assert_eq!(scene.parent(node), None);
    assert!(scene.children(scene.root()).is_empty());
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn components_keep_attachment_order() {
    let mut scene = Scene::new();
    let node = scene.spawn(scene.root(), "n").unwrap();
    let first = scene.add_component(node, Tag { value: 1 }).unwrap();
    let second = scene.add_component(node, Tag { value: 2 }).unwrap();

    assert_eq!(scene.components_of(node), &[first, second]);
    assert_eq!(scene.component::<Tag>(second).map(|t| t.value), Some(2));
    assert_eq!(scene.component_node(first), Some(node));
}

#[test]
fn component_downcast_to_wrong_type_is_none() {
    let mut scene = Scene::new();
    let key = scene.add_component(scene.root(), Tag::default()).unwrap();
    assert!(scene.component::<EngineSpy>(key).is_none());
}

#[test]
fn component_mut_edits_in_place() {
    let mut scene = Scene::new();
    let key = scene.add_component(scene.root(), Tag::default()).unwrap();
    scene.component_mut::<Tag>(key).unwrap().value = 42;
    assert_eq!(scene.component::<Tag>(key).unwrap().value, 42);
}

#[test]
fn add_component_does_not_init() {
    let mut scene = Scene::new();
    let key = scene.add_component(scene.root(), Tag::default()).unwrap();
    assert_eq!(scene.component_state(key), Some(ComponentState::Uninitialized));
}

#[test]
fn component_attaches_to_one_node_at_a_time() {
    let mut scene = Scene::new();
    let a = scene.spawn(scene.root(), "a").unwrap();
    let b = scene.spawn(scene.root(), "b").unwrap();

    let key = scene.create_component(Tag::default());
    assert_eq!(scene.component_state(key), Some(ComponentState::Unattached));

    scene.attach_component(a, key).unwrap();
    assert!(matches!(
        scene.attach_component(b, key),
        Err(EncoError::ComponentAlreadyAttached)
    ));

    scene.detach_component(key).unwrap();
    assert_eq!(scene.component_state(key), Some(ComponentState::Unattached));
    assert!(scene.components_of(a).is_empty());

    scene.attach_component(b, key).unwrap();
    assert_eq!(scene.component_node(key), Some(b));
}

#[test]
fn take_component_returns_ownership() {
    let mut scene = Scene::new();
    let key = scene.add_component(scene.root(), Tag { value: 9 }).unwrap();

    let boxed = scene.take_component(key).unwrap();
    assert_eq!(scene.component_count(), 0);
    assert!(boxed.type_name().ends_with("Tag"));
}

// ============================================================================
// Engine Context Propagation
// ============================================================================

#[test]
fn engine_set_on_root_reaches_existing_descendants() {
    let mut scene = Scene::new();
    let a = scene.spawn(scene.root(), "a").unwrap();
    let b = scene.spawn(a, "b").unwrap();

    let rendering = shared(RenderingEngine::headless());
    scene.set_rendering_engine(rendering.clone());

    for node in [scene.root(), a, b] {
        let engines = scene.engines(node).unwrap();
        assert!(Rc::ptr_eq(engines.rendering.as_ref().unwrap(), &rendering));
    }
}

#[test]
fn later_attached_subtree_observes_root_engines() {
    let mut scene = Scene::new();
    let rendering = shared(RenderingEngine::headless());
    let physics = shared(PhysicsEngine::new());
    let window: Rc<dyn Window> = Rc::new(HeadlessWindow::new("test", 64, 64));
    scene.set_rendering_engine(rendering.clone());
    scene.set_physics_engine(physics);
    scene.set_window(window);

    // Built detached, then attached
    let top = scene.create_node("top");
    let leaf = scene.create_node("leaf");
    scene.add_child(top, leaf).unwrap();
    let spy = scene.add_component(leaf, EngineSpy::default()).unwrap();
    scene.add_child(scene.root(), top).unwrap();

    let root_engines = scene.engines(scene.root()).unwrap().clone();
    assert!(scene.engines(top).unwrap().same_engines(&root_engines));
    assert!(scene.engines(leaf).unwrap().same_engines(&root_engines));

    scene.init().unwrap();
    let seen = scene.component::<EngineSpy>(spy).unwrap().seen;
    assert_eq!(seen, Some(Rc::as_ptr(&rendering).cast::<()>()));
}

#[test]
fn set_context_at_overrides_a_subtree() {
    let mut scene = Scene::new();
    let global = shared(RenderingEngine::headless());
    scene.set_rendering_engine(global.clone());

    let island = scene.spawn(scene.root(), "island").unwrap();
    let inner = scene.spawn(island, "inner").unwrap();

    let local = shared(RenderingEngine::headless());
    let context = EngineContext {
        rendering: Some(local.clone()),
        ..EngineContext::default()
    };
    scene.set_context_at(island, context).unwrap();

    assert!(Rc::ptr_eq(scene.engines(inner).unwrap().rendering.as_ref().unwrap(), &local));
    assert!(Rc::ptr_eq(
        scene.engines(scene.root()).unwrap().rendering.as_ref().unwrap(),
        &global
    ));
}

#[test]
fn propagate_context_repairs_descendants() {
    let mut scene = Scene::new();
    let a = scene.spawn(scene.root(), "a").unwrap();
    let b = scene.spawn(a, "b").unwrap();

    let rendering = shared(RenderingEngine::headless());
    scene
        .set_context_at(
            scene.root(),
            EngineContext {
                rendering: Some(rendering.clone()),
                ..EngineContext::default()
            },
        )
        .unwrap();
    scene.set_context_at(b, EngineContext::default()).unwrap();
    assert!(scene.engines(b).unwrap().rendering.is_none());

    scene.propagate_context(scene.root()).unwrap();
    assert!(scene.engines(b).unwrap().rendering.is_some());
}
