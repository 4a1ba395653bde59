//! Component Capability Model
//!
//! A component is a behaviour unit attached to at most one node. All
//! variants share one capability set, the four lifecycle hooks of
//! [`Component`]:
//!
//! | Hook             | Runs when state is       | State afterwards |
//! |------------------|--------------------------|------------------|
//! | `init`           | `Uninitialized`          | `Initialized`    |
//! | `init_rendering` | `Initialized`            | `Live`           |
//! | `update`         | `Initialized` or `Live`  | unchanged        |
//! | `deinit`         | `Initialized` or `Live`  | `Deinitialized`  |
//!
//! `Deinitialized` is terminal, so unregistration from a backend happens at
//! most once. The [`Scene`](crate::scene::Scene) enforces the table; the hooks
//! only do the variant-specific registration work.
//!
//! Variants:
//! - [`Light`]: registers with the rendering engine
//! - [`RigidBody`]: registers a native body with the physics engine
//! - [`MeshRenderer`]: registers a renderable with the rendering engine
//! - [`Camera`]: becomes the rendering engine's main camera

pub mod camera;
pub mod light;
pub mod mesh_renderer;
pub mod rigid_body;

use std::any::Any;
use std::cell::RefMut;

use slotmap::new_key_type;

use crate::errors::Result;
use crate::math::Matrix4f;
use crate::physics::PhysicsEngine;
use crate::render::RenderingEngine;
use crate::scene::NodeHandle;
use crate::scene::context::EngineContext;
use crate::scene::transform::Transform;

pub use camera::{Camera, Projection};
pub use light::{Light, LightKind};
pub use mesh_renderer::MeshRenderer;
pub use rigid_body::RigidBody;

new_key_type! {
    /// Identity of a component inside its scene. Backends register components
    /// by key and never own them.
    pub struct ComponentKey;
}

/// Lifecycle state of one component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentState {
    /// Created in the scene but not attached to any node.
    Unattached,
    /// Attached, `init` has not run yet.
    Uninitialized,
    /// `init` ran; waiting for the rendering pass.
    Initialized,
    /// `init_rendering` ran; fully registered.
    Live,
    /// `deinit` ran; inert for good.
    Deinitialized,
}

impl ComponentState {
    /// Whether `update` and `deinit` apply to this state.
    #[must_use]
    pub fn is_initialized(self) -> bool {
        matches!(self, ComponentState::Initialized | ComponentState::Live)
    }

    #[must_use]
    pub fn is_attached(self) -> bool {
        !matches!(self, ComponentState::Unattached)
    }
}

/// The lifecycle passes the scene dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    InitRendering,
    Update,
    Deinit,
}

impl Phase {
    /// Whether a component in `state` takes part in this pass.
    #[must_use]
    pub fn applies_to(self, state: ComponentState) -> bool {
        match self {
            Phase::Init => state == ComponentState::Uninitialized,
            Phase::InitRendering => state == ComponentState::Initialized,
            Phase::Update | Phase::Deinit => state.is_initialized(),
        }
    }

    /// State after the hook succeeded.
    #[must_use]
    pub fn next_state(self, state: ComponentState) -> ComponentState {
        match self {
            Phase::Init => ComponentState::Initialized,
            Phase::InitRendering => ComponentState::Live,
            Phase::Update => state,
            Phase::Deinit => ComponentState::Deinitialized,
        }
    }
}

/// What a hook can see of its owning node.
pub struct ComponentContext<'a> {
    /// Key of the component being dispatched.
    pub key: ComponentKey,
    /// The owning node (a non-owning back-reference).
    pub node: NodeHandle,
    /// Engines shared with the owning node's subtree.
    pub engines: &'a EngineContext,
    /// The owning node's transform. Changes are folded into the world matrix
    /// right after the hook returns.
    pub transform: &'a mut Transform,
    /// World matrix of the owning node's parent (identity for the root).
    pub parent_world: Matrix4f,
}

impl ComponentContext<'_> {
    pub fn rendering_engine(&self) -> Result<RefMut<'_, RenderingEngine>> {
        self.engines.rendering_engine()
    }

    pub fn physics_engine(&self) -> Result<RefMut<'_, PhysicsEngine>> {
        self.engines.physics_engine()
    }

    #[must_use]
    pub fn world_matrix(&self) -> &Matrix4f {
        self.transform.world_matrix()
    }
}

/// The capability set shared by every component variant.
///
/// All hooks default to doing nothing. Hooks report missing engines and
/// backend failures through [`Result`]; the scene aborts the traversal on the
/// first error and leaves the failing component in its previous state.
pub trait Component: Any {
    fn init(&mut self, _cx: &mut ComponentContext<'_>) -> Result<()> {
        Ok(())
    }

    fn init_rendering(&mut self, _cx: &mut ComponentContext<'_>) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _cx: &mut ComponentContext<'_>) -> Result<()> {
        Ok(())
    }

    fn deinit(&mut self, _cx: &mut ComponentContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Name used in log messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Routes a phase to the matching hook.
pub(crate) fn dispatch(component: &mut dyn Component, phase: Phase, cx: &mut ComponentContext<'_>) -> Result<()> {
    match phase {
        Phase::Init => component.init(cx),
        Phase::InitRendering => component.init_rendering(cx),
        Phase::Update => component.update(cx),
        Phase::Deinit => component.deinit(cx),
    }
}

/// Storage entry for a component inside the scene.
pub(crate) struct ComponentSlot {
    pub(crate) component: Box<dyn Component>,
    pub(crate) node: Option<NodeHandle>,
    pub(crate) state: ComponentState,
}

impl ComponentSlot {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        Self {
            component,
            node: None,
            state: ComponentState::Unattached,
        }
    }
}
