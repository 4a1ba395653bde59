use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::app::Window;
use crate::audio::AudioEngine;
use crate::component::{
    Component, ComponentContext, ComponentKey, ComponentSlot, ComponentState, Phase, dispatch,
};
use crate::errors::{EncoError, Result};
use crate::math::Matrix4f;
use crate::physics::PhysicsEngine;
use crate::render::RenderingEngine;
use crate::scene::NodeHandle;
use crate::scene::context::{EngineContext, Shared};
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::utils::time::Timer;

/// The scene graph.
///
/// Owns every node and every component. The root node is created by
/// [`Scene::new`] and lives as long as the scene; all other nodes are owned by
/// their parent (removing a node removes its subtree and its components).
///
/// Lifecycle passes ([`init`](Self::init), [`init_rendering`](Self::init_rendering),
/// [`update`](Self::update), [`deinit`](Self::deinit)) walk the tree in
/// pre-order: at each node its components run first, in attachment order,
/// then its children, in insertion order. World matrices are refreshed on the
/// way down, so every hook sees up-to-date transforms.
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    components: SlotMap<ComponentKey, ComponentSlot>,
    root: NodeHandle,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("Root"));
        Self {
            nodes,
            components: SlotMap::with_key(),
            root,
        }
    }

    /// The root node, created with the scene.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    // ========================================================================
    // Node API
    // ========================================================================

    /// Creates a detached node. It takes part in lifecycle passes once it is
    /// attached below the root with [`add_child`](Self::add_child).
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        let handle = self.nodes.insert(Node::new(name));
        log::debug!("Created node '{name}'");
        handle
    }

    /// Creates a node and attaches it to `parent`.
    pub fn spawn(&mut self, parent: NodeHandle, name: &str) -> Result<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return Err(EncoError::NodeNotFound);
        }
        let handle = self.create_node(name);
        self.add_child(parent, handle)?;
        Ok(handle)
    }

    /// Appends `child` to `parent`'s children.
    ///
    /// The child is first detached from its previous parent. The parent's
    /// engine context is then copied onto the whole attached subtree and its
    /// world matrices are recomputed.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(EncoError::NodeNotFound);
        }
        if child == self.root {
            return Err(EncoError::RootNodeImmutable);
        }
        if transform_system::is_ancestor_or_self(&self.nodes, child, parent) {
            log::warn!("Refusing to attach a node below itself");
            return Err(EncoError::HierarchyCycle);
        }

        self.unlink_from_parent(child);

        self.nodes[parent].children.push(child);
        let child_node = &mut self.nodes[child];
        child_node.parent = Some(parent);
        child_node.transform.mark_dirty();

        let context = self.nodes[parent].engines.clone();
        self.push_context(child, &context);
        transform_system::update_subtree(&mut self.nodes, child);
        Ok(())
    }

    /// Detaches `child` from its parent without destroying it. Its components
    /// keep their state; the node stops taking part in lifecycle passes until
    /// it is attached again.
    pub fn detach_node(&mut self, child: NodeHandle) -> Result<()> {
        if child == self.root {
            return Err(EncoError::RootNodeImmutable);
        }
        if !self.nodes.contains_key(child) {
            return Err(EncoError::NodeNotFound);
        }
        self.unlink_from_parent(child);
        Ok(())
    }

    /// Destroys a node, its subtree and every component attached to them.
    ///
    /// Initialized components are deinitialized first, a node's components
    /// before its children, so backends see unregistrations in pre-order.
    /// Deinit failures are logged and do not stop the teardown.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<()> {
        if handle == self.root {
            return Err(EncoError::RootNodeImmutable);
        }
        if !self.nodes.contains_key(handle) {
            return Err(EncoError::NodeNotFound);
        }

        for node_handle in transform_system::pre_order(&self.nodes, handle) {
            let parent_world = self.parent_world(node_handle);
            let keys = self.nodes[node_handle].components.clone();
            for key in keys {
                if let Err(err) = self.run_hook(node_handle, key, Phase::Deinit, &parent_world) {
                    log::warn!("Deinit failed while removing node: {err}");
                }
                self.components.remove(key);
            }
        }

        self.unlink_from_parent(handle);
        for node_handle in transform_system::pre_order(&self.nodes, handle) {
            self.nodes.remove(node_handle);
        }
        Ok(())
    }

    fn unlink_from_parent(&mut self, child: NodeHandle) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent)
            && let Some(pos) = parent_node.children.iter().position(|&c| c == child)
        {
            parent_node.children.remove(pos);
        }
    }

    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    pub fn transform_mut(&mut self, handle: NodeHandle) -> Option<&mut Transform> {
        self.nodes.get_mut(handle).map(|n| &mut n.transform)
    }

    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle)?.parent
    }

    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(handle).map_or(&[], |n| n.children.as_slice())
    }

    /// First node in pre-order below the root with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        transform_system::pre_order(&self.nodes, self.root)
            .into_iter()
            .find(|&h| self.nodes[h].name == name)
    }

    /// Cached world matrix of a node, as of the last traversal.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Matrix4f> {
        self.nodes.get(handle).map(|n| *n.world_matrix())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn parent_world(&self, handle: NodeHandle) -> Matrix4f {
        self.nodes
            .get(handle)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map_or_else(Matrix4f::identity, |p| *p.world_matrix())
    }

    // ========================================================================
    // Component API
    // ========================================================================

    /// Stores a component without attaching it.
    pub fn create_component<C: Component>(&mut self, component: C) -> ComponentKey {
        self.create_boxed_component(Box::new(component))
    }

    pub fn create_boxed_component(&mut self, component: Box<dyn Component>) -> ComponentKey {
        self.components.insert(ComponentSlot::new(component))
    }

    /// Attaches a stored component to `node`. Does not run `init`.
    pub fn attach_component(&mut self, node: NodeHandle, key: ComponentKey) -> Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(EncoError::NodeNotFound);
        }
        let slot = self.components.get_mut(key).ok_or(EncoError::ComponentNotFound)?;
        if slot.node.is_some() {
            return Err(EncoError::ComponentAlreadyAttached);
        }

        slot.node = Some(node);
        if slot.state == ComponentState::Unattached {
            slot.state = ComponentState::Uninitialized;
        }
        self.nodes[node].components.push(key);
        Ok(())
    }

    /// Creates a component and attaches it to `node`. Does not run `init`.
    pub fn add_component<C: Component>(&mut self, node: NodeHandle, component: C) -> Result<ComponentKey> {
        if !self.nodes.contains_key(node) {
            return Err(EncoError::NodeNotFound);
        }
        let key = self.create_component(component);
        self.attach_component(node, key)?;
        Ok(key)
    }

    /// Detaches a component from its node, deinitializing it first if it was
    /// initialized. Detaching an unattached component does nothing.
    pub fn detach_component(&mut self, key: ComponentKey) -> Result<()> {
        let slot = self.components.get(key).ok_or(EncoError::ComponentNotFound)?;
        let Some(node) = slot.node else {
            return Ok(());
        };

        let parent_world = self.parent_world(node);
        self.run_hook(node, key, Phase::Deinit, &parent_world)?;

        if let Some(n) = self.nodes.get_mut(node)
            && let Some(pos) = n.components.iter().position(|&k| k == key)
        {
            n.components.remove(pos);
        }

        let slot = &mut self.components[key];
        slot.node = None;
        if slot.state == ComponentState::Uninitialized {
            slot.state = ComponentState::Unattached;
        }
        Ok(())
    }

    /// Detaches and removes a component, handing ownership back.
    pub fn take_component(&mut self, key: ComponentKey) -> Result<Box<dyn Component>> {
        self.detach_component(key)?;
        self.components
            .remove(key)
            .map(|slot| slot.component)
            .ok_or(EncoError::ComponentNotFound)
    }

    #[must_use]
    pub fn component<T: Component>(&self, key: ComponentKey) -> Option<&T> {
        let component: &dyn Component = self.components.get(key)?.component.as_ref();
        let component: &dyn Any = component;
        component.downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self, key: ComponentKey) -> Option<&mut T> {
        let component: &mut dyn Component = self.components.get_mut(key)?.component.as_mut();
        let component: &mut dyn Any = component;
        component.downcast_mut::<T>()
    }

    /// All components of type `T`, attached or not.
    pub fn components_of_type<T: Component>(&self) -> impl Iterator<Item = (ComponentKey, &T)> {
        self.components.iter().filter_map(|(key, slot)| {
            let component: &dyn Component = slot.component.as_ref();
            let component: &dyn Any = component;
            component.downcast_ref::<T>().map(|c| (key, c))
        })
    }

    #[must_use]
    pub fn component_state(&self, key: ComponentKey) -> Option<ComponentState> {
        self.components.get(key).map(|slot| slot.state)
    }

    /// The node a component is attached to.
    #[must_use]
    pub fn component_node(&self, key: ComponentKey) -> Option<NodeHandle> {
        self.components.get(key)?.node
    }

    #[must_use]
    pub fn components_of(&self, node: NodeHandle) -> &[ComponentKey] {
        self.nodes.get(node).map_or(&[], |n| n.components.as_slice())
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // ========================================================================
    // Engine context propagation
    // ========================================================================

    pub fn set_rendering_engine(&mut self, engine: Shared<RenderingEngine>) {
        self.update_root_context(|cx| cx.rendering = Some(engine));
    }

    pub fn set_physics_engine(&mut self, engine: Shared<PhysicsEngine>) {
        self.update_root_context(|cx| cx.physics = Some(engine));
    }

    pub fn set_audio_engine(&mut self, engine: Shared<AudioEngine>) {
        self.update_root_context(|cx| cx.audio = Some(engine));
    }

    pub fn set_window(&mut self, window: Rc<dyn Window>) {
        self.update_root_context(|cx| cx.window = Some(window));
    }

    pub fn set_timer(&mut self, timer: Shared<Timer>) {
        self.update_root_context(|cx| cx.timer = Some(timer));
    }

    fn update_root_context(&mut self, apply: impl FnOnce(&mut EngineContext)) {
        let root = self.root;
        let mut context = self.nodes[root].engines.clone();
        apply(&mut context);
        self.push_context(root, &context);
    }

    /// Replaces the engine context of `node` and of its whole subtree.
    pub fn set_context_at(&mut self, node: NodeHandle, context: EngineContext) -> Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(EncoError::NodeNotFound);
        }
        self.push_context(node, &context);
        Ok(())
    }

    /// Copies the context of `node` onto every descendant.
    pub fn propagate_context(&mut self, node: NodeHandle) -> Result<()> {
        let context = self.nodes.get(node).ok_or(EncoError::NodeNotFound)?.engines.clone();
        self.push_context(node, &context);
        Ok(())
    }

    fn push_context(&mut self, start: NodeHandle, context: &EngineContext) {
        for handle in transform_system::pre_order(&self.nodes, start) {
            self.nodes[handle].engines = context.clone();
        }
    }

    /// Engine context visible to `node`.
    #[must_use]
    pub fn engines(&self, node: NodeHandle) -> Option<&EngineContext> {
        self.nodes.get(node).map(|n| &n.engines)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Runs `init` on every attached, uninitialized component.
    pub fn init(&mut self) -> Result<()> {
        self.run_phase(Phase::Init)
    }

    /// Runs `init_rendering` on every component that finished `init`.
    ///
    /// Separate from [`init`](Self::init) so rendering registration happens
    /// after the whole tree finished general initialization.
    pub fn init_rendering(&mut self) -> Result<()> {
        self.run_phase(Phase::InitRendering)
    }

    /// Per-frame pass: refreshes world matrices and runs `update`.
    pub fn update(&mut self) -> Result<()> {
        self.run_phase(Phase::Update)
    }

    /// Runs `deinit` on every initialized component. Running it twice is
    /// harmless: deinitialized components are skipped.
    pub fn deinit(&mut self) -> Result<()> {
        self.run_phase(Phase::Deinit)
    }

    /// Recomputes every world matrix below the root without running hooks.
    pub fn update_world_transforms(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, self.root);
    }

    fn run_phase(&mut self, phase: Phase) -> Result<()> {
        let mut stack: Vec<(NodeHandle, Matrix4f)> = Vec::with_capacity(64);
        stack.push((self.root, Matrix4f::identity()));

        while let Some((handle, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            node.transform.refresh_world(&parent_world);

            let keys: SmallVec<[ComponentKey; 4]> = node.components.clone();
            for key in keys {
                if let Err(err) = self.run_hook(handle, key, phase, &parent_world) {
                    log::error!("{phase:?} aborted at node '{}': {err}", self.nodes[handle].name);
                    return Err(err);
                }
            }

            let node = &self.nodes[handle];
            let world = *node.world_matrix();
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        Ok(())
    }

    /// Runs one hook if the component's state allows it, then folds any
    /// transform change back into the node's world matrix.
    fn run_hook(
        &mut self,
        handle: NodeHandle,
        key: ComponentKey,
        phase: Phase,
        parent_world: &Matrix4f,
    ) -> Result<()> {
        let node = self.nodes.get_mut(handle).ok_or(EncoError::NodeNotFound)?;
        let slot = self.components.get_mut(key).ok_or(EncoError::ComponentNotFound)?;
        if !phase.applies_to(slot.state) {
            return Ok(());
        }

        let mut cx = ComponentContext {
            key,
            node: handle,
            engines: &node.engines,
            transform: &mut node.transform,
            parent_world: *parent_world,
        };
        let result = dispatch(slot.component.as_mut(), phase, &mut cx);
        node.transform.refresh_world(parent_world);

        result?;
        let next = phase.next_state(slot.state);
        if next != slot.state {
            log::debug!("{} {:?} -> {:?}", slot.component.type_name(), slot.state, next);
            slot.state = next;
        }
        Ok(())
    }
}

impl Drop for Scene {
    /// Deinitializes every initialized component, reachable from the root or
    /// not. Reachable ones go first, in pre-order; a failing hook is logged
    /// and the teardown moves on.
    fn drop(&mut self) {
        let mut keys: Vec<ComponentKey> = Vec::with_capacity(self.components.len());
        for handle in transform_system::pre_order(&self.nodes, self.root) {
            keys.extend(self.nodes[handle].components.iter().copied());
        }
        let reachable: FxHashSet<ComponentKey> = keys.iter().copied().collect();
        keys.extend(
            self.components
                .iter()
                .filter(|(key, slot)| slot.state.is_initialized() && !reachable.contains(key))
                .map(|(key, _)| key),
        );

        for key in keys {
            let Some(node) = self.component_node(key) else {
                continue;
            };
            let parent_world = self.parent_world(node);
            if let Err(err) = self.run_hook(node, key, Phase::Deinit, &parent_world) {
                log::warn!("Deinit failed during scene teardown: {err}");
            }
        }
    }
}
