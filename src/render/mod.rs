//! Rendering Engine
//!
//! Registry of everything the renderer needs to draw a frame:
//! - lights, registered by [`Light`](crate::component::Light) components
//! - renderables, registered by [`MeshRenderer`](crate::component::MeshRenderer)
//! - the main camera, claimed by a [`Camera`](crate::component::Camera)
//!
//! Components register under their [`ComponentKey`]; the engine never owns
//! them and only keeps plain records that the components refresh every frame.

pub mod renderer;

use rustc_hash::FxHashMap;

use crate::app::Window;
use crate::assets::{PoolRef, Texture};
use crate::component::{ComponentKey, LightKind};
use crate::errors::Result;
use crate::math::{Matrix4f, Vector3f};
use crate::settings::RenderSettings;

pub use renderer::{ClearFlags, ContextDescriptor, HeadlessRenderer, Renderer};

/// What the renderer knows about one registered light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRecord {
    pub kind: LightKind,
    pub color: Vector3f,
    pub intensity: f32,
    /// World-space position, refreshed on update.
    pub position: Vector3f,
    /// World-space forward (-Z) direction, refreshed on update.
    pub direction: Vector3f,
}

/// A drawable registered by a mesh renderer.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub mesh: String,
    pub texture: Option<PoolRef<Texture>>,
    pub world_matrix: Matrix4f,
}

/// Matrices of the main camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub view: Matrix4f,
    pub projection: Matrix4f,
    pub view_projection: Matrix4f,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            view: Matrix4f::identity(),
            projection: Matrix4f::identity(),
            view_projection: Matrix4f::identity(),
        }
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub lights: usize,
    pub draw_calls: usize,
}

pub struct RenderingEngine {
    renderer: Box<dyn Renderer>,

    lights: Vec<(ComponentKey, LightRecord)>,
    renderables: FxHashMap<ComponentKey, RenderObject>,

    main_camera: Option<ComponentKey>,
    camera: CameraState,

    clear_color: Vector3f,
    clear_depth: f64,
    frame_count: u64,
}

impl RenderingEngine {
    #[must_use]
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self::with_settings(renderer, &RenderSettings::default())
    }

    /// A rendering engine backed by a [`HeadlessRenderer`].
    #[must_use]
    pub fn headless() -> Self {
        Self::new(Box::new(HeadlessRenderer::new()))
    }

    #[must_use]
    pub fn with_settings(renderer: Box<dyn Renderer>, settings: &RenderSettings) -> Self {
        Self {
            renderer,
            lights: Vec::new(),
            renderables: FxHashMap::default(),
            main_camera: None,
            camera: CameraState::default(),
            clear_color: settings.clear_color,
            clear_depth: settings.clear_depth,
            frame_count: 0,
        }
    }

    // ========================================================================
    // Context
    // ========================================================================

    /// Creates the drawing context sized to `window`.
    pub fn create_context(&mut self, window: &dyn Window, mut descriptor: ContextDescriptor) -> Result<()> {
        let (width, height) = window.inner_size();
        descriptor.width = width;
        descriptor.height = height;
        self.renderer.create_context(&descriptor)
    }

    pub fn delete_context(&mut self) {
        self.renderer.delete_context();
    }

    #[must_use]
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    // ========================================================================
    // Lights
    // ========================================================================

    /// Registers a light. Returns `false` if the key was already registered.
    pub fn add_light(&mut self, key: ComponentKey, record: LightRecord) -> bool {
        if self.lights.iter().any(|(k, _)| *k == key) {
            log::warn!("Light {key:?} is already registered");
            return false;
        }
        log::debug!("Registered {:?} light {key:?}", record.kind);
        self.lights.push((key, record));
        true
    }

    /// Unregisters a light. Returns `false` if the key was not registered.
    pub fn remove_light(&mut self, key: ComponentKey) -> bool {
        let Some(pos) = self.lights.iter().position(|(k, _)| *k == key) else {
            log::warn!("Tried to remove unregistered light {key:?}");
            return false;
        };
        self.lights.remove(pos);
        log::debug!("Unregistered light {key:?}");
        true
    }

    pub fn light_mut(&mut self, key: ComponentKey) -> Option<&mut LightRecord> {
        self.lights.iter_mut().find(|(k, _)| *k == key).map(|(_, r)| r)
    }

    #[must_use]
    pub fn light(&self, key: ComponentKey) -> Option<&LightRecord> {
        self.lights.iter().find(|(k, _)| *k == key).map(|(_, r)| r)
    }

    /// Registered lights in registration order.
    pub fn lights(&self) -> impl Iterator<Item = &LightRecord> {
        self.lights.iter().map(|(_, r)| r)
    }

    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    // ========================================================================
    // Renderables
    // ========================================================================

    pub fn add_renderable(&mut self, key: ComponentKey, object: RenderObject) -> bool {
        if self.renderables.contains_key(&key) {
            log::warn!("Renderable {key:?} is already registered");
            return false;
        }
        log::debug!("Registered renderable '{}'", object.mesh);
        self.renderables.insert(key, object);
        true
    }

    pub fn remove_renderable(&mut self, key: ComponentKey) -> bool {
        if self.renderables.remove(&key).is_none() {
            log::warn!("Tried to remove unregistered renderable {key:?}");
            return false;
        }
        true
    }

    /// Updates the world matrix of a registered renderable.
    pub fn update_renderable(&mut self, key: ComponentKey, world_matrix: Matrix4f) -> bool {
        match self.renderables.get_mut(&key) {
            Some(object) => {
                object.world_matrix = world_matrix;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn renderable(&self, key: ComponentKey) -> Option<&RenderObject> {
        self.renderables.get(&key)
    }

    #[must_use]
    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    // ========================================================================
    // Camera
    // ========================================================================

    /// Makes `key` the main camera, replacing any previous one.
    pub fn set_main_camera(&mut self, key: ComponentKey, projection: Matrix4f) {
        if let Some(previous) = self.main_camera.replace(key)
            && previous != key
        {
            log::debug!("Main camera {previous:?} replaced by {key:?}");
        }
        self.camera = CameraState {
            view: Matrix4f::identity(),
            projection,
            view_projection: projection,
        };
    }

    /// Clears the main camera if `key` currently holds it.
    pub fn clear_main_camera(&mut self, key: ComponentKey) -> bool {
        if self.main_camera != Some(key) {
            return false;
        }
        self.main_camera = None;
        self.camera = CameraState::default();
        true
    }

    /// Updates the camera matrices. Ignored unless `key` is the main camera.
    pub fn update_camera(&mut self, key: ComponentKey, view: Matrix4f, projection: Matrix4f) -> bool {
        if self.main_camera != Some(key) {
            return false;
        }
        self.camera = CameraState {
            view,
            projection,
            view_projection: projection * view,
        };
        true
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<ComponentKey> {
        self.main_camera
    }

    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    // ========================================================================
    // Frame
    // ========================================================================

    pub fn set_clear_color(&mut self, color: Vector3f) {
        self.clear_color = color;
    }

    #[must_use]
    pub fn clear_color(&self) -> Vector3f {
        self.clear_color
    }

    pub fn set_clear_depth(&mut self, depth: f64) {
        self.clear_depth = depth;
    }

    #[must_use]
    pub fn clear_depth(&self) -> f64 {
        self.clear_depth
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clears the buffers and submits every registered renderable.
    pub fn render_frame(&mut self) -> FrameStats {
        let renderer = self.renderer.as_mut();
        renderer.begin_frame();
        renderer.set_clear_color(self.clear_color);
        renderer.set_clear_depth(self.clear_depth);
        renderer.clear_buffer(ClearFlags::COLOR | ClearFlags::DEPTH);

        let view_projection = self.camera.view_projection;
        for object in self.renderables.values() {
            renderer.draw(object, &view_projection);
        }

        renderer.end_frame();
        self.frame_count += 1;

        FrameStats {
            lights: self.lights.len(),
            draw_calls: self.renderables.len(),
        }
    }
}

impl Default for RenderingEngine {
    fn default() -> Self {
        Self::headless()
    }
}
