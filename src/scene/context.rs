//! Engine context propagated through the hierarchy.
//!
//! Every node carries an [`EngineContext`]: the bundle of backend references
//! it shares with its whole subtree. The scene writes it explicitly when an
//! engine is set, when a subtree is attached, or when
//! [`Scene::propagate_context`](crate::scene::Scene::propagate_context) is
//! called, so a component reaches its backend through its node and never
//! through global state.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::app::Window;
use crate::audio::AudioEngine;
use crate::errors::{EncoError, EngineKind, Result};
use crate::physics::PhysicsEngine;
use crate::render::RenderingEngine;
use crate::utils::time::Timer;

/// Single-threaded shared ownership used for backend engines.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value for sharing between the scene and its owner.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Bundle of backend references visible to a node and its components.
#[derive(Clone, Default)]
pub struct EngineContext {
    pub rendering: Option<Shared<RenderingEngine>>,
    pub physics: Option<Shared<PhysicsEngine>>,
    pub audio: Option<Shared<AudioEngine>>,
    pub window: Option<Rc<dyn Window>>,
    pub timer: Option<Shared<Timer>>,
}

impl EngineContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendering_engine(&self) -> Result<RefMut<'_, RenderingEngine>> {
        self.rendering
            .as_ref()
            .map(|engine| engine.borrow_mut())
            .ok_or(EncoError::MissingEngine(EngineKind::Rendering))
    }

    pub fn physics_engine(&self) -> Result<RefMut<'_, PhysicsEngine>> {
        self.physics
            .as_ref()
            .map(|engine| engine.borrow_mut())
            .ok_or(EncoError::MissingEngine(EngineKind::Physics))
    }

    pub fn audio_engine(&self) -> Result<RefMut<'_, AudioEngine>> {
        self.audio
            .as_ref()
            .map(|engine| engine.borrow_mut())
            .ok_or(EncoError::MissingEngine(EngineKind::Audio))
    }

    pub fn window(&self) -> Result<&Rc<dyn Window>> {
        self.window.as_ref().ok_or(EncoError::MissingEngine(EngineKind::Window))
    }

    pub fn timer(&self) -> Result<RefMut<'_, Timer>> {
        self.timer
            .as_ref()
            .map(|timer| timer.borrow_mut())
            .ok_or(EncoError::MissingEngine(EngineKind::Timer))
    }

    /// Whether both contexts reference the same engines (by identity).
    #[must_use]
    pub fn same_engines(&self, other: &Self) -> bool {
        fn same<T: ?Sized>(a: Option<&Rc<T>>, b: Option<&Rc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        same(self.rendering.as_ref(), other.rendering.as_ref())
            && same(self.physics.as_ref(), other.physics.as_ref())
            && same(self.audio.as_ref(), other.audio.as_ref())
            && same(self.window.as_ref(), other.window.as_ref())
            && same(self.timer.as_ref(), other.timer.as_ref())
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("rendering", &self.rendering.is_some())
            .field("physics", &self.physics.is_some())
            .field("audio", &self.audio.is_some())
            .field("window", &self.window.is_some())
            .field("timer", &self.timer.is_some())
            .finish()
    }
}
