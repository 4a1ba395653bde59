//! Engine Core Module
//!
//! [`Engine`] owns the scene together with every backend it talks to and
//! drives them in a fixed order. It has no windowing logic of its own; the
//! frontend hands it a [`Window`] and a [`Renderer`] and pumps frames.
//!
//! # Lifecycle
//!
//! 1. [`Engine::startup`]: game `init`, then scene `init` and `init_rendering`
//! 2. [`Engine::frame`], once per frame: timer tick, one physics step, game
//!    `update`, late initialization of newly added components, scene `update`,
//!    render
//! 3. [`Engine::shutdown`]: game `deinit`, scene `deinit`, pool release,
//!    context teardown
//!
//! # Example
//!
//! ```rust,ignore
//! use enco::{Engine, EngineSettings, Game};
//!
//! struct Demo;
//! impl Game for Demo {}
//!
//! let mut engine = Engine::headless(EngineSettings::default())?;
//! engine.run(&mut Demo, Some(120))?;
//! ```

use std::rc::Rc;

use crate::app::{HeadlessWindow, Window};
use crate::assets::{AssetSource, FileSystemSource, FontPool, TexturePool};
use crate::audio::AudioEngine;
use crate::component::{Component, ComponentKey};
use crate::errors::Result;
use crate::physics::PhysicsEngine;
use crate::render::{ContextDescriptor, FrameStats, HeadlessRenderer, Renderer, RenderingEngine};
use crate::scene::context::{Shared, shared};
use crate::scene::{NodeHandle, Scene};
use crate::settings::EngineSettings;
use crate::utils::time::Timer;

/// Game callbacks driven by the [`Engine`].
///
/// All hooks default to doing nothing.
pub trait Game {
    /// Called once before the scene is initialized. Build the scene here.
    fn init(&mut self, _engine: &mut Engine) -> Result<()> {
        Ok(())
    }

    /// Called once per frame, after physics and before the scene update.
    fn update(&mut self, _engine: &mut Engine) -> Result<()> {
        Ok(())
    }

    /// Called once before the scene is torn down.
    fn deinit(&mut self, _engine: &mut Engine) -> Result<()> {
        Ok(())
    }
}

pub struct Engine {
    pub scene: Scene,

    rendering: Shared<RenderingEngine>,
    physics: Shared<PhysicsEngine>,
    audio: Shared<AudioEngine>,
    window: Rc<dyn Window>,
    timer: Shared<Timer>,

    textures: TexturePool,
    fonts: FontPool,

    settings: EngineSettings,
    running: bool,
}

impl Engine {
    /// Creates an engine with caller-provided backends and shares them with
    /// the scene.
    pub fn new(
        settings: EngineSettings,
        renderer: Box<dyn Renderer>,
        window: Rc<dyn Window>,
        source: Rc<dyn AssetSource>,
    ) -> Result<Self> {
        let mut rendering = RenderingEngine::with_settings(renderer, &settings.render);
        let descriptor = ContextDescriptor {
            depth_bits: settings.render.depth_bits,
            stencil_bits: settings.render.stencil_bits,
            fullscreen: settings.window.fullscreen,
            ..ContextDescriptor::default()
        };
        rendering.create_context(window.as_ref(), descriptor)?;

        let rendering = shared(rendering);
        let physics = shared(PhysicsEngine::with_settings(&settings.physics));
        let audio = shared(AudioEngine::with_settings(&settings.audio));
        let timer = shared(Timer::new());

        let mut scene = Scene::new();
        scene.set_rendering_engine(rendering.clone());
        scene.set_physics_engine(physics.clone());
        scene.set_audio_engine(audio.clone());
        scene.set_window(window.clone());
        scene.set_timer(timer.clone());

        log::info!("Engine created ({}x{})", settings.window.width, settings.window.height);

        Ok(Self {
            scene,
            rendering,
            physics,
            audio,
            window,
            timer,
            textures: TexturePool::new(source.clone()),
            fonts: FontPool::new(source),
            settings,
            running: false,
        })
    }

    /// Engine with a [`HeadlessRenderer`], a [`HeadlessWindow`] and assets
    /// read from `settings.assets.root`.
    pub fn headless(settings: EngineSettings) -> Result<Self> {
        let window: Rc<dyn Window> = Rc::new(HeadlessWindow::from_settings(&settings.window));
        let source: Rc<dyn AssetSource> = Rc::new(FileSystemSource::new(settings.assets.root.clone()));
        Self::new(settings, Box::new(HeadlessRenderer::new()), window, source)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn startup(&mut self, game: &mut dyn Game) -> Result<()> {
        game.init(self)?;
        self.scene.init()?;
        self.scene.init_rendering()?;
        self.running = true;
        log::info!("Engine started");
        Ok(())
    }

    pub fn frame(&mut self, game: &mut dyn Game) -> Result<FrameStats> {
        self.timer.borrow_mut().tick();
        self.physics.borrow_mut().update();

        game.update(self)?;

        // Components added during the game update join this frame.
        self.scene.init()?;
        self.scene.init_rendering()?;
        self.scene.update()?;

        Ok(self.rendering.borrow_mut().render_frame())
    }

    pub fn shutdown(&mut self, game: &mut dyn Game) -> Result<()> {
        game.deinit(self)?;
        self.scene.deinit()?;
        self.textures.release();
        self.fonts.release();
        self.rendering.borrow_mut().delete_context();
        self.running = false;
        log::info!("Engine shut down");
        Ok(())
    }

    /// Runs frames until the window asks to close or `max_frames` is reached.
    pub fn run(&mut self, game: &mut dyn Game, max_frames: Option<u64>) -> Result<u64> {
        self.startup(game)?;

        let mut frames = 0;
        while !self.window.should_close() && max_frames.is_none_or(|max| frames < max) {
            self.frame(game)?;
            frames += 1;
        }

        self.shutdown(game)?;
        Ok(frames)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Scene helpers
    // ========================================================================

    /// Creates a node directly below the root.
    pub fn add_game_object(&mut self, name: &str) -> Result<NodeHandle> {
        let root = self.scene.root();
        self.scene.spawn(root, name)
    }

    /// Attaches a component to the root node.
    pub fn add_game_component<C: Component>(&mut self, component: C) -> Result<ComponentKey> {
        let root = self.scene.root();
        self.scene.add_component(root, component)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn rendering_engine(&self) -> &Shared<RenderingEngine> {
        &self.rendering
    }

    #[must_use]
    pub fn physics_engine(&self) -> &Shared<PhysicsEngine> {
        &self.physics
    }

    #[must_use]
    pub fn audio_engine(&self) -> &Shared<AudioEngine> {
        &self.audio
    }

    #[must_use]
    pub fn window(&self) -> &Rc<dyn Window> {
        &self.window
    }

    #[must_use]
    pub fn timer(&self) -> &Shared<Timer> {
        &self.timer
    }

    pub fn textures(&mut self) -> &mut TexturePool {
        &mut self.textures
    }

    pub fn fonts(&mut self) -> &mut FontPool {
        &mut self.fonts
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
