#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod assets;
pub mod audio;
pub mod component;
pub mod engine;
pub mod errors;
pub mod math;
pub mod physics;
pub mod render;
pub mod scene;
pub mod settings;
pub mod utils;

pub use app::{HeadlessWindow, Window};
pub use assets::{FontPool, FontType, PoolRef, ResourcePool, TextureFilter, TexturePool, TextureWrap};
pub use audio::AudioEngine;
pub use component::{Camera, Component, ComponentContext, ComponentKey, ComponentState, Light, MeshRenderer, RigidBody};
pub use engine::{Engine, Game};
pub use errors::{EncoError, Result};
pub use math::{Matrix3, Matrix4, Matrix4f, Vector2, Vector3, Vector3f, Vector4};
pub use physics::{CollisionShape, PhysicsEngine};
pub use render::{ClearFlags, HeadlessRenderer, Renderer, RenderingEngine};
pub use scene::{EngineContext, Node, NodeHandle, Scene, Transform};
pub use settings::EngineSettings;
pub use utils::time::Timer;
