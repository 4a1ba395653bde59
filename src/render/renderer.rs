//! Rendering surface abstraction.
//!
//! [`Renderer`] is the narrow seam to the graphics API: context management,
//! frame bracketing and buffer clearing. The scene core never talks to it
//! directly; the [`RenderingEngine`](super::RenderingEngine) drives it once per
//! frame. [`HeadlessRenderer`] implements it without any GPU and records what
//! it was asked to do.

use std::any::Any;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::math::{Matrix4f, Vector3f};

use super::RenderObject;

bitflags! {
    /// Buffers cleared by [`Renderer::clear_buffer`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ClearFlags: u8 {
        const COLOR   = 1 << 0;
        const DEPTH   = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Parameters for creating the drawing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescriptor {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color_bits: u32,
    pub depth_bits: u32,
    pub stencil_bits: u32,
    pub fullscreen: bool,
}

impl Default for ContextDescriptor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1280,
            height: 720,
            color_bits: 32,
            depth_bits: 24,
            stencil_bits: 8,
            fullscreen: false,
        }
    }
}

/// Graphics backend driven by the rendering engine.
pub trait Renderer {
    fn create_context(&mut self, descriptor: &ContextDescriptor) -> Result<()>;
    fn delete_context(&mut self);

    fn begin_frame(&mut self);
    fn end_frame(&mut self);

    fn set_clear_color(&mut self, color: Vector3f);
    fn set_clear_depth(&mut self, depth: f64);
    fn clear_buffer(&mut self, buffers: ClearFlags);

    /// Submits one registered renderable. Backends without a draw path may
    /// ignore it.
    fn draw(&mut self, _object: &RenderObject, _view_projection: &Matrix4f) {}

    /// Concrete backend access for callers that know the type.
    fn as_any(&self) -> &dyn Any;
}

/// A renderer that draws nothing and counts every call.
#[derive(Debug, Default, Clone)]
pub struct HeadlessRenderer {
    pub context: Option<ContextDescriptor>,
    pub frames_begun: u64,
    pub frames_ended: u64,
    pub clear_color: Vector3f,
    pub clear_depth: f64,
    pub last_clear: ClearFlags,
    pub draw_calls: u64,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for HeadlessRenderer {
    fn create_context(&mut self, descriptor: &ContextDescriptor) -> Result<()> {
        log::debug!(
            "Headless context {}x{} (depth {}, stencil {})",
            descriptor.width,
            descriptor.height,
            descriptor.depth_bits,
            descriptor.stencil_bits
        );
        self.context = Some(*descriptor);
        Ok(())
    }

    fn delete_context(&mut self) {
        self.context = None;
    }

    fn begin_frame(&mut self) {
        self.frames_begun += 1;
    }

    fn end_frame(&mut self) {
        self.frames_ended += 1;
    }

    fn set_clear_color(&mut self, color: Vector3f) {
        self.clear_color = color;
    }

    fn set_clear_depth(&mut self, depth: f64) {
        self.clear_depth = depth;
    }

    fn clear_buffer(&mut self, buffers: ClearFlags) {
        self.last_clear = buffers;
    }

    fn draw(&mut self, _object: &RenderObject, _view_projection: &Matrix4f) {
        self.draw_calls += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
