use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentContext};
use crate::errors::Result;
use crate::math::Matrix4f;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// `fov_y` in radians.
    Perspective { fov_y: f32, aspect: f32, near: f32, far: f32 },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    #[must_use]
    pub fn matrix(&self) -> Matrix4f {
        match *self {
            Projection::Perspective { fov_y, aspect, near, far } => Matrix4f::perspective(fov_y, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Matrix4f::orthographic(left, right, bottom, top, near, far),
        }
    }
}

/// Viewpoint for rendering. Claims the rendering engine's main camera slot in
/// `init_rendering` and keeps its view matrix in sync with the node.
#[derive(Debug, Clone)]
pub struct Camera {
    pub projection: Projection,
    view_matrix: Matrix4f,
}

impl Camera {
    #[must_use]
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            view_matrix: Matrix4f::identity(),
        }
    }

    /// `fov_y` in degrees, like most editor-facing APIs.
    #[must_use]
    pub fn new_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Perspective {
            fov_y: fov_y.to_radians(),
            aspect,
            near,
            far,
        })
    }

    #[must_use]
    pub fn new_orthographic(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Orthographic {
            left: -half_width,
            right: half_width,
            bottom: -half_height,
            top: half_height,
            near,
            far,
        })
    }

    /// Inverse of the owning node's world matrix, as of the last update.
    #[must_use]
    pub fn view_matrix(&self) -> &Matrix4f {
        &self.view_matrix
    }

    #[must_use]
    pub fn view_projection(&self) -> Matrix4f {
        self.projection.matrix() * self.view_matrix
    }
}

impl Component for Camera {
    fn init_rendering(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        self.view_matrix = cx.world_matrix().inverse();
        let mut engine = cx.rendering_engine()?;
        engine.set_main_camera(cx.key, self.projection.matrix());
        engine.update_camera(cx.key, self.view_matrix, self.projection.matrix());
        Ok(())
    }

    fn update(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        self.view_matrix = cx.world_matrix().inverse();
        if let Some(engine) = cx.engines.rendering.as_ref() {
            engine
                .borrow_mut()
                .update_camera(cx.key, self.view_matrix, self.projection.matrix());
        }
        Ok(())
    }

    fn deinit(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if let Some(engine) = cx.engines.rendering.as_ref() {
            engine.borrow_mut().clear_main_camera(cx.key);
        }
        Ok(())
    }
}
