use crate::assets::{PoolRef, Texture};
use crate::component::{Component, ComponentContext};
use crate::errors::Result;
use crate::render::RenderObject;

/// Draws a named mesh at the owning node, optionally textured with a pooled
/// texture.
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    pub mesh: String,
    pub texture: Option<PoolRef<Texture>>,
    registered: bool,
}

impl MeshRenderer {
    #[must_use]
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            texture: None,
            registered: false,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: PoolRef<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }
}

impl Component for MeshRenderer {
    fn init_rendering(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if let Some(texture) = &self.texture
            && !texture.is_valid()
        {
            log::warn!("Mesh '{}' references a released texture", self.mesh);
        }

        let object = RenderObject {
            mesh: self.mesh.clone(),
            texture: self.texture.clone(),
            world_matrix: *cx.world_matrix(),
        };
        self.registered = cx.rendering_engine()?.add_renderable(cx.key, object);
        Ok(())
    }

    fn update(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if self.registered {
            let world = *cx.world_matrix();
            cx.rendering_engine()?.update_renderable(cx.key, world);
        }
        Ok(())
    }

    fn deinit(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if self.registered {
            cx.rendering_engine()?.remove_renderable(cx.key);
            self.registered = false;
        }
        Ok(())
    }
}
