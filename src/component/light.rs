use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentContext};
use crate::errors::Result;
use crate::math::{Vector3f, Vector4f};
use crate::render::LightRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Directional,
    Point { range: f32 },
    Spot { range: f32, inner_cone: f32, outer_cone: f32 },
}

/// A light source. Registers itself with the rendering engine in
/// `init_rendering` and unregisters in `deinit`.
#[derive(Debug, Clone)]
pub struct Light {
    pub kind: LightKind,
    color: Vector3f,
    intensity: f32,
    registered: bool,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vector3f, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            registered: false,
        }
    }

    #[must_use]
    pub fn new_point(color: Vector3f, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point { range },
            color,
            intensity,
            registered: false,
        }
    }

    #[must_use]
    pub fn new_spot(color: Vector3f, intensity: f32, range: f32, inner_cone: f32, outer_cone: f32) -> Self {
        Self {
            kind: LightKind::Spot {
                range,
                inner_cone,
                outer_cone,
            },
            color,
            intensity,
            registered: false,
        }
    }

    pub fn set_color(&mut self, color: Vector3f) {
        self.color = color;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    #[must_use]
    pub fn color(&self) -> Vector3f {
        self.color
    }

    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    fn record(&self, cx: &ComponentContext<'_>) -> LightRecord {
        let world = cx.world_matrix();
        let forward = *world * Vector4f::new(0.0, 0.0, -1.0, 0.0);
        LightRecord {
            kind: self.kind,
            color: self.color,
            intensity: self.intensity,
            position: world.translation_part(),
            direction: forward.truncate().normalize(),
        }
    }
}

impl Component for Light {
    fn init_rendering(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        let record = self.record(cx);
        self.registered = cx.rendering_engine()?.add_light(cx.key, record);
        Ok(())
    }

    // Colour and intensity may change between frames; the record is a copy.
    fn update(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if !self.registered {
            return Ok(());
        }
        let record = self.record(cx);
        if let Some(registered) = cx.rendering_engine()?.light_mut(cx.key) {
            *registered = record;
        }
        Ok(())
    }

    fn deinit(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if self.registered {
            cx.rendering_engine()?.remove_light(cx.key);
            self.registered = false;
        }
        Ok(())
    }
}
