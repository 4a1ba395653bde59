use crate::component::{Component, ComponentContext};
use crate::errors::Result;
use crate::math::{Matrix4f, Vector3f};
use crate::physics::{CollisionShape, RigidBodyDesc};

/// Puts the owning node under physics control.
///
/// `init` registers a native body built from the node's world pose. Every
/// `update` writes the simulated pose back into the node's local transform, so
/// dynamic bodies drive their node rather than the other way round.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub shape: CollisionShape,
    /// Zero mass makes the body static.
    pub mass: f32,
    pub restitution: f32,
    pub initial_velocity: Vector3f,
}

impl RigidBody {
    #[must_use]
    pub fn new(shape: CollisionShape, mass: f32) -> Self {
        Self {
            shape,
            mass,
            restitution: 0.0,
            initial_velocity: Vector3f::zero(),
        }
    }

    #[must_use]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector3f) -> Self {
        self.initial_velocity = velocity;
        self
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }
}

impl Component for RigidBody {
    fn init(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        let (_, rotation, translation) = glam::Mat4::from(*cx.world_matrix()).to_scale_rotation_translation();

        let desc = RigidBodyDesc {
            shape: self.shape,
            mass: self.mass,
            restitution: self.restitution,
            position: translation.into(),
            rotation,
            linear_velocity: self.initial_velocity,
        };
        cx.physics_engine()?.add_rigid_body(cx.key, desc);
        Ok(())
    }

    fn update(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        if self.is_static() {
            return Ok(());
        }
        let Some(pose) = cx.physics_engine()?.body_pose(cx.key) else {
            return Ok(());
        };

        let (scale, _, _) = glam::Mat4::from(*cx.world_matrix()).to_scale_rotation_translation();
        let world = Matrix4f::from(glam::Mat4::from_scale_rotation_translation(
            scale,
            pose.rotation,
            pose.position.into(),
        ));
        let local = cx.parent_world.inverse() * world;
        cx.transform.apply_local_matrix(local);
        Ok(())
    }

    fn deinit(&mut self, cx: &mut ComponentContext<'_>) -> Result<()> {
        cx.physics_engine()?.remove_rigid_body(cx.key);
        Ok(())
    }
}
