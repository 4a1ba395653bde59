use glam::{EulerRot, Quat};

use crate::math::{Matrix4f, Vector3f};

/// Local TRS transform of a node, with cached local and world matrices.
///
/// `position`, `rotation` and `scale` are public; the local matrix is rebuilt
/// lazily by [`update_local_matrix`](Self::update_local_matrix) when any of
/// them changed since the last rebuild. The world matrix is written by the
/// scene during traversal.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vector3f,
    pub rotation: Quat,
    pub scale: Vector3f,

    pub(crate) local_matrix: Matrix4f,
    pub(crate) world_matrix: Matrix4f,

    last_position: Vector3f,
    last_rotation: Quat,
    last_scale: Vector3f,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vector3f::zero(),
            rotation: Quat::IDENTITY,
            scale: Vector3f::one(),

            local_matrix: Matrix4f::identity(),
            world_matrix: Matrix4f::identity(),

            last_position: Vector3f::zero(),
            last_rotation: Quat::IDENTITY,
            last_scale: Vector3f::one(),
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_position(position: Vector3f) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    // ========================================================================
    // Local matrix maintenance
    // ========================================================================

    /// Rebuilds the local matrix if the TRS values changed.
    ///
    /// Returns whether the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            let rotation = Matrix4f::from(glam::Mat4::from_quat(self.rotation));
            self.local_matrix = Matrix4f::from_translation(self.position)
                * rotation
                * Matrix4f::scaling(self.scale.x, self.scale.y, self.scale.z);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Recomputes `world = parent_world · local`, rebuilding the local matrix
    /// first if needed.
    pub fn refresh_world(&mut self, parent_world: &Matrix4f) {
        self.update_local_matrix();
        self.world_matrix = *parent_world * self.local_matrix;
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Matrix4f {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Matrix4f {
        &self.world_matrix
    }

    #[must_use]
    pub fn world_position(&self) -> Vector3f {
        self.world_matrix.translation_part()
    }

    /// Sets the local matrix directly and decomposes it back into TRS.
    ///
    /// Shear is lost in the decomposition.
    pub fn apply_local_matrix(&mut self, mat: Matrix4f) {
        let (scale, rotation, translation) = glam::Mat4::from(mat).to_scale_rotation_translation();

        self.local_matrix = mat;
        self.scale = scale.into();
        self.rotation = rotation;
        self.position = translation.into();

        self.last_scale = self.scale;
        self.last_rotation = self.rotation;
        self.last_position = self.position;
        self.force_update = false;
    }

    // ========================================================================
    // Rotation helpers
    // ========================================================================

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Orients the transform so that its -Z axis points at `target`.
    ///
    /// `target` and `up` are in the parent's space. Does nothing when the
    /// view direction is (nearly) parallel to `up`.
    pub fn look_at(&mut self, target: Vector3f, up: Vector3f) {
        let forward = (target - self.position).normalize();
        if forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        // Rows are the basis; the transpose carries it in its columns.
        let basis = Matrix4f::from_rotation_basis(-forward, new_up, right).transpose();
        self.rotation = Quat::from_mat4(&basis.into());
    }

    /// Forces the next [`update_local_matrix`](Self::update_local_matrix) to rebuild.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
