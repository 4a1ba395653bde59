use serde::{Deserialize, Serialize};

use crate::math::Vector3f;

/// Axis-aligned (in body space) box described by its half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    half_size: Vector3f,
}

impl BoxShape {
    #[must_use]
    pub fn from_half_size(half_size: Vector3f) -> Self {
        Self { half_size }
    }

    /// Box with the given full edge lengths.
    #[must_use]
    pub fn from_size(size: Vector3f) -> Self {
        Self { half_size: size * 0.5 }
    }

    pub fn set_half_size(&mut self, half_size: Vector3f) {
        self.half_size = half_size;
    }

    pub fn set_size(&mut self, size: Vector3f) {
        self.half_size = size * 0.5;
    }

    #[must_use]
    pub fn half_size(&self) -> Vector3f {
        self.half_size
    }

    #[must_use]
    pub fn size(&self) -> Vector3f {
        self.half_size * 2.0
    }
}

impl Default for BoxShape {
    fn default() -> Self {
        Self::from_half_size(Vector3f::splat(0.5))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    Box(BoxShape),
    Sphere { radius: f32 },
    /// Infinite plane `dot(normal, p) = offset`, in body space.
    Plane { normal: Vector3f, offset: f32 },
}

impl CollisionShape {
    #[must_use]
    pub fn cuboid(size: Vector3f) -> Self {
        CollisionShape::Box(BoxShape::from_size(size))
    }

    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        CollisionShape::Sphere { radius }
    }

    /// Ground plane facing +Y at height zero.
    #[must_use]
    pub fn ground() -> Self {
        CollisionShape::Plane {
            normal: Vector3f::unit_y(),
            offset: 0.0,
        }
    }

    /// Distance from the shape's center to its surface along `direction`
    /// (a unit vector in body space). Planes have no extent.
    #[must_use]
    pub fn support_extent(&self, direction: Vector3f) -> f32 {
        match self {
            CollisionShape::Box(b) => {
                let h = b.half_size();
                (h.x * direction.x).abs() + (h.y * direction.y).abs() + (h.z * direction.z).abs()
            }
            CollisionShape::Sphere { radius } => *radius,
            CollisionShape::Plane { .. } => 0.0,
        }
    }
}
